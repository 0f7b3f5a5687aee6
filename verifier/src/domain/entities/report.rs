//! Verification report entities
//!
//! The report is the pipeline's only output. It must serialize identically
//! for identical inputs, so nothing in here carries wall-clock state.

use serde::{Deserialize, Serialize};

use super::evidence::ClaimFinding;
use super::repo::RepoRef;
use super::timeline::EligibilityResult;

/// Final verdict for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Claims check out and the timeline is clean
    Verified,
    /// Verifiable but suspect: low score or a refuted core claim
    Flagged,
    /// Ineligible regardless of claim quality
    Disqualified,
    /// The pipeline could not check this submission at all
    Unverifiable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Verified => write!(f, "VERIFIED"),
            Verdict::Flagged => write!(f, "FLAGGED"),
            Verdict::Disqualified => write!(f, "DISQUALIFIED"),
            Verdict::Unverifiable => write!(f, "UNVERIFIABLE"),
        }
    }
}

/// Who actually committed during the event, matched against the claimed team.
///
/// Informational only; never moves the score or the verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamAttribution {
    /// Claimed members with at least one in-window commit
    pub matched: Vec<String>,
    /// Claimed members with no in-window commits under any matching name
    pub unmatched: Vec<String>,
    /// Commit authors with more than two in-window commits who are not on
    /// the claimed team
    pub unlisted_contributors: Vec<String>,
}

/// Provider call counters for one run, retries included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUsage {
    pub repository_calls: u32,
    pub model_calls: u32,
}

/// Everything the pipeline concluded about one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub submission_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoRef>,
    pub claims: Vec<ClaimFinding>,
    /// Weighted aggregate in [0, 1]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityResult>,
    pub verdict: Verdict,
    /// One-paragraph reasoning behind the verdict
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamAttribution>,
    pub usage: ProviderUsage,
    /// Set only on `Unverifiable` reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationReport {
    /// Terminal report for a submission the pipeline could not check.
    pub fn unverifiable(
        submission_id: impl Into<String>,
        title: impl Into<String>,
        repo: Option<RepoRef>,
        reason: impl Into<String>,
        usage: ProviderUsage,
    ) -> Self {
        let reason = reason.into();
        Self {
            submission_id: submission_id.into(),
            title: title.into(),
            repo,
            claims: Vec::new(),
            score: 0.0,
            eligibility: None,
            verdict: Verdict::Unverifiable,
            summary: format!("Verification could not be completed: {}", reason),
            team: None,
            usage,
            error: Some(reason),
        }
    }
}
