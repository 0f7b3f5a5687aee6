//! Commit timeline and eligibility domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit on the default branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub timestamp: DateTime<Utc>,
    pub author: Option<String>,
}

/// The default-branch commit history, oldest first.
///
/// Fetched once per run and shared by eligibility and team attribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitTimeline {
    commits: Vec<CommitRecord>,
}

impl CommitTimeline {
    /// Build a timeline; commits are sorted ascending by timestamp so callers
    /// can rely on the order regardless of how the provider paginated.
    pub fn new(mut commits: Vec<CommitRecord>) -> Self {
        commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.sha.cmp(&b.sha)));
        Self { commits }
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn earliest(&self) -> Option<&CommitRecord> {
        self.commits.first()
    }
}

/// Why a submission is or is not eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Ok,
    /// At least one commit predates the event start (minus tolerance)
    PreExistingCode,
    /// The default branch has no commits at all
    NoCommits,
}

impl std::fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EligibilityStatus::Ok => write!(f, "ok"),
            EligibilityStatus::PreExistingCode => write!(f, "pre_existing_code"),
            EligibilityStatus::NoCommits => write!(f, "no_commits"),
        }
    }
}

/// Timeline verdict plus the counters the report surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub status: EligibilityStatus,
    /// SHAs of commits made before the event started
    pub violating_commits: Vec<String>,
    pub commits_in_window: usize,
    /// Counted for the report; never disqualifying on its own
    pub commits_after_end: usize,
}

impl EligibilityResult {
    pub fn is_eligible(&self) -> bool {
        self.status == EligibilityStatus::Ok
    }
}
