//! Decision engine
//!
//! Pure function from (findings, score, eligibility) to a verdict.
//! Eligibility dominates everything; the core-veto check is repeated
//! here so the veto holds even if someone configures the pass threshold
//! below neutral.

use crate::app::scorer;
use crate::config::VerifierConfig;
use crate::domain::entities::{ClaimFinding, EligibilityResult, Verdict};

/// Decide the verdict for a fully scored submission.
pub fn decide(
    findings: &[ClaimFinding],
    score: f64,
    eligibility: &EligibilityResult,
    config: &VerifierConfig,
) -> Verdict {
    if !eligibility.is_eligible() {
        return Verdict::Disqualified;
    }

    if score < config.pass_threshold || scorer::has_vetoed_core(findings) {
        return Verdict::Flagged;
    }

    Verdict::Verified
}
