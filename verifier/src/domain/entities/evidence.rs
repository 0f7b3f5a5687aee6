//! Evidence domain entities
//!
//! Every check the pipeline runs produces an `EvidenceItem`; the scorer folds
//! a claim's items into one `ClaimFinding`.

use serde::{Deserialize, Serialize};

use super::claim::{Claim, ClaimId};

/// Which stage produced a piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceTier {
    /// Cheap metadata inspection (manifests, file tree)
    Tier1,
    /// Model-assisted reading of selected source excerpts
    Tier2,
}

impl std::fmt::Display for EvidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceTier::Tier1 => write!(f, "tier1"),
            EvidenceTier::Tier2 => write!(f, "tier2"),
        }
    }
}

/// What a check concluded about its claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceOutcome {
    Confirmed,
    Refuted,
    Inconclusive,
}

impl EvidenceOutcome {
    /// A decisive outcome settles the claim; `Inconclusive` defers it.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, EvidenceOutcome::Inconclusive)
    }
}

impl std::fmt::Display for EvidenceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceOutcome::Confirmed => write!(f, "confirmed"),
            EvidenceOutcome::Refuted => write!(f, "refuted"),
            EvidenceOutcome::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// Provenance of a piece of evidence.
///
/// The degraded variants record why a check never completed; scoring treats
/// them as neutral regardless of claim importance, unlike a completed
/// assessment that simply failed to find support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceBasis {
    /// Matched an entry in a dependency manifest
    DependencyManifest,
    /// Matched the file-extension histogram or a marker file in the tree
    FileExtension,
    /// Metadata inspection ran but could not settle the claim
    MetadataScan,
    /// A language model read selected excerpts and answered
    ModelAssessment,
    /// The provider call failed or timed out
    ProviderFailure,
    /// The submission deadline expired before the check ran
    Deadline,
    /// The per-submission byte budget was spent before this claim's turn
    BudgetExhausted,
}

impl EvidenceBasis {
    /// Whether this evidence comes from a check that never completed.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            EvidenceBasis::ProviderFailure | EvidenceBasis::Deadline | EvidenceBasis::BudgetExhausted
        )
    }
}

impl std::fmt::Display for EvidenceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EvidenceBasis::DependencyManifest => "dependency_manifest",
            EvidenceBasis::FileExtension => "file_extension",
            EvidenceBasis::MetadataScan => "metadata_scan",
            EvidenceBasis::ModelAssessment => "model_assessment",
            EvidenceBasis::ProviderFailure => "provider_failure",
            EvidenceBasis::Deadline => "deadline",
            EvidenceBasis::BudgetExhausted => "budget_exhausted",
        };
        write!(f, "{}", s)
    }
}

/// One check's verdict on one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub claim_id: ClaimId,
    pub tier: EvidenceTier,
    pub outcome: EvidenceOutcome,
    pub basis: EvidenceBasis,
    /// Human-readable note: what was checked and what was found
    pub detail: String,
}

/// A claim with its evidence trail and settled outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimFinding {
    pub claim: Claim,
    /// At most one item per tier, in tier order
    pub evidence: Vec<EvidenceItem>,
    pub outcome: EvidenceOutcome,
}

impl ClaimFinding {
    /// The evidence item that settled the outcome, if any did.
    pub fn deciding_evidence(&self) -> Option<&EvidenceItem> {
        self.evidence
            .iter()
            .rev()
            .find(|item| item.outcome == self.outcome)
    }

    /// A core claim in a state that must block verification: refuted
    /// outright, or still unsupported after a completed model assessment.
    /// Degraded checks never veto; no assessment actually ran.
    pub fn is_core_veto(&self) -> bool {
        if !self.claim.is_core() {
            return false;
        }
        match self.outcome {
            EvidenceOutcome::Refuted => true,
            EvidenceOutcome::Inconclusive => self.assessment_left_unsupported(),
            EvidenceOutcome::Confirmed => false,
        }
    }

    /// A completed model assessment that still could not support the claim
    fn assessment_left_unsupported(&self) -> bool {
        self.evidence.iter().any(|item| {
            item.tier == EvidenceTier::Tier2
                && item.basis == EvidenceBasis::ModelAssessment
                && item.outcome == EvidenceOutcome::Inconclusive
        })
    }
}
