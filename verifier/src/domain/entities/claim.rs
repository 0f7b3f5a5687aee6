//! Claim domain entity
//!
//! A claim is one falsifiable statement extracted from a submission, tagged
//! with what kind of statement it is and how much it matters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deriving stable claim ids. Changing this breaks the
/// identical-inputs-identical-report property across versions.
const CLAIM_NAMESPACE: Uuid = Uuid::from_u128(0x48ac_3c26_d1b0_4f2a_9d5e_7b61_22e0_c4a7);

/// Unique identifier for a claim.
///
/// Derived from the submission id and the normalized claim text, so the same
/// submission always yields the same ids and duplicate statements collapse
/// onto one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub Uuid);

impl ClaimId {
    pub fn derive(submission_id: &str, normalized_text: &str) -> Self {
        let material = format!("{}:{}", submission_id, normalized_text);
        Self(Uuid::new_v5(&CLAIM_NAMESPACE, material.as_bytes()))
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of statement the claim makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    /// Names a concrete technology ("built with React")
    Technology,
    /// Asserts a capability ("real-time collaborative editing")
    Feature,
    /// Asserts sophistication ("custom ML pipeline trained from scratch")
    Complexity,
}

impl std::fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimCategory::Technology => write!(f, "technology"),
            ClaimCategory::Feature => write!(f, "feature"),
            ClaimCategory::Complexity => write!(f, "complexity"),
        }
    }
}

impl std::str::FromStr for ClaimCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology" => Ok(ClaimCategory::Technology),
            "feature" => Ok(ClaimCategory::Feature),
            "complexity" => Ok(ClaimCategory::Complexity),
            _ => Err(format!("Unknown claim category: {}", s)),
        }
    }
}

/// How much a claim contributes to the submission's pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimImportance {
    /// Central to the pitch; a refuted core claim dominates the verdict
    Core,
    Secondary,
    Minor,
}

impl ClaimImportance {
    /// Scoring weight. The set of weights is closed.
    pub fn weight(&self) -> f64 {
        match self {
            ClaimImportance::Core => 1.0,
            ClaimImportance::Secondary => 0.6,
            ClaimImportance::Minor => 0.3,
        }
    }
}

impl std::fmt::Display for ClaimImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimImportance::Core => write!(f, "core"),
            ClaimImportance::Secondary => write!(f, "secondary"),
            ClaimImportance::Minor => write!(f, "minor"),
        }
    }
}

impl std::str::FromStr for ClaimImportance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core" => Ok(ClaimImportance::Core),
            "secondary" => Ok(ClaimImportance::Secondary),
            "minor" => Ok(ClaimImportance::Minor),
            _ => Err(format!("Unknown claim importance: {}", s)),
        }
    }
}

/// One falsifiable statement extracted from a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub text: String,
    pub category: ClaimCategory,
    pub importance: ClaimImportance,
}

impl Claim {
    pub fn new(
        submission_id: &str,
        text: impl Into<String>,
        category: ClaimCategory,
        importance: ClaimImportance,
    ) -> Self {
        let text = text.into();
        let id = ClaimId::derive(submission_id, &normalize_text(&text));
        Self {
            id,
            text,
            category,
            importance,
        }
    }

    pub fn is_core(&self) -> bool {
        self.importance == ClaimImportance::Core
    }
}

/// Lowercase and collapse whitespace so equivalent statements compare equal
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
