//! Language model provider port trait
//!
//! The pipeline uses a language model for exactly two things: classifying
//! candidate claim statements and assessing claims against code excerpts.
//! Both are advisory; transport failure is never treated as an answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ClaimCategory, ClaimImportance, CodeExcerpt, EvidenceOutcome};
use crate::error::ProviderError;

/// How the model categorized one candidate statement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClaimClassification {
    pub category: ClaimCategory,
    pub importance: ClaimImportance,
}

/// The model's judgement of a claim against source excerpts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub outcome: EvidenceOutcome,
    /// One-line justification, quoted verbatim into the evidence detail
    pub justification: String,
}

#[async_trait]
pub trait LanguageModelProvider: Send + Sync {
    /// Classify one candidate claim statement into the closed enums.
    /// Adapters clamp off-vocabulary model output before returning.
    async fn classify(&self, text: &str) -> Result<ClaimClassification, ProviderError>;

    /// Judge whether the excerpts support the claim.
    async fn assess(
        &self,
        claim_text: &str,
        excerpts: &[CodeExcerpt],
    ) -> Result<Assessment, ProviderError>;
}
