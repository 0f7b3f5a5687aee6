//! Application layer
//!
//! Contains the verification pipeline and its stages. Stages coordinate
//! between domain entities, ports, and external providers.

pub mod claim_extractor;
pub mod decision;
pub mod eligibility;
pub mod gateway;
pub mod pipeline;
pub mod scorer;
pub mod team;
pub mod tech_catalog;
pub mod tier1;
pub mod tier2;

pub use claim_extractor::extract_claims;
pub use decision::decide;
pub use gateway::EvidenceGateway;
pub use pipeline::VerificationPipeline;
pub use scorer::{aggregate_score, has_vetoed_core, resolve_findings};
pub use tech_catalog::TechSignature;
pub use tier1::RepoSnapshot;
