//! Hackcheck verification pipeline
//!
//! Checks hackathon submissions against their linked GitHub repositories:
//! extracts claims from the submission text, gathers evidence from repository
//! metadata and code, checks commit-timeline eligibility, and produces a
//! deterministic verification report per submission.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;

#[cfg(test)]
mod test_utils;


pub use app::{EvidenceGateway, VerificationPipeline};
pub use config::{ProviderConfig, VerifierConfig};
pub use domain::entities::{
    EventWindow, SubmissionRecord, VerificationReport, Verdict,
};
pub use error::VerifyError;
