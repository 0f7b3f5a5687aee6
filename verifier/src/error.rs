//! Unified error types for the verification pipeline
//!
//! This module defines error types for each layer:
//! - `ProviderError`: external capability failures (repository / language model)
//! - `ExtractionError`: the claim extractor could not produce a usable claim set
//! - `VerifyError`: per-submission fatal errors; the pipeline converts these
//!   into `Unverifiable` reports instead of propagating them out of a batch

use std::time::Duration;

use thiserror::Error;

/// Errors from the external capability providers.
///
/// `RateLimited`, `Transport` and `Timeout` are transient and trigger backoff;
/// `NotFound` and `Malformed` never do.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited")]
    RateLimited,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether a retry with backoff can reasonably help.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::Transport(_) | ProviderError::Timeout(_)
        )
    }
}

// Manual impl because `ProviderError` is `Clone` and `reqwest::Error` is not
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// The language model produced unusable output during claim extraction.
///
/// Callers must treat this as "cannot verify", never as "verified clean".
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("claim classification failed after retry: {0}")]
    Classification(String),

    #[error("submission produced no verifiable claims")]
    EmptyClaimSet,
}

/// Fatal errors for a single submission.
///
/// These short-circuit the run into an `Unverifiable` report; they never abort
/// a batch.
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    #[error("claim extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("invalid repository url: {0}")]
    InvalidRepoUrl(String),

    #[error("commit history unavailable: {0}")]
    HistoryUnavailable(String),
}
