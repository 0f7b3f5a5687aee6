//! Evidence gateway
//!
//! Single point of access to the external providers for one verification
//! run. Wraps every call with bounded jittered backoff on transient
//! failures, puts a hard timeout on model calls, and counts calls for the
//! report. Retrying blindly is safe because every provider call is
//! read-only.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::timeout;

use crate::config::VerifierConfig;
use crate::domain::entities::{
    CodeExcerpt, CommitTimeline, FileEntry, ProviderUsage, RepoMetadata, RepoRef,
};
use crate::domain::ports::{
    Assessment, ClaimClassification, LanguageModelProvider, RepositoryProvider,
};
use crate::error::ProviderError;

/// Retried, counted access to the two providers for one run
pub struct EvidenceGateway<R, L>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    repo: Arc<R>,
    model: Arc<L>,
    attempts: u32,
    backoff_base: Duration,
    model_timeout: Duration,
    repository_calls: AtomicU32,
    model_calls: AtomicU32,
}

impl<R, L> EvidenceGateway<R, L>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    pub fn new(repo: Arc<R>, model: Arc<L>, config: &VerifierConfig) -> Self {
        Self {
            repo,
            model,
            attempts: config.provider_attempts.max(1),
            backoff_base: config.backoff_base,
            model_timeout: config.model_timeout,
            repository_calls: AtomicU32::new(0),
            model_calls: AtomicU32::new(0),
        }
    }

    /// Call counters so far, retries included
    pub fn usage(&self) -> ProviderUsage {
        ProviderUsage {
            repository_calls: self.repository_calls.load(Ordering::Relaxed),
            model_calls: self.model_calls.load(Ordering::Relaxed),
        }
    }

    pub async fn get_repository(&self, repo: &RepoRef) -> Result<RepoMetadata, ProviderError> {
        self.with_retries(|| {
            self.repository_calls.fetch_add(1, Ordering::Relaxed);
            self.repo.get_repository(repo)
        })
        .await
    }

    pub async fn get_file_tree(&self, repo: &RepoRef) -> Result<Vec<FileEntry>, ProviderError> {
        self.with_retries(|| {
            self.repository_calls.fetch_add(1, Ordering::Relaxed);
            self.repo.get_file_tree(repo)
        })
        .await
    }

    pub async fn get_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        self.with_retries(|| {
            self.repository_calls.fetch_add(1, Ordering::Relaxed);
            self.repo.get_file_content(repo, path)
        })
        .await
    }

    pub async fn get_commit_history(&self, repo: &RepoRef) -> Result<CommitTimeline, ProviderError> {
        self.with_retries(|| {
            self.repository_calls.fetch_add(1, Ordering::Relaxed);
            self.repo.get_commit_history(repo)
        })
        .await
    }

    pub async fn classify(&self, text: &str) -> Result<ClaimClassification, ProviderError> {
        self.with_retries(|| {
            self.model_calls.fetch_add(1, Ordering::Relaxed);
            self.bounded(self.model.classify(text))
        })
        .await
    }

    pub async fn assess(
        &self,
        claim_text: &str,
        excerpts: &[CodeExcerpt],
    ) -> Result<Assessment, ProviderError> {
        self.with_retries(|| {
            self.model_calls.fetch_add(1, Ordering::Relaxed);
            self.bounded(self.model.assess(claim_text, excerpts))
        })
        .await
    }

    /// Enforce the per-call model timeout
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match timeout(self.model_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.model_timeout)),
        }
    }

    /// Retry transient failures with exponential backoff and jitter.
    /// Terminal errors (`NotFound`, `Malformed`) return immediately.
    async fn with_retries<T, F, Fut>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.attempts => {
                    let delay = backoff_delay(self.backoff_base, attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient provider failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Exponential backoff doubled per attempt, plus up to 50% jitter
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let scaled_ms =
        (base.as_millis() as u64).saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let jitter_ms = rand::thread_rng().gen_range(0..=scaled_ms / 2);
    Duration::from_millis(scaled_ms.saturating_add(jitter_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockLanguageModelProvider, MockRepositoryProvider};

    fn fast_config() -> VerifierConfig {
        VerifierConfig {
            provider_attempts: 3,
            backoff_base: Duration::from_millis(1),
            model_timeout: Duration::from_millis(20),
            ..VerifierConfig::default()
        }
    }

    fn repo() -> RepoRef {
        RepoRef {
            owner: "acme".to_string(),
            name: "demo".to_string(),
        }
    }

    #[test]
    fn backoff_grows_per_attempt() {
        let base = Duration::from_millis(100);
        let first = backoff_delay(base, 1);
        let third = backoff_delay(base, 3);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(150));
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(600));
    }

    #[test]
    fn backoff_saturates_on_extreme_attempts() {
        // An oversized attempt budget must pin the delay, not overflow it
        let delay = backoff_delay(Duration::from_millis(100), u32::MAX);
        assert_eq!(delay, Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let provider = Arc::new(
            MockRepositoryProvider::new()
                .with_tree(vec![FileEntry {
                    path: "package.json".to_string(),
                    size: 120,
                }])
                .with_transient_failures(2),
        );
        let model = Arc::new(MockLanguageModelProvider::new());
        let gateway = EvidenceGateway::new(provider, model, &fast_config());

        let tree = gateway.get_file_tree(&repo()).await.unwrap();

        assert_eq!(tree.len(), 1);
        // Two failed attempts plus the successful one
        assert_eq!(gateway.usage().repository_calls, 3);
    }

    #[tokio::test]
    async fn gives_up_after_attempt_budget() {
        let provider = Arc::new(
            MockRepositoryProvider::new()
                .with_tree(Vec::new())
                .with_transient_failures(10),
        );
        let model = Arc::new(MockLanguageModelProvider::new());
        let gateway = EvidenceGateway::new(provider, model, &fast_config());

        let err = gateway.get_file_tree(&repo()).await.unwrap_err();

        assert!(err.is_transient());
        assert_eq!(gateway.usage().repository_calls, 3);
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let provider = Arc::new(MockRepositoryProvider::new().failing(
            ProviderError::NotFound("acme/demo".to_string()),
        ));
        let model = Arc::new(MockLanguageModelProvider::new());
        let gateway = EvidenceGateway::new(provider, model, &fast_config());

        let err = gateway.get_repository(&repo()).await.unwrap_err();

        assert!(matches!(err, ProviderError::NotFound(_)));
        assert_eq!(gateway.usage().repository_calls, 1);
    }

    #[tokio::test]
    async fn slow_model_call_times_out() {
        let provider = Arc::new(MockRepositoryProvider::new());
        let model = Arc::new(
            MockLanguageModelProvider::new().with_delay(Duration::from_millis(200)),
        );
        let gateway = EvidenceGateway::new(provider, model, &fast_config());

        let err = gateway.classify("built with react").await.unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(_)));
        // Timeouts are transient, so the whole attempt budget was spent
        assert_eq!(gateway.usage().model_calls, 3);
    }
}
