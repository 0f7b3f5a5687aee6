//! Verification pipeline
//!
//! Orchestrates one submission end to end: parse the repo reference,
//! extract claims while the commit history loads, collect tier-1 and
//! tier-2 evidence, score, check eligibility and decide. Fatal
//! per-submission errors become `Unverifiable` reports; they never escape
//! a batch.

use std::sync::Arc;

use futures::StreamExt;
use tokio::time::Instant;

use crate::app::gateway::EvidenceGateway;
use crate::app::{claim_extractor, decision, eligibility, scorer, team, tier1, tier2};
use crate::config::VerifierConfig;
use crate::domain::entities::{
    Claim, CommitTimeline, EventWindow, EvidenceOutcome, RepoRef, SubmissionRecord,
    VerificationReport,
};
use crate::domain::ports::{LanguageModelProvider, RepositoryProvider};
use crate::error::{ProviderError, VerifyError};
use crate::report;

/// The pipeline's public surface: `verify` one submission or
/// `verify_batch` many.
pub struct VerificationPipeline<R, L>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    repo_provider: Arc<R>,
    model_provider: Arc<L>,
    config: VerifierConfig,
}

impl<R, L> VerificationPipeline<R, L>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    pub fn new(repo_provider: Arc<R>, model_provider: Arc<L>, config: VerifierConfig) -> Self {
        Self {
            repo_provider,
            model_provider,
            config,
        }
    }

    /// Verify one submission. Total: every failure mode ends in a report.
    pub async fn verify(
        &self,
        record: &SubmissionRecord,
        window: &EventWindow,
    ) -> VerificationReport {
        let gateway = EvidenceGateway::new(
            Arc::clone(&self.repo_provider),
            Arc::clone(&self.model_provider),
            &self.config,
        );
        let deadline = Instant::now() + self.config.submission_timeout;

        tracing::info!(submission = %record.id, title = %record.title, "Verifying submission");

        let report = match self.run(record, window, &gateway, deadline).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(submission = %record.id, error = %err, "Submission unverifiable");
                VerificationReport::unverifiable(
                    &record.id,
                    &record.title,
                    RepoRef::parse(&record.repo_url),
                    err.to_string(),
                    gateway.usage(),
                )
            }
        };

        tracing::info!(
            submission = %record.id,
            verdict = %report.verdict,
            score = report.score,
            "Verification complete"
        );
        report
    }

    /// Verify many submissions with bounded concurrency. Output order
    /// matches input order; one submission's failure never aborts the rest.
    pub async fn verify_batch(
        &self,
        records: &[SubmissionRecord],
        window: &EventWindow,
    ) -> Vec<VerificationReport> {
        futures::stream::iter(records.iter().map(|record| self.verify(record, window)))
            .buffered(self.config.batch_concurrency.max(1))
            .collect()
            .await
    }

    async fn run(
        &self,
        record: &SubmissionRecord,
        window: &EventWindow,
        gateway: &EvidenceGateway<R, L>,
        deadline: Instant,
    ) -> Result<VerificationReport, VerifyError> {
        let repo = RepoRef::parse(&record.repo_url)
            .ok_or_else(|| VerifyError::InvalidRepoUrl(record.repo_url.clone()))?;

        // Existence check. Only a definite 404 is fatal here; transient
        // metadata failures leave the later fetches to make the call.
        match gateway.get_repository(&repo).await {
            Ok(metadata) => {
                tracing::debug!(repo = %repo, default_branch = %metadata.default_branch, "Repository found");
            }
            Err(ProviderError::NotFound(_)) => {
                return Err(VerifyError::RepositoryNotFound(repo.to_string()));
            }
            Err(err) => {
                tracing::warn!(repo = %repo, error = %err, "Repository metadata unavailable, continuing");
            }
        }

        // Independent fetches run concurrently
        let (claims_result, history_result, snapshot) = tokio::join!(
            claim_extractor::extract_claims(record, gateway, &self.config),
            gateway.get_commit_history(&repo),
            tier1::fetch_snapshot(gateway, &repo),
        );

        let claims = claims_result?;
        let timeline = match history_result {
            Ok(timeline) => timeline,
            // The repo exists but has no reachable commits
            Err(ProviderError::NotFound(_)) => CommitTimeline::default(),
            Err(err) => return Err(VerifyError::HistoryUnavailable(err.to_string())),
        };

        let eligibility = eligibility::check(&timeline, window, self.config.start_tolerance);
        let team = team::attribute(&timeline, window, &record.team_members);

        let tier1_items = tier1::resolve_claims(&claims, &snapshot);

        let unresolved: Vec<Claim> = claims
            .iter()
            .zip(tier1_items.iter())
            .filter(|(_, item)| item.outcome == EvidenceOutcome::Inconclusive)
            .map(|(claim, _)| claim.clone())
            .collect();
        tracing::debug!(
            submission = %record.id,
            total = claims.len(),
            unresolved = unresolved.len(),
            "Tier-1 complete"
        );

        let tier2_items = tier2::analyze(
            &unresolved,
            &snapshot,
            gateway,
            &repo,
            &self.config,
            deadline,
        )
        .await;

        let findings = scorer::resolve_findings(&claims, &tier1_items, &tier2_items);
        let score = scorer::aggregate_score(&findings, &self.config);
        let verdict = decision::decide(&findings, score, &eligibility, &self.config);
        let summary = report::summary(verdict, score, Some(&eligibility), &findings);

        Ok(VerificationReport {
            submission_id: record.id.clone(),
            title: record.title.clone(),
            repo: Some(repo),
            claims: findings,
            score,
            eligibility: Some(eligibility),
            verdict,
            summary,
            team: Some(team),
            usage: gateway.usage(),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Verdict;
    use crate::error::ProviderError;
    use crate::test_utils::{
        test_submission, test_window, MockLanguageModelProvider, MockRepositoryProvider,
    };

    fn pipeline(
        provider: MockRepositoryProvider,
        model: MockLanguageModelProvider,
    ) -> VerificationPipeline<MockRepositoryProvider, MockLanguageModelProvider> {
        VerificationPipeline::new(
            Arc::new(provider),
            Arc::new(model),
            VerifierConfig::default(),
        )
    }

    #[tokio::test]
    async fn invalid_repo_url_is_unverifiable_without_provider_calls() {
        let pipeline = pipeline(
            MockRepositoryProvider::new(),
            MockLanguageModelProvider::new(),
        );
        let mut record = test_submission();
        record.repo_url = "https://devpost.com/software/rocket".to_string();

        let report = pipeline.verify(&record, &test_window()).await;

        assert_eq!(report.verdict, Verdict::Unverifiable);
        assert!(report.error.as_deref().unwrap().contains("invalid repository url"));
        assert_eq!(report.usage.repository_calls, 0);
        assert!(report.repo.is_none());
    }

    #[tokio::test]
    async fn missing_repository_is_unverifiable() {
        let provider = MockRepositoryProvider::new()
            .failing(ProviderError::NotFound("acme/rocket-tracker".to_string()));
        let pipeline = pipeline(provider, MockLanguageModelProvider::new());

        let report = pipeline.verify(&test_submission(), &test_window()).await;

        assert_eq!(report.verdict, Verdict::Unverifiable);
        assert!(report
            .error
            .as_deref()
            .unwrap()
            .contains("repository not found"));
        // The repo reference itself parsed fine
        assert!(report.repo.is_some());
    }

    #[tokio::test]
    async fn batch_preserves_input_order_and_isolates_failures() {
        let provider = MockRepositoryProvider::new().with_timeline_in(&test_window());
        let pipeline = pipeline(provider, MockLanguageModelProvider::new());

        let mut bad = test_submission();
        bad.id = "sub-bad".to_string();
        bad.repo_url = "nonsense".to_string();

        let mut first = test_submission();
        first.id = "sub-a".to_string();
        let mut last = test_submission();
        last.id = "sub-z".to_string();

        let reports = pipeline
            .verify_batch(&[first, bad, last], &test_window())
            .await;

        let ids: Vec<&str> = reports.iter().map(|r| r.submission_id.as_str()).collect();
        assert_eq!(ids, vec!["sub-a", "sub-bad", "sub-z"]);
        assert_eq!(reports[1].verdict, Verdict::Unverifiable);
        assert_ne!(reports[0].verdict, Verdict::Unverifiable);
        assert_ne!(reports[2].verdict, Verdict::Unverifiable);
    }
}
