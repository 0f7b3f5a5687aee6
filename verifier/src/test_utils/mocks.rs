//! Mock implementations of port traits
//!
//! Configurable in-memory providers for testing. Mocks are manual rather
//! than generated: the port traits take `&str` and slice parameters that
//! fight mockall's lifetime inference, and scripted builders keep failure
//! injection explicit.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::domain::entities::{
    ClaimCategory, ClaimImportance, CodeExcerpt, CommitRecord, CommitTimeline, EventWindow,
    EvidenceOutcome, FileEntry, RepoMetadata, RepoRef,
};
use crate::domain::ports::{
    Assessment, ClaimClassification, LanguageModelProvider, RepositoryProvider,
};
use crate::error::ProviderError;

// ============================================================================
// Mock Repository Provider
// ============================================================================

/// In-memory repository host. Empty by default; scripted via builders.
pub struct MockRepositoryProvider {
    tree: Vec<FileEntry>,
    files: HashMap<String, Vec<u8>>,
    timeline: CommitTimeline,
    failure: Option<ProviderError>,
    transient_failures: AtomicU32,
}

impl Default for MockRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepositoryProvider {
    pub fn new() -> Self {
        Self {
            tree: Vec::new(),
            files: HashMap::new(),
            timeline: CommitTimeline::default(),
            failure: None,
            transient_failures: AtomicU32::new(0),
        }
    }

    pub fn with_tree(mut self, tree: Vec<FileEntry>) -> Self {
        self.tree = tree;
        self
    }

    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }

    pub fn with_timeline(mut self, timeline: CommitTimeline) -> Self {
        self.timeline = timeline;
        self
    }

    /// Three commits by "jane-doe" spread inside the window
    pub fn with_timeline_in(self, window: &EventWindow) -> Self {
        let commits = vec![
            CommitRecord {
                sha: "c1".to_string(),
                timestamp: window.start + chrono::Duration::hours(1),
                author: Some("jane-doe".to_string()),
            },
            CommitRecord {
                sha: "c2".to_string(),
                timestamp: window.start + chrono::Duration::hours(20),
                author: Some("jane-doe".to_string()),
            },
            CommitRecord {
                sha: "c3".to_string(),
                timestamp: window.start + chrono::Duration::hours(30),
                author: Some("jane-doe".to_string()),
            },
        ];
        self.with_timeline(CommitTimeline::new(commits))
    }

    /// Every call fails with this error
    pub fn failing(mut self, err: ProviderError) -> Self {
        self.failure = Some(err);
        self
    }

    /// The next `count` calls fail with a transport error, then calls
    /// succeed normally
    pub fn with_transient_failures(self, count: u32) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    fn gate(&self) -> Result<(), ProviderError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.take_transient() {
            return Err(ProviderError::Transport(
                "simulated transient failure".to_string(),
            ));
        }
        Ok(())
    }

    fn take_transient(&self) -> bool {
        let mut current = self.transient_failures.load(Ordering::SeqCst);
        while current > 0 {
            match self.transient_failures.compare_exchange(
                current,
                current - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }
}

#[async_trait]
impl RepositoryProvider for MockRepositoryProvider {
    async fn get_repository(&self, repo: &RepoRef) -> Result<RepoMetadata, ProviderError> {
        self.gate()?;
        Ok(RepoMetadata {
            full_name: repo.to_string(),
            default_branch: "main".to_string(),
            created_at: None,
            pushed_at: None,
        })
    }

    async fn get_file_tree(&self, _repo: &RepoRef) -> Result<Vec<FileEntry>, ProviderError> {
        self.gate()?;
        Ok(self.tree.clone())
    }

    async fn get_file_content(
        &self,
        _repo: &RepoRef,
        path: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        self.gate()?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }

    async fn get_commit_history(&self, _repo: &RepoRef) -> Result<CommitTimeline, ProviderError> {
        self.gate()?;
        Ok(self.timeline.clone())
    }
}

// ============================================================================
// Mock Language Model Provider
// ============================================================================

/// Scripted language model. Classification and assessment answers are
/// selected by case-insensitive substring match on the input text; inputs
/// that match nothing get the defaults (secondary feature claims,
/// inconclusive assessments).
pub struct MockLanguageModelProvider {
    classifications: Vec<(String, ClaimClassification)>,
    default_classification: ClaimClassification,
    assessments: Vec<(String, Assessment)>,
    default_assessment: Assessment,
    failure: Option<ProviderError>,
    delay: Option<Duration>,
}

impl Default for MockLanguageModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLanguageModelProvider {
    pub fn new() -> Self {
        Self {
            classifications: Vec::new(),
            default_classification: ClaimClassification {
                category: ClaimCategory::Feature,
                importance: ClaimImportance::Secondary,
            },
            assessments: Vec::new(),
            default_assessment: Assessment {
                outcome: EvidenceOutcome::Inconclusive,
                justification: "no definitive signal in the provided excerpts".to_string(),
            },
            failure: None,
            delay: None,
        }
    }

    /// Inputs containing `matcher` classify as `classification`
    pub fn classifying(mut self, matcher: &str, classification: ClaimClassification) -> Self {
        self.classifications
            .push((matcher.to_lowercase(), classification));
        self
    }

    /// Claims containing `matcher` are assessed as `assessment`
    pub fn assessing(mut self, matcher: &str, assessment: Assessment) -> Self {
        self.assessments.push((matcher.to_lowercase(), assessment));
        self
    }

    /// Every call fails with this error
    pub fn failing(mut self, err: ProviderError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Every call sleeps first; pair with a short gateway timeout
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LanguageModelProvider for MockLanguageModelProvider {
    async fn classify(&self, text: &str) -> Result<ClaimClassification, ProviderError> {
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let lower = text.to_lowercase();
        Ok(self
            .classifications
            .iter()
            .find(|(matcher, _)| lower.contains(matcher))
            .map(|(_, classification)| *classification)
            .unwrap_or(self.default_classification))
    }

    async fn assess(
        &self,
        claim_text: &str,
        _excerpts: &[CodeExcerpt],
    ) -> Result<Assessment, ProviderError> {
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let lower = claim_text.to_lowercase();
        Ok(self
            .assessments
            .iter()
            .find(|(matcher, _)| lower.contains(matcher))
            .map(|(_, assessment)| assessment.clone())
            .unwrap_or_else(|| self.default_assessment.clone()))
    }
}
