//! Repository provider port trait
//!
//! Defines the read-only interface for inspecting a hosted repository.
//! Adapters provide concrete implementations (GitHub in production).

use async_trait::async_trait;

use crate::domain::entities::{CommitTimeline, FileEntry, RepoMetadata, RepoRef};
use crate::error::ProviderError;

/// Read-only access to a hosted repository.
///
/// Every call is idempotent, which is what makes blind retries safe.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Repository metadata; `ProviderError::NotFound` if it does not exist.
    async fn get_repository(&self, repo: &RepoRef) -> Result<RepoMetadata, ProviderError>;

    /// Full recursive file tree of the default branch with blob sizes.
    async fn get_file_tree(&self, repo: &RepoRef) -> Result<Vec<FileEntry>, ProviderError>;

    /// Raw content of one file on the default branch.
    async fn get_file_content(&self, repo: &RepoRef, path: &str)
        -> Result<Vec<u8>, ProviderError>;

    /// Default-branch commit history, oldest first.
    async fn get_commit_history(&self, repo: &RepoRef) -> Result<CommitTimeline, ProviderError>;
}
