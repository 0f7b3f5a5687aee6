//! Repository reference and file-level domain types
//!
//! A `RepoRef` identifies a hosted repository; `FileEntry` and `CodeExcerpt`
//! describe what the pipeline reads out of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner/name pair identifying a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a repository reference out of a submission's repo URL.
    ///
    /// Accepts https and ssh forms; trailing `.git` and slashes are stripped.
    /// Returns `None` for anything that does not point at a repository.
    pub fn parse(url: &str) -> Option<Self> {
        let pattern = regex::Regex::new(r"github\.com[:/]([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)")
            .ok()?;
        let caps = pattern.captures(url)?;
        let owner = caps.get(1)?.as_str().to_string();
        let name = caps
            .get(2)?
            .as_str()
            .trim_end_matches('/')
            .trim_end_matches(".git")
            .to_string();
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self { owner, name })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository metadata as reported by the hosting provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub full_name: String,
    pub default_branch: String,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// One blob in the repository file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
}

impl FileEntry {
    /// Final path segment, e.g. `package.json` for `web/package.json`
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension without the dot, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// A bounded slice of file content handed to the deep-dive analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExcerpt {
    pub path: String,
    pub content: String,
}
