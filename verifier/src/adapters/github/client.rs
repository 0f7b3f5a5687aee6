//! GitHub API client implementation

use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use urlencoding::encode;

use crate::config::ProviderConfig;
use crate::domain::entities::{CommitRecord, CommitTimeline, FileEntry, RepoMetadata, RepoRef};
use crate::domain::ports::RepositoryProvider;
use crate::error::ProviderError;

const PER_PAGE: usize = 100;

/// Implementation of the repository provider against the GitHub REST API
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    // The tree endpoint needs a branch name; one metadata fetch per repo
    // is enough, so remember it
    default_branches: RwLock<HashMap<String, String>>,
}

impl GithubClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        // GitHub rejects requests without a User-Agent
        let http = Client::builder()
            .user_agent("hackcheck-verifier")
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            http,
            base_url: config.github_base_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
            default_branches: RwLock::new(HashMap::new()),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string()))
        } else if status.as_u16() == 404 {
            Err(ProviderError::NotFound(response.url().path().to_string()))
        } else if status.as_u16() == 429 || is_rate_limit(&response) {
            Err(ProviderError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::Transport(format!(
                "github returned {}: {}",
                status, message
            )))
        }
    }

    async fn default_branch(&self, repo: &RepoRef) -> Result<String, ProviderError> {
        let key = repo.to_string();
        if let Ok(cache) = self.default_branches.read() {
            if let Some(branch) = cache.get(&key) {
                return Ok(branch.clone());
            }
        }

        let metadata = self.get_repository(repo).await?;
        if let Ok(mut cache) = self.default_branches.write() {
            cache.insert(key, metadata.default_branch.clone());
        }
        Ok(metadata.default_branch)
    }

    async fn fetch_commit_page(
        &self,
        repo: &RepoRef,
        page: usize,
    ) -> Result<Vec<CommitResponse>, ProviderError> {
        let resp = self
            .get(&self.api_url(&format!(
                "/repos/{}/{}/commits?per_page={}&page={}",
                repo.owner, repo.name, PER_PAGE, page
            )))
            .send()
            .await?;

        // An empty repository has no commits to page through
        if resp.status().as_u16() == 409 {
            return Ok(Vec::new());
        }

        self.handle_response(resp).await
    }
}

/// Drain a paged listing completely. The API serves newest entries first,
/// so stopping early would drop exactly the oldest history; keep
/// requesting pages until a short page marks the end. A failed page fails
/// the whole fetch so a partial timeline is never mistaken for the full
/// one.
async fn drain_pages<T, F, Fut>(per_page: usize, mut fetch: F) -> Result<Vec<T>, ProviderError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ProviderError>>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch(page).await?;
        let batch_len = batch.len();
        items.extend(batch);
        if batch_len < per_page {
            return Ok(items);
        }
        page += 1;
    }
}

/// GitHub serves rate-limit violations as 403 with a drained quota header
fn is_rate_limit(response: &reqwest::Response) -> bool {
    response.status().as_u16() == 403
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false)
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Response types from the GitHub API
#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    default_branch: String,
    created_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
}

impl From<RepoResponse> for RepoMetadata {
    fn from(r: RepoResponse) -> Self {
        RepoMetadata {
            full_name: r.full_name,
            default_branch: r.default_branch,
            created_at: r.created_at,
            pushed_at: r.pushed_at,
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntryResponse>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntryResponse {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    size: u64,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: Option<String>,
    #[serde(default)]
    encoding: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
    author: Option<AuthorAccount>,
}

#[derive(Deserialize)]
struct CommitDetail {
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct AuthorAccount {
    login: String,
}

impl CommitResponse {
    /// Prefer the GitHub account login over the raw git author name
    fn into_record(self) -> Option<CommitRecord> {
        let timestamp = self.commit.author.as_ref().and_then(|a| a.date)?;
        let author = self
            .author
            .map(|a| a.login)
            .or_else(|| self.commit.author.and_then(|a| a.name));
        Some(CommitRecord {
            sha: self.sha,
            timestamp,
            author,
        })
    }
}

#[async_trait]
impl RepositoryProvider for GithubClient {
    async fn get_repository(&self, repo: &RepoRef) -> Result<RepoMetadata, ProviderError> {
        let resp = self
            .get(&self.api_url(&format!("/repos/{}/{}", repo.owner, repo.name)))
            .send()
            .await?;

        let metadata: RepoResponse = self.handle_response(resp).await?;
        Ok(metadata.into())
    }

    async fn get_file_tree(&self, repo: &RepoRef) -> Result<Vec<FileEntry>, ProviderError> {
        let branch = self.default_branch(repo).await?;
        let resp = self
            .get(&self.api_url(&format!(
                "/repos/{}/{}/git/trees/{}?recursive=1",
                repo.owner,
                repo.name,
                encode(&branch)
            )))
            .send()
            .await?;

        // An empty repository has no tree to list
        if resp.status().as_u16() == 409 {
            return Ok(Vec::new());
        }

        let tree: TreeResponse = self.handle_response(resp).await?;
        if tree.truncated {
            tracing::warn!(repo = %repo, "File tree truncated by GitHub, evidence may be partial");
        }

        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| entry.entry_type == "blob")
            .map(|entry| FileEntry {
                path: entry.path,
                size: entry.size,
            })
            .collect())
    }

    async fn get_file_content(
        &self,
        repo: &RepoRef,
        path: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let resp = self
            .get(&self.api_url(&format!(
                "/repos/{}/{}/contents/{}",
                repo.owner,
                repo.name,
                encode_path(path)
            )))
            .send()
            .await?;

        let content: ContentResponse = self.handle_response(resp).await?;
        if content.encoding != "base64" {
            return Err(ProviderError::Malformed(format!(
                "unexpected content encoding for {}: {:?}",
                path, content.encoding
            )));
        }
        let raw = content
            .content
            .ok_or_else(|| ProviderError::Malformed(format!("no content for {}", path)))?;

        // GitHub wraps the base64 payload at 60 columns
        let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(stripped)
            .map_err(|e| ProviderError::Malformed(format!("invalid base64 for {}: {}", path, e)))
    }

    async fn get_commit_history(&self, repo: &RepoRef) -> Result<CommitTimeline, ProviderError> {
        let pages = drain_pages(PER_PAGE, |page| self.fetch_commit_page(repo, page)).await?;

        Ok(CommitTimeline::new(
            pages
                .into_iter()
                .filter_map(CommitResponse::into_record)
                .collect(),
        ))
    }
}
