//! Tier-1 evidence collector
//!
//! Cheap verification from repository metadata only: dependency manifests,
//! marker files and the extension histogram of the file tree. Never calls
//! the language model, so it still works when that provider is down.
//!
//! Absence of a manifest entry is not proof of absence, so tier-1 only ever
//! answers `Confirmed` or `Inconclusive`; refutation is tier-2's job.

use crate::app::gateway::EvidenceGateway;
use crate::app::tech_catalog;
use crate::domain::entities::{
    normalize_text, Claim, ClaimCategory, EvidenceBasis, EvidenceItem, EvidenceOutcome,
    EvidenceTier, FileEntry, RepoRef,
};
use crate::domain::ports::{LanguageModelProvider, RepositoryProvider};

/// Manifests fetched per run; anything past this is ignored
const MAX_MANIFEST_FETCHES: usize = 8;

/// Manifests deeper than this many directories are ignored
const MAX_MANIFEST_DEPTH: usize = 2;

/// Everything tier-1 needs, fetched once per run and shared across claims
#[derive(Debug, Default)]
pub struct RepoSnapshot {
    pub tree: Vec<FileEntry>,
    /// (path, content) of the dependency manifests found in the tree
    pub manifests: Vec<(String, String)>,
    /// Set when the tree could not be fetched; technology claims then
    /// degrade instead of pretending the repository is empty
    pub tree_error: Option<String>,
}

/// Fetch the file tree and the manifest contents for one run.
///
/// Individual manifest fetch failures are logged and skipped; only a failed
/// tree fetch marks the snapshot degraded.
pub async fn fetch_snapshot<R, L>(gateway: &EvidenceGateway<R, L>, repo: &RepoRef) -> RepoSnapshot
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    let tree = match gateway.get_file_tree(repo).await {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(repo = %repo, error = %err, "File tree unavailable");
            return RepoSnapshot {
                tree: Vec::new(),
                manifests: Vec::new(),
                tree_error: Some(err.to_string()),
            };
        }
    };

    let manifest_paths: Vec<String> = tree
        .iter()
        .filter(|entry| {
            tech_catalog::is_manifest(entry.file_name())
                && entry.path.matches('/').count() <= MAX_MANIFEST_DEPTH
        })
        .map(|entry| entry.path.clone())
        .take(MAX_MANIFEST_FETCHES)
        .collect();

    let mut manifests = Vec::with_capacity(manifest_paths.len());
    for path in manifest_paths {
        match gateway.get_file_content(repo, &path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                manifests.push((path, content));
            }
            Err(err) => {
                tracing::warn!(repo = %repo, path = %path, error = %err, "Skipping unreadable manifest");
            }
        }
    }

    tracing::debug!(
        repo = %repo,
        tree_entries = tree.len(),
        manifests = manifests.len(),
        "Repository snapshot ready"
    );

    RepoSnapshot {
        tree,
        manifests,
        tree_error: None,
    }
}

/// Resolve every claim against the snapshot. Pure; one item per claim.
pub fn resolve_claims(claims: &[Claim], snapshot: &RepoSnapshot) -> Vec<EvidenceItem> {
    claims
        .iter()
        .map(|claim| resolve_claim(claim, snapshot))
        .collect()
}

fn resolve_claim(claim: &Claim, snapshot: &RepoSnapshot) -> EvidenceItem {
    match claim.category {
        ClaimCategory::Technology => resolve_technology_claim(claim, snapshot),
        ClaimCategory::Feature | ClaimCategory::Complexity => EvidenceItem {
            claim_id: claim.id,
            tier: EvidenceTier::Tier1,
            outcome: EvidenceOutcome::Inconclusive,
            basis: EvidenceBasis::MetadataScan,
            detail: format!(
                "{} claims cannot be settled from metadata alone",
                claim.category
            ),
        },
    }
}

fn resolve_technology_claim(claim: &Claim, snapshot: &RepoSnapshot) -> EvidenceItem {
    if let Some(err) = &snapshot.tree_error {
        return EvidenceItem {
            claim_id: claim.id,
            tier: EvidenceTier::Tier1,
            outcome: EvidenceOutcome::Inconclusive,
            basis: EvidenceBasis::ProviderFailure,
            detail: format!("file tree unavailable: {}", err),
        };
    }

    let signature = tech_catalog::lookup(&claim.text);

    // Keywords to hunt for in manifests; unknown technologies fall back to
    // the claim text itself
    let fallback = [normalize_text(&claim.text)];
    let keywords: Vec<&str> = match signature {
        Some(sig) if !sig.keywords.is_empty() => sig.keywords.to_vec(),
        _ => fallback.iter().map(|s| s.as_str()).collect(),
    };

    for (path, content) in &snapshot.manifests {
        let content_lower = content.to_lowercase();
        if let Some(keyword) = keywords.iter().find(|kw| content_lower.contains(**kw)) {
            return EvidenceItem {
                claim_id: claim.id,
                tier: EvidenceTier::Tier1,
                outcome: EvidenceOutcome::Confirmed,
                basis: EvidenceBasis::DependencyManifest,
                detail: format!("\"{}\" matched in {}", keyword, path),
            };
        }
    }

    if let Some(sig) = signature {
        for marker in sig.marker_files {
            if snapshot.tree.iter().any(|entry| entry.file_name() == *marker) {
                return EvidenceItem {
                    claim_id: claim.id,
                    tier: EvidenceTier::Tier1,
                    outcome: EvidenceOutcome::Confirmed,
                    basis: EvidenceBasis::FileExtension,
                    detail: format!("repository contains {}", marker),
                };
            }
        }

        for ext in sig.extensions {
            let count = snapshot
                .tree
                .iter()
                .filter(|entry| entry.extension().as_deref() == Some(*ext))
                .count();
            if count > 0 {
                return EvidenceItem {
                    claim_id: claim.id,
                    tier: EvidenceTier::Tier1,
                    outcome: EvidenceOutcome::Confirmed,
                    basis: EvidenceBasis::FileExtension,
                    detail: format!("{} .{} file(s) in tree", count, ext),
                };
            }
        }
    }

    EvidenceItem {
        claim_id: claim.id,
        tier: EvidenceTier::Tier1,
        outcome: EvidenceOutcome::Inconclusive,
        basis: EvidenceBasis::MetadataScan,
        detail: "no trace in manifests, markers or file extensions".to_string(),
    }
}
