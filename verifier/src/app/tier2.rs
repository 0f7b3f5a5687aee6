//! Tier-2 deep-dive analyzer
//!
//! Model-assisted verification for claims tier-1 left unsettled. Planning
//! is sequential and deterministic: each claim (in claim order) gets up to
//! `tier2_max_files` candidate files chosen by path relevance, charged
//! against a per-submission byte budget. Execution is concurrent but
//! bounded, and every call sits under the submission deadline.
//!
//! Fails soft everywhere: a provider failure, a blown budget or an expired
//! deadline degrades the claim to `Inconclusive` with the matching basis,
//! never to `Confirmed`.

use futures::StreamExt;
use tokio::time::Instant;

use crate::app::gateway::EvidenceGateway;
use crate::app::tech_catalog;
use crate::app::tier1::RepoSnapshot;
use crate::config::VerifierConfig;
use crate::domain::entities::{
    normalize_text, Claim, ClaimId, CodeExcerpt, EvidenceBasis, EvidenceItem, EvidenceOutcome,
    EvidenceTier, FileEntry, RepoRef,
};
use crate::domain::ports::{LanguageModelProvider, RepositoryProvider};

/// Files larger than this are never selected as excerpt candidates
const MAX_CANDIDATE_BYTES: u64 = 512 * 1024;

/// Extensions that cannot contain readable source
const SKIP_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "svg", "pdf", "zip", "gz", "tar", "woff", "woff2", "ttf",
    "eot", "mp3", "mp4", "webm", "lock", "map", "min",
];

/// Extensions that mark a file as source code (small relevance boost)
const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "ts", "tsx", "js", "jsx", "py", "go", "java", "kt", "swift", "c", "cc", "cpp", "h",
    "hpp", "cs", "rb", "php", "vue", "dart", "sol", "ino",
];

/// Claim-text tokens too generic to steer file selection
const STOPWORDS: &[&str] = &[
    "the", "and", "with", "that", "this", "for", "our", "from", "using", "used", "built", "into",
    "have", "has", "can", "will", "all", "are", "was", "were", "its", "app", "via", "your",
];

#[derive(Debug)]
enum Plan {
    /// Fetch these (path, charge) pairs and ask the model
    Assess(Vec<(String, u64)>),
    /// Nothing in the tree looked relevant; no model call spent
    NoCandidates,
    /// The byte budget ran out before this claim's turn
    OverBudget,
}

/// Run deep verification for the given claims, one evidence item each,
/// in claim order.
pub async fn analyze<R, L>(
    claims: &[Claim],
    snapshot: &RepoSnapshot,
    gateway: &EvidenceGateway<R, L>,
    repo: &RepoRef,
    config: &VerifierConfig,
    deadline: Instant,
) -> Vec<EvidenceItem>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    // Sequential planning keeps budget charging deterministic
    let mut budget = config.tier2_byte_budget as u64;
    let plans: Vec<(ClaimId, String, Plan)> = claims
        .iter()
        .map(|claim| {
            let candidates = select_paths(claim, &snapshot.tree, config);
            let plan = if candidates.is_empty() {
                Plan::NoCandidates
            } else {
                let charge: u64 = candidates.iter().map(|(_, c)| *c).sum();
                if charge > budget {
                    Plan::OverBudget
                } else {
                    budget -= charge;
                    Plan::Assess(candidates)
                }
            };
            (claim.id, claim.text.clone(), plan)
        })
        .collect();

    futures::stream::iter(plans.into_iter().map(|(claim_id, text, plan)| {
        run_plan(claim_id, text, plan, gateway, repo, config, deadline)
    }))
    .buffered(config.tier2_concurrency.max(1))
    .collect()
    .await
}

async fn run_plan<R, L>(
    claim_id: ClaimId,
    claim_text: String,
    plan: Plan,
    gateway: &EvidenceGateway<R, L>,
    repo: &RepoRef,
    config: &VerifierConfig,
    deadline: Instant,
) -> EvidenceItem
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    let paths = match plan {
        Plan::NoCandidates => {
            return degraded(
                claim_id,
                EvidenceBasis::MetadataScan,
                "no candidate files matched the claim".to_string(),
            );
        }
        Plan::OverBudget => {
            return degraded(
                claim_id,
                EvidenceBasis::BudgetExhausted,
                "byte budget exhausted before this claim".to_string(),
            );
        }
        Plan::Assess(paths) => paths,
    };

    if Instant::now() >= deadline {
        return degraded(
            claim_id,
            EvidenceBasis::Deadline,
            "submission deadline reached before assessment".to_string(),
        );
    }

    let work = assess_claim(claim_id, &claim_text, &paths, gateway, repo, config);
    match tokio::time::timeout_at(deadline, work).await {
        Ok(item) => item,
        Err(_) => degraded(
            claim_id,
            EvidenceBasis::Deadline,
            "submission deadline reached before assessment".to_string(),
        ),
    }
}

async fn assess_claim<R, L>(
    claim_id: ClaimId,
    claim_text: &str,
    paths: &[(String, u64)],
    gateway: &EvidenceGateway<R, L>,
    repo: &RepoRef,
    config: &VerifierConfig,
) -> EvidenceItem
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    let mut excerpts = Vec::with_capacity(paths.len());
    let mut last_fetch_error = None;
    for (path, _) in paths {
        match gateway.get_file_content(repo, path).await {
            Ok(mut bytes) => {
                bytes.truncate(config.tier2_file_bytes);
                excerpts.push(CodeExcerpt {
                    path: path.clone(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "Skipping unreadable excerpt candidate");
                last_fetch_error = Some(err);
            }
        }
    }

    if excerpts.is_empty() {
        let reason = last_fetch_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no content".to_string());
        return degraded(
            claim_id,
            EvidenceBasis::ProviderFailure,
            format!("candidate files could not be read: {}", reason),
        );
    }

    match gateway.assess(claim_text, &excerpts).await {
        Ok(assessment) => EvidenceItem {
            claim_id,
            tier: EvidenceTier::Tier2,
            outcome: assessment.outcome,
            basis: EvidenceBasis::ModelAssessment,
            detail: assessment.justification,
        },
        Err(err) => degraded(
            claim_id,
            EvidenceBasis::ProviderFailure,
            format!("assessment failed: {}", err),
        ),
    }
}

fn degraded(claim_id: ClaimId, basis: EvidenceBasis, detail: String) -> EvidenceItem {
    EvidenceItem {
        claim_id,
        tier: EvidenceTier::Tier2,
        outcome: EvidenceOutcome::Inconclusive,
        basis,
        detail,
    }
}

/// Pick the most relevant readable files for a claim, with the bytes each
/// will be charged at. Pure and deterministic: score descending, then path
/// ascending.
fn select_paths(claim: &Claim, tree: &[FileEntry], config: &VerifierConfig) -> Vec<(String, u64)> {
    let tokens = claim_tokens(&claim.text);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(i32, &FileEntry)> = tree
        .iter()
        .filter(|entry| entry.size > 0 && entry.size <= MAX_CANDIDATE_BYTES)
        .filter(|entry| {
            entry
                .extension()
                .map(|ext| !SKIP_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(true)
        })
        .filter_map(|entry| {
            let score = score_path(entry, &tokens);
            (score > 0).then_some((score, entry))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.path.cmp(&b.1.path)));

    scored
        .into_iter()
        .take(config.tier2_max_files)
        .map(|(_, entry)| {
            let charge = entry.size.min(config.tier2_file_bytes as u64);
            (entry.path.clone(), charge)
        })
        .collect()
}

fn score_path(entry: &FileEntry, tokens: &[String]) -> i32 {
    let path_lower = entry.path.to_lowercase();
    let name_lower = entry.file_name().to_lowercase();
    let name_stem = name_lower.split('.').next().unwrap_or("");

    let mut score = 0;
    for token in tokens {
        if token_matches(name_stem, token) {
            score += 3;
        } else if path_lower
            .split('/')
            .any(|segment| token_matches(segment, token))
            || path_lower.contains(token.as_str())
        {
            score += 2;
        }
    }

    // Prefer actual source over docs and configs when relevance ties
    if score > 0
        && entry
            .extension()
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    {
        score += 1;
    }

    score
}

/// A path part matches a token when either is a prefix of the other, so
/// `auth.ts` lines up with "authentication" and `payments.rs` with
/// "payments".
fn token_matches(part: &str, token: &str) -> bool {
    part.len() >= 3 && token.len() >= 3 && (part.starts_with(token) || token.starts_with(part))
}

/// Tokens worth hunting for in paths: catalog keywords when the claim names
/// a known technology, plus the claim's own significant words.
fn claim_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    if let Some(sig) = tech_catalog::lookup(text) {
        tokens.push(sig.name.to_string());
        tokens.extend(sig.keywords.iter().map(|k| k.to_string()));
    }

    tokens.extend(
        normalize_text(text)
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| w.len() >= 3 && !STOPWORDS.contains(w))
            .map(|w| w.to_string()),
    );

    let mut seen = std::collections::HashSet::new();
    tokens.retain(|t| seen.insert(t.clone()));
    tokens
}
