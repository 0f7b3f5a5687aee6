//! Claim extractor
//!
//! Turns a submission into a deduplicated list of falsifiable claims.
//! Declared tags become Core technology claims directly; narrative text is
//! segmented deterministically and each candidate is classified by the
//! language model. Extraction failure means "cannot verify", never
//! "verified clean".

use std::collections::HashSet;

use crate::app::gateway::EvidenceGateway;
use crate::config::VerifierConfig;
use crate::domain::entities::{
    normalize_text, Claim, ClaimCategory, ClaimImportance, NarrativeSection, SubmissionRecord,
};
use crate::domain::ports::{ClaimClassification, LanguageModelProvider, RepositoryProvider};
use crate::error::ExtractionError;

/// Fragments shorter than this carry no verifiable statement
const MIN_CANDIDATE_LEN: usize = 20;

/// Extract the claim set for one submission, tags first, narrative after,
/// deduplicated by normalized text.
pub async fn extract_claims<R, L>(
    record: &SubmissionRecord,
    gateway: &EvidenceGateway<R, L>,
    config: &VerifierConfig,
) -> Result<Vec<Claim>, ExtractionError>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    let mut claims: Vec<Claim> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    // Declared tags are taken at face value as core technology claims;
    // no model call needed to know what "React" asserts
    for tag in &record.tags {
        let normalized = normalize_text(tag);
        if normalized.is_empty() || !seen.insert(normalized) {
            continue;
        }
        claims.push(Claim::new(
            &record.id,
            tag.trim(),
            ClaimCategory::Technology,
            ClaimImportance::Core,
        ));
    }

    for candidate in segment_candidates(&record.narrative, config.max_claim_candidates) {
        let normalized = normalize_text(&candidate);
        if seen.contains(&normalized) {
            continue;
        }
        let classification = classify_with_retry(gateway, &candidate).await?;
        seen.insert(normalized);
        claims.push(Claim::new(
            &record.id,
            candidate,
            classification.category,
            classification.importance,
        ));
    }

    if claims.is_empty() {
        return Err(ExtractionError::EmptyClaimSet);
    }

    tracing::debug!(submission = %record.id, claims = claims.len(), "Extracted claims");
    Ok(claims)
}

/// One extraction-level retry on top of the gateway's transport retries;
/// a second failure gives up on the whole submission.
async fn classify_with_retry<R, L>(
    gateway: &EvidenceGateway<R, L>,
    text: &str,
) -> Result<ClaimClassification, ExtractionError>
where
    R: RepositoryProvider,
    L: LanguageModelProvider,
{
    match gateway.classify(text).await {
        Ok(classification) => Ok(classification),
        Err(first) => {
            tracing::warn!(error = %first, "Claim classification failed, retrying once");
            gateway
                .classify(text)
                .await
                .map_err(|err| ExtractionError::Classification(err.to_string()))
        }
    }
}

/// Deterministic narrative segmentation: line by line, bullets stripped,
/// sentences split on terminator-plus-whitespace, trivial fragments
/// dropped, capped overall.
fn segment_candidates(sections: &[NarrativeSection], cap: usize) -> Vec<String> {
    let mut out = Vec::new();
    for section in sections {
        for line in section.body.lines() {
            let line = line
                .trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•')
                .trim_start();
            for sentence in split_sentences(line) {
                let sentence = sentence.trim();
                if sentence.len() >= MIN_CANDIDATE_LEN {
                    out.push(sentence.to_string());
                    if out.len() == cap {
                        return out;
                    }
                }
            }
        }
    }
    out
}

/// Split on `.` `!` `?` only when followed by whitespace or end of line, so
/// "Next.js" and version numbers survive.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let rest = &text[i + c.len_utf8()..];
            let at_boundary = rest.chars().next().map(char::is_whitespace).unwrap_or(true);
            if at_boundary {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}
