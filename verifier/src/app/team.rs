//! Team attribution
//!
//! Matches claimed team members against the authors who actually committed
//! during the event window. Name matching is forgiving about case, spaces,
//! hyphens and underscores because git author names rarely match Devpost
//! profiles exactly. Informational only: nothing here moves the score or
//! the verdict.

use std::collections::BTreeMap;

use crate::domain::entities::{CommitTimeline, EventWindow, TeamAttribution};

/// Unlisted authors need more than this many in-window commits before they
/// are called out as contributors
const UNLISTED_COMMIT_THRESHOLD: usize = 2;

/// Compare claimed members against in-window commit authors.
pub fn attribute(
    timeline: &CommitTimeline,
    window: &EventWindow,
    claimed_members: &[String],
) -> TeamAttribution {
    // BTreeMap keeps author iteration deterministic
    let mut commits_per_author: BTreeMap<String, usize> = BTreeMap::new();
    for commit in timeline.commits() {
        if !window.contains(commit.timestamp) {
            continue;
        }
        let Some(author) = commit.author.as_deref() else {
            continue;
        };
        if author.is_empty() {
            continue;
        }
        *commits_per_author.entry(author.to_string()).or_insert(0) += 1;
    }

    let authors: Vec<&str> = commits_per_author.keys().map(|s| s.as_str()).collect();

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for member in claimed_members {
        if authors.iter().any(|author| names_match(member, author)) {
            matched.push(member.clone());
        } else {
            unmatched.push(member.clone());
        }
    }

    let unlisted_contributors: Vec<String> = commits_per_author
        .iter()
        .filter(|(_, count)| **count > UNLISTED_COMMIT_THRESHOLD)
        .filter(|(author, _)| {
            !claimed_members
                .iter()
                .any(|member| names_match(member, author))
        })
        .map(|(author, _)| author.clone())
        .collect();

    TeamAttribution {
        matched,
        unmatched,
        unlisted_contributors,
    }
}

/// Case/space/hyphen/underscore-insensitive comparison; names of four or
/// more cleaned characters also match on containment, so "Jane D" lines up
/// with "janedoe".
fn names_match(a: &str, b: &str) -> bool {
    let a = clean_name(a);
    let b = clean_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    a.len() >= 4 && b.len() >= 4 && (a.contains(&b) || b.contains(&a))
}

fn clean_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-' && *c != '_')
        .collect()
}
