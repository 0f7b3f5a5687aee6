//! Report renderer
//!
//! Builds the one-paragraph verdict reasoning and the human-readable
//! markdown view of a verification report. Everything rendered here is a
//! pure function of the report, so identical runs produce identical text.

use crate::domain::entities::{
    ClaimFinding, EligibilityResult, EligibilityStatus, EvidenceOutcome, VerificationReport,
    Verdict,
};

/// One or two sentences saying why the verdict came out the way it did.
pub fn summary(
    verdict: Verdict,
    score: f64,
    eligibility: Option<&EligibilityResult>,
    findings: &[ClaimFinding],
) -> String {
    match verdict {
        Verdict::Disqualified => match eligibility.map(|e| e.status) {
            Some(EligibilityStatus::NoCommits) => {
                "Disqualified: the default branch has no commits.".to_string()
            }
            Some(EligibilityStatus::PreExistingCode) => {
                let count = eligibility.map(|e| e.violating_commits.len()).unwrap_or(0);
                format!(
                    "Disqualified: {} commit(s) predate the event start.",
                    count
                )
            }
            _ => "Disqualified: failed eligibility checks.".to_string(),
        },
        Verdict::Flagged => {
            if let Some(finding) = first_core_veto(findings) {
                let cause = if finding.outcome == EvidenceOutcome::Refuted {
                    "refuted"
                } else {
                    "unsupported"
                };
                format!(
                    "Flagged: core claim {} ({}). Manual review required.",
                    cause,
                    truncate(&finding.claim.text, 60)
                )
            } else {
                format!(
                    "Flagged: weighted claim score {:.2} fell below the pass threshold.",
                    score
                )
            }
        }
        Verdict::Verified => {
            let confirmed = findings
                .iter()
                .filter(|f| f.outcome == EvidenceOutcome::Confirmed)
                .count();
            format!(
                "Verified: {}/{} claims confirmed (score {:.2}) and the commit timeline is clean.",
                confirmed,
                findings.len(),
                score
            )
        }
        Verdict::Unverifiable => "Verification could not be completed.".to_string(),
    }
}

/// Render a full report to markdown.
pub fn render_report(report: &VerificationReport) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# Verification Report: {}\n\n", report.title));
    buf.push_str(&format!(
        "**Verdict:** {} | **Score:** {:.2}\n",
        report.verdict, report.score
    ));
    if let Some(repo) = &report.repo {
        buf.push_str(&format!("**Repository:** {}\n", repo));
    }
    buf.push('\n');
    buf.push_str(&report.summary);
    buf.push_str("\n\n");

    if let Some(error) = &report.error {
        buf.push_str(&format!("**Error:** {}\n\n", error));
    }

    if !report.claims.is_empty() {
        buf.push_str(&format!("## Claims ({})\n\n", report.claims.len()));
        for finding in &report.claims {
            buf.push_str(&render_finding(finding));
        }
        buf.push('\n');
    }

    if let Some(eligibility) = &report.eligibility {
        buf.push_str("## Timeline\n\n");
        buf.push_str(&format!("- Status: {}\n", eligibility.status));
        buf.push_str(&format!(
            "- Commits in window: {}\n",
            eligibility.commits_in_window
        ));
        buf.push_str(&format!(
            "- Commits after end: {}\n",
            eligibility.commits_after_end
        ));
        if !eligibility.violating_commits.is_empty() {
            buf.push_str(&format!(
                "- Pre-start commits: {}\n",
                eligibility.violating_commits.join(", ")
            ));
        }
        buf.push('\n');
    }

    if let Some(team) = &report.team {
        buf.push_str("## Team\n\n");
        buf.push_str(&format!("- Matched: {}\n", join_or_none(&team.matched)));
        buf.push_str(&format!("- Unmatched: {}\n", join_or_none(&team.unmatched)));
        if !team.unlisted_contributors.is_empty() {
            buf.push_str(&format!(
                "- Unlisted contributors: {}\n",
                team.unlisted_contributors.join(", ")
            ));
        }
        buf.push('\n');
    }

    buf.push_str("---\n");
    buf.push_str(&format!(
        "Provider calls: {} repository, {} model\n",
        report.usage.repository_calls, report.usage.model_calls
    ));

    buf
}

fn render_finding(finding: &ClaimFinding) -> String {
    let marker = match finding.outcome {
        EvidenceOutcome::Confirmed => "[OK]",
        EvidenceOutcome::Refuted => "[X]",
        EvidenceOutcome::Inconclusive => "[?]",
    };

    let mut line = format!(
        "{} {} ({}, {})\n",
        marker,
        truncate(&finding.claim.text, 80),
        finding.claim.category,
        finding.claim.importance
    );

    for item in &finding.evidence {
        line.push_str(&format!(
            "    {}/{}: {}\n",
            item.tier,
            item.basis,
            truncate(&item.detail, 100)
        ));
    }

    line
}

fn first_core_veto(findings: &[ClaimFinding]) -> Option<&ClaimFinding> {
    findings.iter().find(|f| f.is_core_veto())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
