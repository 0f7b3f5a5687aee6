//! Comparator/scorer
//!
//! Folds each claim's evidence into one final outcome, then aggregates the
//! outcomes into a weighted score in [0, 1].
//!
//! Outcome precedence per claim: a decisive tier-2 answer beats tier-1,
//! a decisive tier-1 answer beats nothing, anything else stays
//! inconclusive. A core claim that a completed model assessment could not
//! support vetoes verification exactly like a refuted one; an inconclusive
//! that merely records a degraded check stays neutral for every importance.

use std::collections::HashMap;

use crate::config::VerifierConfig;
use crate::domain::entities::{Claim, ClaimFinding, ClaimId, EvidenceItem, EvidenceOutcome};

/// Pair every claim with its evidence (at most one item per tier) and its
/// settled outcome, in claim order.
pub fn resolve_findings(
    claims: &[Claim],
    tier1: &[EvidenceItem],
    tier2: &[EvidenceItem],
) -> Vec<ClaimFinding> {
    let tier1_by_id: HashMap<ClaimId, &EvidenceItem> =
        tier1.iter().map(|item| (item.claim_id, item)).collect();
    let tier2_by_id: HashMap<ClaimId, &EvidenceItem> =
        tier2.iter().map(|item| (item.claim_id, item)).collect();

    claims
        .iter()
        .map(|claim| {
            let mut evidence = Vec::with_capacity(2);
            if let Some(item) = tier1_by_id.get(&claim.id) {
                evidence.push((*item).clone());
            }
            if let Some(item) = tier2_by_id.get(&claim.id) {
                evidence.push((*item).clone());
            }
            let outcome = final_outcome(&evidence);
            ClaimFinding {
                claim: claim.clone(),
                evidence,
                outcome,
            }
        })
        .collect()
}

/// Later tiers win when decisive; otherwise the claim stays inconclusive.
fn final_outcome(evidence: &[EvidenceItem]) -> EvidenceOutcome {
    evidence
        .iter()
        .rev()
        .find(|item| item.outcome.is_decisive())
        .map(|item| item.outcome)
        .unwrap_or(EvidenceOutcome::Inconclusive)
}

/// Weighted aggregate over all findings. Total: an empty claim set scores
/// exactly neutral. Any vetoing core claim caps the result at neutral no
/// matter what the rest confirmed.
pub fn aggregate_score(findings: &[ClaimFinding], config: &VerifierConfig) -> f64 {
    if findings.is_empty() {
        return config.neutral_score;
    }

    let mut weight_sum = 0.0;
    let mut weighted = 0.0;
    for finding in findings {
        let weight = finding.claim.importance.weight();
        weight_sum += weight;
        weighted += weight * indicator(finding, config);
    }

    let mut score = if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        config.neutral_score
    };

    if has_vetoed_core(findings) {
        score = score.min(config.neutral_score);
    }

    score
}

/// Whether any core claim blocks verification: refuted, or left
/// unsupported by a completed model assessment.
pub fn has_vetoed_core(findings: &[ClaimFinding]) -> bool {
    findings.iter().any(ClaimFinding::is_core_veto)
}

fn indicator(finding: &ClaimFinding, config: &VerifierConfig) -> f64 {
    match finding.outcome {
        EvidenceOutcome::Confirmed => 1.0,
        EvidenceOutcome::Refuted => 0.0,
        EvidenceOutcome::Inconclusive => {
            if finding.is_core_veto() {
                0.0
            } else {
                config.neutral_score
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ClaimCategory, ClaimImportance, EvidenceBasis, EvidenceTier};

    fn claim(text: &str, importance: ClaimImportance) -> Claim {
        Claim::new("sub-1", text, ClaimCategory::Technology, importance)
    }

    fn item(
        claim: &Claim,
        tier: EvidenceTier,
        outcome: EvidenceOutcome,
        basis: EvidenceBasis,
    ) -> EvidenceItem {
        EvidenceItem {
            claim_id: claim.id,
            tier,
            outcome,
            basis,
            detail: String::new(),
        }
    }

    fn finding(claim: Claim, evidence: Vec<EvidenceItem>) -> ClaimFinding {
        let outcome = final_outcome(&evidence);
        ClaimFinding {
            claim,
            evidence,
            outcome,
        }
    }

    #[test]
    fn tier2_decisive_beats_tier1() {
        let c = claim("react", ClaimImportance::Core);
        let evidence = vec![
            item(
                &c,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            ),
            item(
                &c,
                EvidenceTier::Tier2,
                EvidenceOutcome::Refuted,
                EvidenceBasis::ModelAssessment,
            ),
        ];
        assert_eq!(final_outcome(&evidence), EvidenceOutcome::Refuted);
    }

    #[test]
    fn tier1_settles_when_tier2_is_inconclusive() {
        let c = claim("react", ClaimImportance::Core);
        let evidence = vec![
            item(
                &c,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            ),
            item(
                &c,
                EvidenceTier::Tier2,
                EvidenceOutcome::Inconclusive,
                EvidenceBasis::ProviderFailure,
            ),
        ];
        assert_eq!(final_outcome(&evidence), EvidenceOutcome::Confirmed);
    }

    #[test]
    fn all_confirmed_scores_one() {
        let config = VerifierConfig::default();
        let findings: Vec<ClaimFinding> = [
            ClaimImportance::Core,
            ClaimImportance::Secondary,
            ClaimImportance::Minor,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, importance)| {
            let c = claim(&format!("tech {}", i), importance);
            let e = item(
                &c,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            );
            finding(c, vec![e])
        })
        .collect();

        assert_eq!(aggregate_score(&findings, &config), 1.0);
    }

    #[test]
    fn all_refuted_scores_zero() {
        let config = VerifierConfig::default();
        let c = claim("tensorflow", ClaimImportance::Secondary);
        let e = item(
            &c,
            EvidenceTier::Tier2,
            EvidenceOutcome::Refuted,
            EvidenceBasis::ModelAssessment,
        );
        let findings = vec![finding(c, vec![e])];

        assert_eq!(aggregate_score(&findings, &config), 0.0);
    }

    #[test]
    fn weighted_average_mixes_outcomes() {
        let config = VerifierConfig::default();
        let core = claim("react", ClaimImportance::Core);
        let core_e = item(
            &core,
            EvidenceTier::Tier1,
            EvidenceOutcome::Confirmed,
            EvidenceBasis::DependencyManifest,
        );
        let minor = claim("tailwind", ClaimImportance::Minor);
        let minor_e = item(
            &minor,
            EvidenceTier::Tier2,
            EvidenceOutcome::Refuted,
            EvidenceBasis::ModelAssessment,
        );
        let findings = vec![finding(core, vec![core_e]), finding(minor, vec![minor_e])];

        // (1.0 * 1.0 + 0.3 * 0.0) / 1.3
        let score = aggregate_score(&findings, &config);
        assert!((score - (1.0 / 1.3)).abs() < 1e-9);
    }

    #[test]
    fn refuted_core_caps_score_at_neutral() {
        let config = VerifierConfig::default();
        let core = claim("tensorflow", ClaimImportance::Core);
        let core_e = item(
            &core,
            EvidenceTier::Tier2,
            EvidenceOutcome::Refuted,
            EvidenceBasis::ModelAssessment,
        );
        let mut findings = vec![finding(core, vec![core_e])];
        for i in 0..5 {
            let c = claim(&format!("tech {}", i), ClaimImportance::Secondary);
            let e = item(
                &c,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            );
            findings.push(finding(c, vec![e]));
        }

        let score = aggregate_score(&findings, &config);
        assert!(score <= config.neutral_score);
        assert!(has_vetoed_core(&findings));
    }

    #[test]
    fn degraded_inconclusive_stays_neutral_even_for_core() {
        let config = VerifierConfig::default();
        let core = claim("custom ml pipeline", ClaimImportance::Core);
        let e = item(
            &core,
            EvidenceTier::Tier2,
            EvidenceOutcome::Inconclusive,
            EvidenceBasis::ProviderFailure,
        );
        let findings = vec![finding(core, vec![e])];

        assert_eq!(aggregate_score(&findings, &config), config.neutral_score);
        assert!(!has_vetoed_core(&findings));
    }

    #[test]
    fn unsupported_core_after_assessment_scores_zero() {
        let config = VerifierConfig::default();
        let core = claim("custom ml pipeline", ClaimImportance::Core);
        let e = item(
            &core,
            EvidenceTier::Tier2,
            EvidenceOutcome::Inconclusive,
            EvidenceBasis::ModelAssessment,
        );
        let findings = vec![finding(core, vec![e])];

        assert_eq!(aggregate_score(&findings, &config), 0.0);
        assert!(has_vetoed_core(&findings));
    }

    #[test]
    fn unsupported_core_caps_score_despite_confirmed_claims() {
        let config = VerifierConfig::default();
        let core = claim("custom ml pipeline", ClaimImportance::Core);
        let core_e = item(
            &core,
            EvidenceTier::Tier2,
            EvidenceOutcome::Inconclusive,
            EvidenceBasis::ModelAssessment,
        );
        let mut findings = vec![finding(core, vec![core_e])];
        for i in 0..3 {
            let c = claim(&format!("tech {}", i), ClaimImportance::Secondary);
            let e = item(
                &c,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            );
            findings.push(finding(c, vec![e]));
        }

        // Uncapped this averages 1.8 / 2.8, comfortably above the threshold
        let score = aggregate_score(&findings, &config);
        assert!(score <= config.neutral_score);
        assert!(has_vetoed_core(&findings));
    }

    #[test]
    fn empty_findings_score_neutral() {
        let config = VerifierConfig::default();
        assert_eq!(aggregate_score(&[], &config), config.neutral_score);
    }

    #[test]
    fn resolve_findings_pairs_claims_with_their_evidence() {
        let config = VerifierConfig::default();
        let a = claim("react", ClaimImportance::Core);
        let b = claim("real-time sync", ClaimImportance::Secondary);
        let tier1 = vec![
            item(
                &a,
                EvidenceTier::Tier1,
                EvidenceOutcome::Confirmed,
                EvidenceBasis::DependencyManifest,
            ),
            item(
                &b,
                EvidenceTier::Tier1,
                EvidenceOutcome::Inconclusive,
                EvidenceBasis::MetadataScan,
            ),
        ];
        let tier2 = vec![item(
            &b,
            EvidenceTier::Tier2,
            EvidenceOutcome::Confirmed,
            EvidenceBasis::ModelAssessment,
        )];

        let findings = resolve_findings(&[a.clone(), b.clone()], &tier1, &tier2);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].claim.id, a.id);
        assert_eq!(findings[0].evidence.len(), 1);
        assert_eq!(findings[0].outcome, EvidenceOutcome::Confirmed);
        assert_eq!(findings[1].evidence.len(), 2);
        assert_eq!(findings[1].outcome, EvidenceOutcome::Confirmed);
        assert_eq!(aggregate_score(&findings, &config), 1.0);
    }
}
