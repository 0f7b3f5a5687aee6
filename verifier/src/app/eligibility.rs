//! Eligibility checker
//!
//! Pure timeline arithmetic: did the work happen inside the event window?
//! A commit strictly earlier than start minus tolerance is pre-existing
//! code. Commits after the end are counted for the report but never
//! disqualify on their own; judging may legitimately run after the bell.

use crate::domain::entities::{CommitTimeline, EligibilityResult, EligibilityStatus, EventWindow};

/// Check a commit timeline against the event window.
pub fn check(
    timeline: &CommitTimeline,
    window: &EventWindow,
    tolerance: chrono::Duration,
) -> EligibilityResult {
    if timeline.is_empty() {
        return EligibilityResult {
            status: EligibilityStatus::NoCommits,
            violating_commits: Vec::new(),
            commits_in_window: 0,
            commits_after_end: 0,
        };
    }

    let cutoff = window.start - tolerance;

    let violating_commits: Vec<String> = timeline
        .commits()
        .iter()
        .filter(|commit| commit.timestamp < cutoff)
        .map(|commit| commit.sha.clone())
        .collect();

    let commits_in_window = timeline
        .commits()
        .iter()
        .filter(|commit| window.contains(commit.timestamp))
        .count();

    let commits_after_end = timeline
        .commits()
        .iter()
        .filter(|commit| commit.timestamp > window.end)
        .count();

    let status = if violating_commits.is_empty() {
        EligibilityStatus::Ok
    } else {
        EligibilityStatus::PreExistingCode
    };

    EligibilityResult {
        status,
        violating_commits,
        commits_in_window,
        commits_after_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::entities::CommitRecord;

    fn window() -> EventWindow {
        EventWindow {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 3, 17, 0, 0).unwrap(),
        }
    }

    fn commit(sha: &str, day: u32, hour: u32) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            author: Some("dev".to_string()),
        }
    }

    #[test]
    fn empty_timeline_is_no_commits() {
        let result = check(
            &CommitTimeline::default(),
            &window(),
            chrono::Duration::zero(),
        );
        assert_eq!(result.status, EligibilityStatus::NoCommits);
        assert_eq!(result.commits_in_window, 0);
    }

    #[test]
    fn commit_before_start_disqualifies() {
        // Two hours before the start, zero tolerance
        let timeline = CommitTimeline::new(vec![commit("early", 1, 7), commit("ok", 2, 12)]);

        let result = check(&timeline, &window(), chrono::Duration::zero());

        assert_eq!(result.status, EligibilityStatus::PreExistingCode);
        assert_eq!(result.violating_commits, vec!["early".to_string()]);
        assert_eq!(result.commits_in_window, 1);
    }

    #[test]
    fn tolerance_forgives_commits_just_before_start() {
        let timeline = CommitTimeline::new(vec![commit("early", 1, 7), commit("ok", 2, 12)]);

        let result = check(&timeline, &window(), chrono::Duration::hours(3));

        assert_eq!(result.status, EligibilityStatus::Ok);
        assert!(result.violating_commits.is_empty());
    }

    #[test]
    fn commits_after_end_never_disqualify() {
        let timeline = CommitTimeline::new(vec![
            commit("in1", 2, 10),
            commit("late1", 3, 20),
            commit("late2", 4, 9),
        ]);

        let result = check(&timeline, &window(), chrono::Duration::zero());

        assert_eq!(result.status, EligibilityStatus::Ok);
        assert_eq!(result.commits_in_window, 1);
        assert_eq!(result.commits_after_end, 2);
    }

    #[test]
    fn boundary_commit_at_start_is_in_window() {
        let timeline = CommitTimeline::new(vec![commit("exact", 1, 9)]);

        let result = check(&timeline, &window(), chrono::Duration::zero());

        assert_eq!(result.status, EligibilityStatus::Ok);
        assert_eq!(result.commits_in_window, 1);
    }
}
