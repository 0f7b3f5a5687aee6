//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid value that can be customized.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{CommitRecord, EventWindow, SubmissionRecord};

/// Create a 56-hour event window in March 2024
pub fn test_window() -> EventWindow {
    EventWindow {
        start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 3, 17, 0, 0).unwrap(),
    }
}

/// Create a minimal well-formed submission pointing at a GitHub repository
pub fn test_submission() -> SubmissionRecord {
    SubmissionRecord {
        id: "sub-1".to_string(),
        title: "Rocket Tracker".to_string(),
        narrative: Vec::new(),
        tags: vec!["React".to_string()],
        repo_url: "https://github.com/acme/rocket-tracker".to_string(),
        team_members: vec!["Jane Doe".to_string()],
    }
}

/// Create a commit with a named author at a specific time
pub fn test_commit(sha: &str, timestamp: DateTime<Utc>, author: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        timestamp,
        author: Some(author.to_string()),
    }
}
