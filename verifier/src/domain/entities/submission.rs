//! Submission domain entities
//!
//! The immutable input records a verification run starts from: what a team
//! submitted and the event window it was supposed to happen in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One titled section of the submission narrative ("Inspiration",
/// "What it does", "How we built it", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub heading: String,
    pub body: String,
}

/// A hackathon submission as handed to the pipeline.
///
/// Produced upstream (scraper or organizer export); never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub narrative: Vec<NarrativeSection>,
    /// Declared technology tags ("Built with")
    #[serde(default)]
    pub tags: Vec<String>,
    pub repo_url: String,
    #[serde(default)]
    pub team_members: Vec<String>,
}

/// The hackathon's official start and end instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}
