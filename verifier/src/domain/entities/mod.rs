//! Domain entities
//!
//! Pure domain models for the verification pipeline. Stages exchange these
//! as immutable values; nothing here talks to the network.

pub mod claim;
pub mod evidence;
pub mod report;
pub mod repo;
pub mod submission;
pub mod timeline;

pub use claim::{normalize_text, Claim, ClaimCategory, ClaimId, ClaimImportance};
pub use evidence::{ClaimFinding, EvidenceBasis, EvidenceItem, EvidenceOutcome, EvidenceTier};
pub use report::{ProviderUsage, TeamAttribution, VerificationReport, Verdict};
pub use repo::{CodeExcerpt, FileEntry, RepoMetadata, RepoRef};
pub use submission::{EventWindow, NarrativeSection, SubmissionRecord};
pub use timeline::{CommitRecord, CommitTimeline, EligibilityResult, EligibilityStatus};
