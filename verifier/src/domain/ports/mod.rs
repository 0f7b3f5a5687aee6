//! Domain ports (traits)
//!
//! Port traits define the external capabilities the pipeline requires.
//! Adapters provide concrete implementations of these traits.

pub mod language_model;
pub mod repository_provider;

pub use language_model::{Assessment, ClaimClassification, LanguageModelProvider};
pub use repository_provider::RepositoryProvider;
