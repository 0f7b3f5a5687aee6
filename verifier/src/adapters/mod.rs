//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod gemini;
pub mod github;

pub use gemini::GeminiClient;
pub use github::GithubClient;
