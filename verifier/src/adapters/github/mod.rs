//! GitHub adapter
//!
//! Implementation of the repository provider against the GitHub REST API.

pub mod client;

pub use client::GithubClient;
