//! Gemini adapter
//!
//! Implementation of the language model provider against the Gemini API.

pub mod client;

pub use client::GeminiClient;
