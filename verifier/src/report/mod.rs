//! Report rendering
//!
//! Turns verification reports into human-readable text.

pub mod renderer;

pub use renderer::{render_report, summary};
