//! Test utilities and mocks
//!
//! Mock implementations of the port traits for testing. We use manual
//! mocks instead of a mocking framework because the port methods take
//! borrowed arguments and slices that are awkward to express in generated
//! mock signatures, and the scripted-builder style keeps each test's
//! provider behavior readable at the call site.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
