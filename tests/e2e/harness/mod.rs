//! E2E test harness for Yurtle workspaces.
//!
//! Not every builder, step or assertion is used by the current scenarios.

#![allow(dead_code)]

pub mod assertions;
pub mod runner;
pub mod workspace;

// Re-export commonly used types
pub use assertions::Assertion;
pub use scenario::Scenario;
