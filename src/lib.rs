//! Leakscan - post-hoc resource leak detection for long-running services
//!
//! This library compares resource snapshots captured before, during, and
//! after a sustained workload and flags concurrency-unit, memory,
//! file-descriptor, and connection-pool leaks against configurable thresholds.

pub mod cli;
pub mod error;
pub mod json_output;
pub mod leak;
pub mod marker;
pub mod report;
pub mod samples;

pub use error::{LeakError, Result};
