//! Error taxonomy for leak analysis
//!
//! Every fatal precondition maps to exactly one variant. `AnchorRead` is the
//! only recoverable class: callers turn it into a warning and fall back to
//! proportional baseline selection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or analyzing resource samples
#[derive(Error, Debug)]
pub enum LeakError {
    #[error("Metrics file not found at {}", path.display())]
    SamplesNotFound { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sample record at {}:{line}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Insufficient metrics data: {found} samples (need at least {required})")]
    InsufficientData { found: usize, required: usize },

    #[error("Could not read baseline marker {}: {reason}", path.display())]
    AnchorRead { path: PathBuf, reason: String },

    #[error("Invalid threshold configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, LeakError>;
