//! Resource snapshots and the JSON-lines sample store reader
//!
//! The monitored service appends one flat JSON object per sample. Unknown keys
//! are ignored and missing counters default to zero, so older or newer
//! instrumentation can be analyzed without changes here.

use crate::error::{LeakError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// One reading of the monitored process's resource counters
///
/// All fields are floats so windowed means need no conversion. Memory sizes
/// are in MiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct Snapshot {
    /// Live concurrency units (goroutines, tasks, threads)
    pub concurrency_units: f64,
    /// Open file descriptors
    pub open_fds: f64,
    /// Allocated memory (MiB)
    pub mem_alloc: f64,
    /// Heap memory (MiB)
    pub mem_heap: f64,
    /// Idle connections in the pool
    pub db_idle: f64,
    /// In-use connections in the pool
    pub db_in_use: f64,
}

/// Wire shape of a record; `goroutines` is the legacy name for
/// `concurrency_units` and either or both may be present
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSnapshot {
    concurrency_units: Option<f64>,
    goroutines: Option<f64>,
    open_fds: f64,
    mem_alloc: f64,
    mem_heap: f64,
    db_idle: f64,
    db_in_use: f64,
}

impl From<RawSnapshot> for Snapshot {
    fn from(raw: RawSnapshot) -> Self {
        Self {
            concurrency_units: raw.concurrency_units.or(raw.goroutines).unwrap_or(0.0),
            open_fds: raw.open_fds,
            mem_alloc: raw.mem_alloc,
            mem_heap: raw.mem_heap,
            db_idle: raw.db_idle,
            db_in_use: raw.db_in_use,
        }
    }
}

/// Read an ordered snapshot sequence from a JSON-lines file
///
/// Blank lines are skipped. The first malformed record aborts the whole read;
/// partial results are never returned.
///
/// # Errors
///
/// - [`LeakError::SamplesNotFound`] if `path` does not exist
/// - [`LeakError::Io`] if the file cannot be read
/// - [`LeakError::Parse`] if a non-blank line is not a JSON object of numbers
pub fn load_samples(path: &Path) -> Result<Vec<Snapshot>> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LeakError::SamplesNotFound {
            path: path.to_path_buf(),
        },
        _ => LeakError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let samples = parse_samples(BufReader::new(file), path)?;
    tracing::debug!(count = samples.len(), path = %path.display(), "loaded samples");
    Ok(samples)
}

/// Parse snapshots from any buffered reader (`path` is only used in errors)
///
/// Lines are split on raw bytes so a record that is not valid UTF-8 is a
/// parse failure at its line, not a read failure.
pub fn parse_samples<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Snapshot>> {
    let mut samples = Vec::new();

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|source| LeakError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        let snapshot = serde_json::from_slice::<Snapshot>(trimmed).map_err(|source| {
            LeakError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            }
        })?;
        samples.push(snapshot);
    }

    Ok(samples)
}
