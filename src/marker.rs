//! Baseline marker written by the test harness
//!
//! The harness records the sample index at which baseline monitoring ended,
//! as a single integer in a text file. The file is optional.

use crate::error::{LeakError, Result};
use crate::leak::Anchor;
use std::path::Path;

/// Read the marker, distinguishing "no marker" from "bad marker"
///
/// # Errors
///
/// Returns [`LeakError::AnchorRead`] if the file exists but cannot be read or
/// does not hold a single non-negative integer.
pub fn try_read_marker(path: &Path) -> Result<Option<usize>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| LeakError::AnchorRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    content
        .trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|e| LeakError::AnchorRead {
            path: path.to_path_buf(),
            reason: format!("invalid sample index {:?}: {e}", content.trim()),
        })
}

/// Read the marker as an [`Anchor`], downgrading read failures to a warning
pub fn read_baseline_marker(path: &Path) -> Anchor {
    match try_read_marker(path) {
        Ok(Some(index)) => Anchor::Index(index),
        Ok(None) => Anchor::Absent,
        Err(LeakError::AnchorRead { path, reason }) => {
            tracing::warn!(path = %path.display(), "baseline marker unusable: {reason}");
            Anchor::Unreadable(format!("{}: {reason}", path.display()))
        }
        Err(e) => Anchor::Unreadable(e.to_string()),
    }
}
