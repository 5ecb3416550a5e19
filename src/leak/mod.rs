// Resource leak detection over soak-test snapshots
//
// Pipeline: windows -> aggregates -> classification. The caller owns I/O
// (loading samples, reading the marker) and rendering; everything here is a
// pure function of its inputs, so identical input gives an identical report.
//
// A leak is a threshold-exceeding difference between the baseline mean and
// the post-test mean. Peaks during the test window are reported for context
// but never decide the verdict.

mod aggregate;
mod config;
mod verdict;
mod window;

pub use aggregate::{mean, peak, PeakSnapshot};
pub use config::{
    Thresholds, CONCURRENCY_INCREASE_ENV, CONNECTION_INCREASE_ENV, FD_INCREASE_ENV,
    LEGACY_CONCURRENCY_INCREASE_ENV, MEMORY_GROWTH_ENV,
};
pub use verdict::{
    classify, growth_percent, Dimension, Finding, FindingStatus, LeakAssessment, LeakVerdict,
};
pub use window::{
    select_windows, Anchor, BaselineSource, Window, WindowSelection, MAX_WINDOW_LEN,
    MIN_SAMPLES, MIN_WINDOW_LEN,
};

use crate::error::Result;
use crate::samples::Snapshot;

/// Everything computed for one run, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct LeakReport {
    pub windows: WindowSelection,
    pub baseline: Snapshot,
    pub peak: PeakSnapshot,
    pub post_test: Snapshot,
    pub assessment: LeakAssessment,
    pub thresholds: Thresholds,
}

impl LeakReport {
    pub fn leak_detected(&self) -> bool {
        self.assessment.verdict.leak_detected()
    }
}

/// Run the full analysis over an ordered snapshot sequence
///
/// # Errors
///
/// Returns [`crate::LeakError::InsufficientData`] for fewer than
/// [`MIN_SAMPLES`] snapshots; no aggregate is computed in that case.
pub fn analyze(
    samples: &[Snapshot],
    anchor: &Anchor,
    thresholds: &Thresholds,
) -> Result<LeakReport> {
    let windows = select_windows(samples.len(), anchor)?;

    let baseline = mean(samples, &windows.baseline);
    let post_test = mean(samples, &windows.post_test);
    let peak = peak(samples, &windows.test);

    let assessment = classify(&baseline, &post_test, &peak, thresholds);

    Ok(LeakReport {
        windows,
        baseline,
        peak,
        post_test,
        assessment,
        thresholds: thresholds.clone(),
    })
}
