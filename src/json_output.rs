//! JSON output format for leak reports
//!
//! `--format json` emits the same analysis as the text report as a single
//! pretty-printed document. Exit codes are unchanged.

use crate::leak::{
    BaselineSource, Finding, LeakReport, LeakVerdict, PeakSnapshot, Thresholds, Window,
    WindowSelection,
};
use crate::samples::Snapshot;
use serde::Serialize;

/// Window layout as serialized
#[derive(Debug, Clone, Serialize)]
pub struct JsonWindows {
    pub total_samples: usize,
    pub baseline: Window,
    pub test: Window,
    pub post_test: Window,
    pub baseline_source: BaselineSource,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Overall verdict (true fails the run)
    pub leak_detected: bool,
    pub windows: JsonWindows,
    pub baseline: Snapshot,
    pub peak: PeakSnapshot,
    pub post_test: Snapshot,
    pub verdict: LeakVerdict,
    pub findings: Vec<Finding>,
    pub thresholds: Thresholds,
    /// Recoverable problems (marker fallback, window clamping)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn windows(selection: &WindowSelection) -> JsonWindows {
    JsonWindows {
        total_samples: selection.total_samples,
        baseline: selection.baseline,
        test: selection.test,
        post_test: selection.post_test,
        baseline_source: selection.baseline_source,
    }
}

impl JsonOutput {
    pub fn from_report(report: &LeakReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "leakscan-json-v1".to_string(),
            leak_detected: report.leak_detected(),
            windows: windows(&report.windows),
            baseline: report.baseline,
            peak: report.peak,
            post_test: report.post_test,
            verdict: report.assessment.verdict,
            findings: report.assessment.findings.clone(),
            thresholds: report.thresholds.clone(),
            warnings: report.windows.warnings.clone(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
