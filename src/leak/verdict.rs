// Leak classification from baseline vs. post-test aggregates
//
// Four hard checks fail the run: concurrency units, allocated memory, file
// descriptors, in-use connections. Heap growth is advisory only.

use crate::leak::aggregate::PeakSnapshot;
use crate::leak::config::Thresholds;
use crate::samples::Snapshot;
use serde::Serialize;

/// Resource dimension checked by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ConcurrencyUnits,
    AllocatedMemory,
    HeapMemory,
    FileDescriptors,
    ConnectionsInUse,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::ConcurrencyUnits => "Concurrency units",
            Dimension::AllocatedMemory => "Memory (allocated)",
            Dimension::HeapMemory => "Memory (heap)",
            Dimension::FileDescriptors => "File descriptors",
            Dimension::ConnectionsInUse => "Connections (in use)",
        }
    }

    /// Memory dimensions are compared by relative growth, the rest by count
    pub fn is_relative(&self) -> bool {
        matches!(self, Dimension::AllocatedMemory | Dimension::HeapMemory)
    }
}

/// Outcome for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Pass,
    Leak,
    Warning,
}

/// Per-dimension comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub dimension: Dimension,
    pub baseline: f64,
    pub post_test: f64,
    /// Peak during the test window, for peak-tracked dimensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<f64>,
    /// `post_test - baseline`
    pub difference: f64,
    /// Relative change in percent, for memory dimensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_percent: Option<f64>,
    pub threshold: f64,
    pub status: FindingStatus,
}

/// Per-dimension leak flags and the overall verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeakVerdict {
    pub concurrency_units: bool,
    pub allocated_memory: bool,
    pub file_descriptors: bool,
    pub connections_in_use: bool,
    /// Advisory only, never fails the run
    pub heap_growth_warning: bool,
}

impl LeakVerdict {
    /// Logical OR of the four hard checks
    pub fn leak_detected(&self) -> bool {
        self.concurrency_units
            || self.allocated_memory
            || self.file_descriptors
            || self.connections_in_use
    }
}

/// Verdict plus the findings it was derived from, in report order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeakAssessment {
    pub verdict: LeakVerdict,
    pub findings: Vec<Finding>,
}

/// Relative change in percent; a non-positive baseline yields 0
///
/// # Example
/// ```
/// use leakscan::leak::growth_percent;
///
/// assert_eq!(growth_percent(1000.0, 1500.0), 50.0);
/// assert_eq!(growth_percent(0.0, 100.0), 0.0);
/// ```
pub fn growth_percent(baseline: f64, post_test: f64) -> f64 {
    if baseline > 0.0 {
        (post_test - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

fn absolute_finding(
    dimension: Dimension,
    baseline: f64,
    post_test: f64,
    peak: Option<f64>,
    threshold: i64,
) -> Finding {
    let difference = post_test - baseline;
    let threshold = threshold as f64;
    let status = if difference > threshold {
        FindingStatus::Leak
    } else {
        FindingStatus::Pass
    };

    Finding {
        dimension,
        baseline,
        post_test,
        peak,
        difference,
        growth_percent: None,
        threshold,
        status,
    }
}

fn relative_finding(
    dimension: Dimension,
    baseline: f64,
    post_test: f64,
    peak: Option<f64>,
    threshold: f64,
    exceeded: FindingStatus,
) -> Finding {
    let growth = growth_percent(baseline, post_test);
    let status = if growth.abs() > threshold {
        exceeded
    } else {
        FindingStatus::Pass
    };

    Finding {
        dimension,
        baseline,
        post_test,
        peak,
        difference: post_test - baseline,
        growth_percent: Some(growth),
        threshold,
        status,
    }
}

/// Compare baseline and post-test aggregates against `thresholds`
///
/// # Example
/// ```
/// use leakscan::leak::{classify, PeakSnapshot, Thresholds};
/// use leakscan::samples::Snapshot;
///
/// let baseline = Snapshot { concurrency_units: 100.0, ..Snapshot::default() };
/// let post_test = Snapshot { concurrency_units: 160.0, ..Snapshot::default() };
///
/// let assessment = classify(&baseline, &post_test, &PeakSnapshot::default(), &Thresholds::default());
/// assert!(assessment.verdict.concurrency_units);
/// assert!(assessment.verdict.leak_detected());
/// ```
pub fn classify(
    baseline: &Snapshot,
    post_test: &Snapshot,
    peak: &PeakSnapshot,
    thresholds: &Thresholds,
) -> LeakAssessment {
    let findings = vec![
        absolute_finding(
            Dimension::ConcurrencyUnits,
            baseline.concurrency_units,
            post_test.concurrency_units,
            Some(peak.concurrency_units),
            thresholds.concurrency_unit_increase,
        ),
        relative_finding(
            Dimension::AllocatedMemory,
            baseline.mem_alloc,
            post_test.mem_alloc,
            Some(peak.mem_alloc),
            thresholds.memory_growth_percent,
            FindingStatus::Leak,
        ),
        relative_finding(
            Dimension::HeapMemory,
            baseline.mem_heap,
            post_test.mem_heap,
            None,
            thresholds.memory_growth_percent,
            FindingStatus::Warning,
        ),
        absolute_finding(
            Dimension::FileDescriptors,
            baseline.open_fds,
            post_test.open_fds,
            Some(peak.open_fds),
            thresholds.fd_increase,
        ),
        absolute_finding(
            Dimension::ConnectionsInUse,
            baseline.db_in_use,
            post_test.db_in_use,
            None,
            thresholds.connection_in_use_increase,
        ),
    ];

    let flagged = |dimension: Dimension, status: FindingStatus| {
        findings
            .iter()
            .any(|f| f.dimension == dimension && f.status == status)
    };

    let verdict = LeakVerdict {
        concurrency_units: flagged(Dimension::ConcurrencyUnits, FindingStatus::Leak),
        allocated_memory: flagged(Dimension::AllocatedMemory, FindingStatus::Leak),
        file_descriptors: flagged(Dimension::FileDescriptors, FindingStatus::Leak),
        connections_in_use: flagged(Dimension::ConnectionsInUse, FindingStatus::Leak),
        heap_growth_warning: flagged(Dimension::HeapMemory, FindingStatus::Warning),
    };

    tracing::debug!(?verdict, "classified");

    LeakAssessment { verdict, findings }
}
