// Windowed statistics over snapshots
//
// Both operations are total: an empty or out-of-range window yields zeros.

use crate::leak::window::Window;
use crate::samples::Snapshot;
use serde::Serialize;

/// Maximum readings observed during the test window
///
/// Only the dimensions the classifier reports a peak for are tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeakSnapshot {
    pub concurrency_units: f64,
    pub mem_alloc: f64,
    pub open_fds: f64,
}

fn window_slice<'a>(samples: &'a [Snapshot], window: &Window) -> &'a [Snapshot] {
    samples.get(window.range()).unwrap_or(&[])
}

/// Per-dimension arithmetic mean over `window`
pub fn mean(samples: &[Snapshot], window: &Window) -> Snapshot {
    let slice = window_slice(samples, window);
    if slice.is_empty() {
        return Snapshot::default();
    }

    let total = slice.iter().fold(Snapshot::default(), |mut acc, s| {
        acc.concurrency_units += s.concurrency_units;
        acc.open_fds += s.open_fds;
        acc.mem_alloc += s.mem_alloc;
        acc.mem_heap += s.mem_heap;
        acc.db_idle += s.db_idle;
        acc.db_in_use += s.db_in_use;
        acc
    });

    let count = slice.len() as f64;
    Snapshot {
        concurrency_units: total.concurrency_units / count,
        open_fds: total.open_fds / count,
        mem_alloc: total.mem_alloc / count,
        mem_heap: total.mem_heap / count,
        db_idle: total.db_idle / count,
        db_in_use: total.db_in_use / count,
    }
}

/// Per-dimension maximum over `window` for the peak-tracked dimensions
pub fn peak(samples: &[Snapshot], window: &Window) -> PeakSnapshot {
    let slice = window_slice(samples, window);
    if slice.is_empty() {
        return PeakSnapshot::default();
    }

    slice.iter().fold(
        PeakSnapshot {
            concurrency_units: f64::NEG_INFINITY,
            mem_alloc: f64::NEG_INFINITY,
            open_fds: f64::NEG_INFINITY,
        },
        |acc, s| PeakSnapshot {
            concurrency_units: acc.concurrency_units.max(s.concurrency_units),
            mem_alloc: acc.mem_alloc.max(s.mem_alloc),
            open_fds: acc.open_fds.max(s.open_fds),
        },
    )
}
