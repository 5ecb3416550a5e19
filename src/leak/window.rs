// Window selection over the ordered snapshot sequence
//
// Three half-open windows are derived from the sample count:
//   baseline  - before the workload (anchored by the harness marker if present)
//   test      - between baseline end and post-test start (peak observation)
//   post-test - the trailing third of the run, after cooldown
//
// Windows always lie within [0, N), never overlap, and appear in that order.

use crate::error::{LeakError, Result};
use serde::Serialize;
use std::ops::Range;

/// Fewer samples than this make leak analysis unreliable
pub const MIN_SAMPLES: usize = 20;

/// Lower bound for baseline and post-test window lengths
pub const MIN_WINDOW_LEN: usize = 5;

/// Upper bound for baseline and post-test window lengths
pub const MAX_WINDOW_LEN: usize = 50;

/// Baseline anchor supplied by the test harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// No marker was written
    Absent,
    /// Sample index at which baseline monitoring ended
    Index(usize),
    /// Marker exists but could not be used (reason attached)
    Unreadable(String),
}

/// Contiguous half-open index range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    /// Create a window; an inverted range collapses to an empty one at `start`
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// How the baseline window was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Anchored to the harness marker ("just before test start")
    Marker,
    /// First samples of the run (no usable marker)
    LeadingSamples,
}

/// The three analysis windows plus any recoverable warnings raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSelection {
    pub total_samples: usize,
    pub baseline: Window,
    pub test: Window,
    pub post_test: Window,
    pub baseline_source: BaselineSource,
    pub warnings: Vec<String>,
}

fn clamp_len(n: usize) -> usize {
    n.clamp(MIN_WINDOW_LEN, MAX_WINDOW_LEN)
}

/// Derive baseline, test, and post-test windows for `total` samples
///
/// # Errors
///
/// Returns [`LeakError::InsufficientData`] if `total < MIN_SAMPLES`.
///
/// # Example
/// ```
/// use leakscan::leak::{select_windows, Anchor, Window};
///
/// let windows = select_windows(100, &Anchor::Index(40)).unwrap();
/// assert_eq!(windows.baseline, Window::new(0, 40));
/// assert_eq!(windows.test, Window::new(40, 67));
/// assert_eq!(windows.post_test, Window::new(67, 100));
/// ```
pub fn select_windows(total: usize, anchor: &Anchor) -> Result<WindowSelection> {
    if total < MIN_SAMPLES {
        return Err(LeakError::InsufficientData {
            found: total,
            required: MIN_SAMPLES,
        });
    }

    let mut warnings = Vec::new();

    let post_len = clamp_len(total / 3);
    let post_test = Window::new(total - post_len, total);

    let (mut baseline, baseline_source) = match anchor {
        Anchor::Index(end) => {
            let len = clamp_len(*end);
            (
                Window::new(end.saturating_sub(len), *end),
                BaselineSource::Marker,
            )
        }
        Anchor::Absent => (leading_window(total), BaselineSource::LeadingSamples),
        Anchor::Unreadable(reason) => {
            warnings.push(format!(
                "Could not read baseline marker, using first samples: {reason}"
            ));
            (leading_window(total), BaselineSource::LeadingSamples)
        }
    };

    // A late marker would push the baseline into the post-test window
    if baseline.end > post_test.start {
        let clamped = Window::new(baseline.start.min(post_test.start), post_test.start);
        let msg = format!(
            "Baseline marker index {} overlaps post-test window (starts at {}); \
             baseline clamped to samples {}-{}",
            baseline.end, post_test.start, clamped.start, clamped.end
        );
        tracing::warn!("{msg}");
        warnings.push(msg);
        baseline = clamped;
    }

    let test = Window::new(baseline.end, post_test.start);

    tracing::debug!(
        total,
        baseline = ?baseline.range(),
        test = ?test.range(),
        post_test = ?post_test.range(),
        "selected windows"
    );

    Ok(WindowSelection {
        total_samples: total,
        baseline,
        test,
        post_test,
        baseline_source,
        warnings,
    })
}

fn leading_window(total: usize) -> Window {
    Window::new(0, clamp_len(total / 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportional_split_without_marker() {
        let w = select_windows(100, &Anchor::Absent).unwrap();
        assert_eq!(w.baseline, Window::new(0, 33));
        assert_eq!(w.test, Window::new(33, 67));
        assert_eq!(w.post_test, Window::new(67, 100));
        assert_eq!(w.baseline_source, BaselineSource::LeadingSamples);
        assert!(w.warnings.is_empty());
    }

    #[test]
    fn test_marker_anchors_baseline() {
        let w = select_windows(100, &Anchor::Index(40)).unwrap();
        assert_eq!(w.baseline, Window::new(0, 40));
        assert_eq!(w.test, Window::new(40, 67));
        assert_eq!(w.post_test, Window::new(67, 100));
        assert_eq!(w.baseline_source, BaselineSource::Marker);
    }

    #[test]
    fn test_marker_baseline_capped_at_fifty() {
        let w = select_windows(600, &Anchor::Index(120)).unwrap();
        assert_eq!(w.baseline, Window::new(70, 120));
        assert_eq!(w.post_test, Window::new(550, 600));
        assert_eq!(w.test, Window::new(120, 550));
    }

    #[test]
    fn test_small_marker_keeps_zero_start() {
        let w = select_windows(30, &Anchor::Index(3)).unwrap();
        assert_eq!(w.baseline, Window::new(0, 3));
        assert_eq!(w.test.start, 3);
    }

    #[test]
    fn test_marker_at_zero_gives_empty_baseline() {
        let w = select_windows(30, &Anchor::Index(0)).unwrap();
        assert!(w.baseline.is_empty());
        assert_eq!(w.test, Window::new(0, 20));
    }

    #[test]
    fn test_unreadable_marker_falls_back_with_warning() {
        let w = select_windows(100, &Anchor::Unreadable("bad".to_string())).unwrap();
        assert_eq!(w.baseline, Window::new(0, 33));
        assert_eq!(w.baseline_source, BaselineSource::LeadingSamples);
        assert_eq!(w.warnings.len(), 1);
        assert!(w.warnings[0].contains("bad"));
    }

    #[test]
    fn test_marker_beyond_samples_is_clamped() {
        let w = select_windows(30, &Anchor::Index(500)).unwrap();
        // post_len = clamp(10) = 10
        assert_eq!(w.post_test, Window::new(20, 30));
        assert_eq!(w.baseline, Window::new(20, 20));
        assert!(w.test.is_empty());
        assert_eq!(w.warnings.len(), 1);
    }

    #[test]
    fn test_marker_overlapping_post_test_is_clamped() {
        let w = select_windows(60, &Anchor::Index(45)).unwrap();
        // post_len = 20 -> [40, 60); baseline [0, 45) clamped to [0, 40)
        assert_eq!(w.baseline, Window::new(0, 40));
        assert!(w.test.is_empty());
        assert!(w.baseline.end <= w.post_test.start);
        assert!(!w.warnings.is_empty());
    }

    #[test]
    fn test_minimum_sample_count() {
        let w = select_windows(20, &Anchor::Absent).unwrap();
        assert_eq!(w.baseline, Window::new(0, 6));
        assert_eq!(w.post_test, Window::new(14, 20));
        assert_eq!(w.test, Window::new(6, 14));
    }

    #[test]
    fn test_insufficient_samples() {
        let err = select_windows(19, &Anchor::Absent).unwrap_err();
        assert!(matches!(
            err,
            LeakError::InsufficientData {
                found: 19,
                required: 20
            }
        ));
    }

    #[test]
    fn test_inverted_window_collapses() {
        let w = Window::new(10, 4);
        assert!(w.is_empty());
        assert_eq!(w.len(), 0);
    }

    #[test]
    fn test_inverted_literal_window_is_empty() {
        let w = Window { start: 12, end: 3 };
        assert_eq!(w.len(), 0);
        assert!(w.is_empty());
    }
}
