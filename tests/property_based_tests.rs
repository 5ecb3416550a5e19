//! Property-based tests for windowing, aggregation, and classification
//!
//! Core properties:
//! 1. Windows stay inside [0, N), in order, without overlap
//! 2. mean() equals the arithmetic mean of exactly the window's samples
//! 3. peak() equals the per-dimension maximum of the window
//! 4. Each hard check flags exactly when its difference exceeds the threshold;
//!    heap growth never fails a run

use leakscan::leak::{
    analyze, classify, growth_percent, mean, peak, select_windows, Anchor, PeakSnapshot,
    Thresholds, Window, MAX_WINDOW_LEN, MIN_SAMPLES,
};
use leakscan::samples::Snapshot;
use proptest::prelude::*;

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    (
        0u32..5000,
        0u32..2000,
        0.0f64..8192.0,
        0.0f64..8192.0,
        0u32..100,
        0u32..100,
    )
        .prop_map(|(units, fds, alloc, heap, idle, in_use)| Snapshot {
            concurrency_units: f64::from(units),
            open_fds: f64::from(fds),
            mem_alloc: alloc,
            mem_heap: heap,
            db_idle: f64::from(idle),
            db_in_use: f64::from(in_use),
        })
}

fn anchor_strategy() -> impl Strategy<Value = Anchor> {
    prop_oneof![
        Just(Anchor::Absent),
        Just(Anchor::Unreadable("garbage".to_string())),
        (0usize..1000).prop_map(Anchor::Index),
    ]
}

fn thresholds_strategy() -> impl Strategy<Value = Thresholds> {
    (0.0f64..200.0, 0i64..500, 0i64..200, 0i64..50).prop_map(|(pct, units, fds, conns)| {
        Thresholds {
            memory_growth_percent: pct,
            concurrency_unit_increase: units,
            fd_increase: fds,
            connection_in_use_increase: conns,
        }
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_windows_ordered_and_in_bounds(total in MIN_SAMPLES..2000usize, anchor in anchor_strategy()) {
        let w = select_windows(total, &anchor).unwrap();

        prop_assert!(w.baseline.start <= w.baseline.end);
        prop_assert!(w.baseline.end <= w.test.start);
        prop_assert!(w.test.end <= w.post_test.start);
        prop_assert_eq!(w.post_test.end, total);
        prop_assert!(w.baseline.len() <= MAX_WINDOW_LEN);
        prop_assert!(w.post_test.len() >= 5 && w.post_test.len() <= MAX_WINDOW_LEN);
        prop_assert_eq!(w.test.start, w.baseline.end);
    }

    #[test]
    fn prop_short_runs_rejected(total in 0usize..MIN_SAMPLES, anchor in anchor_strategy()) {
        prop_assert!(select_windows(total, &anchor).is_err());
    }

    #[test]
    fn prop_mean_matches_naive_mean(
        samples in prop::collection::vec(snapshot_strategy(), 0..80),
        start in 0usize..80,
        len in 0usize..80,
    ) {
        let end = (start + len).min(samples.len());
        let start = start.min(end);
        let window = Window::new(start, end);
        let m = mean(&samples, &window);

        if window.is_empty() {
            prop_assert_eq!(m, Snapshot::default());
        } else {
            let slice = &samples[start..end];
            let n = slice.len() as f64;
            let expect = |f: fn(&Snapshot) -> f64| slice.iter().map(f).sum::<f64>() / n;

            prop_assert!(close(m.concurrency_units, expect(|s| s.concurrency_units)));
            prop_assert!(close(m.open_fds, expect(|s| s.open_fds)));
            prop_assert!(close(m.mem_alloc, expect(|s| s.mem_alloc)));
            prop_assert!(close(m.mem_heap, expect(|s| s.mem_heap)));
            prop_assert!(close(m.db_idle, expect(|s| s.db_idle)));
            prop_assert!(close(m.db_in_use, expect(|s| s.db_in_use)));
        }
    }

    #[test]
    fn prop_peak_is_window_maximum(
        samples in prop::collection::vec(snapshot_strategy(), 1..80),
        start in 0usize..80,
    ) {
        let start = start.min(samples.len() - 1);
        let window = Window::new(start, samples.len());
        let p = peak(&samples, &window);
        let slice = &samples[start..];

        prop_assert!(slice.iter().all(|s| s.concurrency_units <= p.concurrency_units));
        prop_assert!(slice.iter().all(|s| s.mem_alloc <= p.mem_alloc));
        prop_assert!(slice.iter().all(|s| s.open_fds <= p.open_fds));
        prop_assert!(slice.iter().any(|s| s.concurrency_units == p.concurrency_units));
        prop_assert!(slice.iter().any(|s| s.mem_alloc == p.mem_alloc));
        prop_assert!(slice.iter().any(|s| s.open_fds == p.open_fds));
    }

    #[test]
    fn prop_each_flag_follows_its_threshold_rule(
        baseline in snapshot_strategy(),
        post_test in snapshot_strategy(),
        thresholds in thresholds_strategy(),
    ) {
        let v = classify(&baseline, &post_test, &PeakSnapshot::default(), &thresholds).verdict;

        prop_assert_eq!(
            v.concurrency_units,
            post_test.concurrency_units - baseline.concurrency_units
                > thresholds.concurrency_unit_increase as f64
        );
        prop_assert_eq!(
            v.file_descriptors,
            post_test.open_fds - baseline.open_fds > thresholds.fd_increase as f64
        );
        prop_assert_eq!(
            v.connections_in_use,
            post_test.db_in_use - baseline.db_in_use
                > thresholds.connection_in_use_increase as f64
        );
        prop_assert_eq!(
            v.allocated_memory,
            growth_percent(baseline.mem_alloc, post_test.mem_alloc).abs()
                > thresholds.memory_growth_percent
        );
    }

    #[test]
    fn prop_increase_equal_to_threshold_never_flags(
        baseline in snapshot_strategy(),
        thresholds in thresholds_strategy(),
    ) {
        let post_test = Snapshot {
            concurrency_units: baseline.concurrency_units
                + thresholds.concurrency_unit_increase as f64,
            open_fds: baseline.open_fds + thresholds.fd_increase as f64,
            db_in_use: baseline.db_in_use + thresholds.connection_in_use_increase as f64,
            ..baseline
        };
        let v = classify(&baseline, &post_test, &PeakSnapshot::default(), &thresholds).verdict;

        prop_assert!(!v.concurrency_units);
        prop_assert!(!v.file_descriptors);
        prop_assert!(!v.connections_in_use);
        prop_assert!(!v.allocated_memory);
        prop_assert!(!v.leak_detected());
    }

    #[test]
    fn prop_heap_alone_never_fails(
        baseline in snapshot_strategy(),
        heap in 0.0f64..100_000.0,
    ) {
        let post_test = Snapshot { mem_heap: heap, ..baseline };
        let a = classify(&baseline, &post_test, &PeakSnapshot::default(), &Thresholds::default());
        prop_assert!(!a.verdict.leak_detected());
    }

    #[test]
    fn prop_analysis_is_deterministic(
        samples in prop::collection::vec(snapshot_strategy(), 20..120),
        anchor in anchor_strategy(),
    ) {
        let first = analyze(&samples, &anchor, &Thresholds::default()).unwrap();
        let second = analyze(&samples, &anchor, &Thresholds::default()).unwrap();
        prop_assert_eq!(first, second);
    }
}
