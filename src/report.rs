//! Human-readable leak report
//!
//! Rendering is a pure function of a [`LeakReport`] and a [`Theme`]: it never
//! alters computed values, never fails, and produces identical text for
//! identical input.

use crate::leak::{BaselineSource, Dimension, Finding, FindingStatus, LeakReport};
use crate::samples::Snapshot;

const RULE_WIDTH: usize = 41;

/// ANSI styling for the report; [`Theme::plain`] disables colour entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub reset: &'static str,
}

impl Theme {
    pub const fn ansi() -> Self {
        Self {
            red: "\x1b[0;31m",
            green: "\x1b[0;32m",
            yellow: "\x1b[1;33m",
            reset: "\x1b[0m",
        }
    }

    pub const fn plain() -> Self {
        Self {
            red: "",
            green: "",
            yellow: "",
            reset: "",
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        format!("{color}{text}{}", self.reset)
    }
}

fn section(report: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    report.push_str(&format!("\n{rule}\n{title}\n{rule}\n"));
}

fn snapshot_block(report: &mut String, title: &str, s: &Snapshot) {
    section(report, title);
    report.push_str(&format!("Concurrency units:          {:.0}\n", s.concurrency_units));
    report.push_str(&format!("Open FDs:                   {:.0}\n", s.open_fds));
    report.push_str(&format!("Memory (Alloc):             {:.2} MiB\n", s.mem_alloc));
    report.push_str(&format!("Memory (Heap):              {:.2} MiB\n", s.mem_heap));
    report.push_str(&format!("DB Connections (Idle):      {:.0}\n", s.db_idle));
    report.push_str(&format!("DB Connections (In Use):    {:.0}\n", s.db_in_use));
}

/// Icon and unit used when printing a finding
fn presentation(finding: &Finding) -> (&'static str, &'static str) {
    match finding.dimension {
        Dimension::ConcurrencyUnits => ("🧵", ""),
        Dimension::AllocatedMemory => ("💾", " MiB"),
        Dimension::HeapMemory => ("🏔️ ", " MiB"),
        Dimension::FileDescriptors => ("📁", ""),
        Dimension::ConnectionsInUse => ("🔌", ""),
    }
}

fn finding_block(report: &mut String, finding: &Finding, theme: &Theme) {
    let (icon, unit) = presentation(finding);
    let label = finding.dimension.label();
    let relative = finding.dimension.is_relative();
    let value = |v: f64| {
        if relative {
            format!("{v:.2}{unit}")
        } else {
            format!("{v:.0}")
        }
    };

    report.push_str(&format!("\n{icon} {label}:\n"));
    report.push_str(&format!("  Baseline:   {}\n", value(finding.baseline)));
    if let Some(peak) = finding.peak {
        report.push_str(&format!("  Peak:       {}\n", value(peak)));
    }
    report.push_str(&format!("  Post-test:  {}\n", value(finding.post_test)));
    match finding.growth_percent {
        Some(growth) => report.push_str(&format!(
            "  Difference: {} ({growth:.1}%)\n",
            value(finding.difference)
        )),
        None => report.push_str(&format!("  Difference: {}\n", value(finding.difference))),
    }

    let growth = finding.growth_percent.unwrap_or(0.0);
    match finding.status {
        FindingStatus::Leak => {
            report.push_str(&format!(
                "  {}\n",
                theme.paint(theme.red, &format!("❌ {} LEAK DETECTED!", label.to_uppercase()))
            ));
            if relative {
                report.push_str(&format!(
                    "  Growth of {growth:.1}% exceeds threshold of {}%\n",
                    finding.threshold
                ));
            } else {
                report.push_str(&format!(
                    "  Increased by {:.0} (threshold: {})\n",
                    finding.difference, finding.threshold
                ));
            }
        }
        FindingStatus::Warning => {
            report.push_str(&format!(
                "  {}\n",
                theme.paint(
                    theme.yellow,
                    &format!(
                        "⚠️  WARNING: growth of {growth:.1}% exceeds threshold of {}%",
                        finding.threshold
                    )
                )
            ));
        }
        FindingStatus::Pass if finding.dimension == Dimension::HeapMemory => {
            report.push_str(&format!(
                "  {}\n",
                theme.paint(theme.green, "✅ Heap memory stable")
            ));
        }
        FindingStatus::Pass => {
            report.push_str(&format!(
                "  {}\n",
                theme.paint(theme.green, &format!("✅ No {} leak detected", label.to_lowercase()))
            ));
        }
    }
}

/// Render the full text report
///
/// Section order is fixed: header, baseline, peak, post-test, analysis,
/// final result.
pub fn render_text(report: &LeakReport, theme: &Theme) -> String {
    let mut out = String::new();
    let windows = &report.windows;

    section(&mut out, "Resource Leak Analysis");
    out.push_str(&format!(
        "\n📊 Total metric samples collected: {}\n",
        windows.total_samples
    ));
    match windows.baseline_source {
        BaselineSource::Marker => out.push_str(&format!(
            "📈 Baseline samples: {} readings before test execution (samples {}-{})\n",
            windows.baseline.len(),
            windows.baseline.start,
            windows.baseline.end
        )),
        BaselineSource::LeadingSamples => out.push_str(&format!(
            "📈 Baseline samples: First {} readings\n",
            windows.baseline.len()
        )),
    }
    out.push_str(&format!(
        "📉 Post-test samples: Last {} readings\n",
        windows.post_test.len()
    ));
    for warning in &windows.warnings {
        out.push_str(&format!(
            "{}\n",
            theme.paint(theme.yellow, &format!("⚠️  Warning: {warning}"))
        ));
    }

    snapshot_block(&mut out, "BASELINE METRICS (Before Tests)", &report.baseline);

    section(&mut out, "PEAK METRICS (During Test Execution)");
    if windows.test.is_empty() {
        out.push_str("(no samples between baseline and post-test windows)\n");
    }
    out.push_str(&format!(
        "Peak concurrency units:     {:.0}\n",
        report.peak.concurrency_units
    ));
    out.push_str(&format!("Peak Open FDs:              {:.0}\n", report.peak.open_fds));
    out.push_str(&format!(
        "Peak Memory:                {:.2} MiB\n",
        report.peak.mem_alloc
    ));

    snapshot_block(&mut out, "POST-TEST METRICS (After Cooldown)", &report.post_test);

    section(&mut out, "LEAK DETECTION ANALYSIS");
    for finding in &report.assessment.findings {
        finding_block(&mut out, finding, theme);
    }

    section(&mut out, "FINAL RESULT");
    if report.leak_detected() {
        let t = &report.thresholds;
        out.push_str(&format!(
            "{}\n",
            theme.paint(theme.red, "❌ LEAK DETECTION TEST FAILED")
        ));
        out.push_str("\nOne or more resource leaks were detected during the long-duration test.\n");
        out.push_str("Please review the metrics above and investigate the identified issues.\n");
        out.push_str("\nThresholds used:\n");
        out.push_str(&format!("  - Memory growth: {}%\n", t.memory_growth_percent));
        out.push_str(&format!(
            "  - Concurrency unit increase: {}\n",
            t.concurrency_unit_increase
        ));
        out.push_str(&format!("  - File descriptor increase: {}\n", t.fd_increase));
        out.push_str(&format!(
            "  - DB connection increase: {}\n",
            t.connection_in_use_increase
        ));
    } else {
        out.push_str(&format!(
            "{}\n",
            theme.paint(theme.green, "✅ LEAK DETECTION TEST PASSED")
        ));
        out.push_str("\nNo significant resource leaks detected.\n");
        out.push_str("All metrics are within acceptable thresholds after cooldown period.\n");
    }

    out
}
