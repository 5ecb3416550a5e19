//! CLI argument parsing for leakscan

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Conventional location the instrumented service writes samples to
pub const DEFAULT_SAMPLES_PATH: &str = "/tmp/keb_metrics.jsonl";

/// Conventional location of the harness baseline marker
pub const DEFAULT_MARKER_PATH: &str = "/tmp/baseline_samples_count";

/// Output format for the leak report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

/// When to colour the text report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Colour only when stdout is a terminal
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "leakscan")]
#[command(version)]
#[command(
    about = "Detect resource leaks by comparing baseline and post-test resource snapshots",
    long_about = None
)]
pub struct Cli {
    /// JSON-lines file of resource snapshots, one per line
    #[arg(long = "samples", value_name = "PATH", default_value = DEFAULT_SAMPLES_PATH)]
    pub samples: PathBuf,

    /// File holding the sample index where baseline monitoring ended (optional)
    #[arg(long = "baseline-marker", value_name = "PATH", default_value = DEFAULT_MARKER_PATH)]
    pub baseline_marker: PathBuf,

    /// TOML file with threshold overrides (environment variables still win)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Colour the text report
    #[arg(long = "color", value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
