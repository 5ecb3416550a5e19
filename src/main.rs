use anyhow::{Context, Result};
use clap::Parser;
use leakscan::cli::{Cli, ColorChoice, OutputFormat};
use leakscan::json_output::JsonOutput;
use leakscan::leak::{analyze, Thresholds};
use leakscan::report::{render_text, Theme};
use leakscan::{marker, samples};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; logs go to stderr so stdout stays the report
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn theme_for(choice: ColorChoice) -> Theme {
    match choice {
        ColorChoice::Always => Theme::ansi(),
        ColorChoice::Never => Theme::plain(),
        ColorChoice::Auto if std::io::stdout().is_terminal() => Theme::ansi(),
        ColorChoice::Auto => Theme::plain(),
    }
}

/// Run the analysis and print the report; returns whether a leak was found
fn run(args: &Cli) -> Result<bool> {
    let thresholds =
        Thresholds::load(args.config.as_deref()).context("Failed to load thresholds")?;

    let samples = samples::load_samples(&args.samples)?;
    let anchor = marker::read_baseline_marker(&args.baseline_marker);
    let report = analyze(&samples, &anchor, &thresholds)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report, &theme_for(args.color))),
        OutputFormat::Json => println!("{}", JsonOutput::from_report(&report).to_json()?),
    }

    Ok(report.leak_detected())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    init_tracing(args.debug);

    match run(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}
