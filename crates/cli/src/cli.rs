//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// scroll-timing - replay scripted scroll input and report interaction timing
#[derive(Parser, Debug)]
#[command(
    name = "scroll-timing",
    author,
    version,
    about = "Scroll interaction timing on a virtual clock",
    long_about = "Replays a scenario (a synthetic document plus timed wheel, touch, key and \n\
                  scroll notifications) against the scroll timing engine and reports one \n\
                  record per completed scroll interaction."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "SCROLL_TIMING_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SCROLL_TIMING_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario and print the interaction records
    Simulate(SimulateArgs),

    /// Validate a scenario or engine config file without running it
    Validate(ValidateArgs),

    /// Display scenario information
    Info(InfoArgs),
}

/// Arguments for the `simulate` command
#[derive(Parser, Debug, Clone)]
pub struct SimulateArgs {
    /// Path to scenario file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "scenario.toml",
        env = "SCROLL_TIMING_SCENARIO"
    )]
    pub scenario: PathBuf,

    /// Emit records as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Override the simulated display refresh rate (Hz)
    #[arg(long)]
    pub refresh_hz: Option<f64>,

    /// Log every record through the tracing subscriber as well
    #[arg(long)]
    pub log_entries: bool,

    /// Make the host refuse frame callback requests
    #[arg(long)]
    pub fail_frames: bool,

    /// Make the host refuse timer requests
    #[arg(long)]
    pub fail_timers: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SCROLL_TIMING_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to scenario or engine config file to validate
    #[arg(short, long, default_value = "scenario.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub scenario: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List every step of the input script
    #[arg(long)]
    pub steps: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
