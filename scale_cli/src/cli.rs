//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Config file picked up when `--config` is not given (optional).
pub const DEFAULT_CONFIG: &str = "etc/scale_config.toml";

#[derive(Parser, Debug)]
#[command(name = "scale", version, about = "Read a stable weight from a serial scale")]
pub struct Cli {
    /// Path to config TOML; defaults to etc/scale_config.toml when present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON (logs as JSON lines on stderr, result envelope on stdout)
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait for two matching readings and print the weight
    Read {
        /// Serial device (overrides [serial] port)
        #[arg(long)]
        port: Option<String>,
        /// Baud rate (overrides [serial] baud_rate)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        baudrate: Option<u32>,
        /// Per-read timeout in seconds (overrides [serial] timeout_ms)
        #[arg(long, value_name = "SECONDS", value_parser = parse_timeout_secs)]
        timeout: Option<Duration>,
        /// Give up after this many reads (default: read until stable)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        max_iterations: Option<u64>,
        /// Give up after this many milliseconds (default: no deadline)
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
        overall_timeout_ms: Option<u64>,
    },
    /// Liveness check; always succeeds
    Health,
    /// List serial ports visible to the OS
    ListPorts,
}

fn parse_timeout_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
