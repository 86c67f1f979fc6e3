#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the scale reader.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Every section is optional; an empty document yields the device defaults
//!   (platform serial port, 9600 baud, 1 s read timeout, 128-byte reads,
//!   100 ms pacing, no session cap).
use serde::Deserialize;
use std::path::Path;

/// Largest read quantum accepted, in bytes.
pub const MAX_CHUNK_SIZE: usize = 4096;
/// Upper bound for the pacing delay between reads.
pub const MAX_PACE_MS: u64 = 10_000;

#[cfg(windows)]
const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_PORT: &str = "/dev/ttyUSB0";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Serial {
    pub port: String,
    pub baud_rate: u32,
    /// Per-read timeout; an expired read is "no data yet", not a fault.
    pub timeout_ms: u64,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: 9600,
            timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Parser {
    /// Maximum bytes requested per read.
    pub chunk_size: usize,
    /// Delay after each processed chunk before the next read.
    pub pace_ms: u64,
    /// Give up after this many reads. Absent means read until stable.
    pub max_iterations: Option<u64>,
    /// Give up once a session has run this long. Absent means no deadline.
    pub overall_timeout_ms: Option<u64>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            chunk_size: 128,
            pace_ms: 100,
            max_iterations: None,
            overall_timeout_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub serial: Serial,
    pub parser: Parser,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg =
        load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Serial
        if self.serial.port.trim().is_empty() {
            eyre::bail!("serial.port must not be empty");
        }
        if self.serial.baud_rate == 0 {
            eyre::bail!("serial.baud_rate must be > 0");
        }
        if self.serial.timeout_ms == 0 {
            eyre::bail!("serial.timeout_ms must be >= 1");
        }

        // Parser
        if self.parser.chunk_size == 0 || self.parser.chunk_size > MAX_CHUNK_SIZE {
            eyre::bail!("parser.chunk_size must be in [1, {MAX_CHUNK_SIZE}]");
        }
        if self.parser.pace_ms > MAX_PACE_MS {
            eyre::bail!("parser.pace_ms is unreasonably large (>{MAX_PACE_MS} ms)");
        }
        if self.parser.max_iterations == Some(0) {
            eyre::bail!("parser.max_iterations must be >= 1 when set");
        }
        if self.parser.overall_timeout_ms == Some(0) {
            eyre::bail!("parser.overall_timeout_ms must be >= 1 when set");
        }

        // Logging
        if let Some(level) = &self.logging.level
            && !matches!(
                level.to_ascii_lowercase().as_str(),
                "error" | "warn" | "info" | "debug" | "trace"
            )
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace, got {level}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = load_toml("").expect("empty TOML parses");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.serial.baud_rate, 9600);
        assert_eq!(cfg.serial.timeout_ms, 1000);
        assert_eq!(cfg.parser.chunk_size, 128);
        assert_eq!(cfg.parser.pace_ms, 100);
        assert!(cfg.parser.max_iterations.is_none());
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn rotation_parses_lowercase() {
        let cfg = load_toml("[logging]\nrotation = \"hourly\"\n").expect("parse");
        assert_eq!(cfg.logging.rotation, Rotation::Hourly);
    }

    #[test]
    fn unknown_rotation_is_a_parse_error() {
        assert!(load_toml("[logging]\nrotation = \"weekly\"\n").is_err());
    }
}
