//! Runtime configuration for a read session.
//!
//! Separate from the TOML schema in `scale_config`; see `conversions`.

use std::time::Duration;

/// Session tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCfg {
    /// Maximum bytes requested per read.
    pub chunk_size: usize,
    /// Delay after each processed chunk, empty ones included.
    pub pace: Duration,
    /// Stop with `NoStableReading` after this many reads. `None` reads forever.
    pub max_iterations: Option<u64>,
    /// Stop with `NoStableReading` once the session is this old. `None` never.
    pub overall_timeout: Option<Duration>,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            chunk_size: 128,
            pace: Duration::from_millis(100),
            max_iterations: None,
            overall_timeout: None,
        }
    }
}

impl SessionCfg {
    /// True when neither cap is set and a never-settling scale loops forever.
    pub fn is_unbounded(&self) -> bool {
        self.max_iterations.is_none() && self.overall_timeout.is_none()
    }
}
