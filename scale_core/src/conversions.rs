//! `From` implementations and helpers bridging `scale_config` types to `scale_core` types.

use std::time::Duration;

use crate::config::SessionCfg;

impl From<&scale_config::Parser> for SessionCfg {
    fn from(c: &scale_config::Parser) -> Self {
        Self {
            chunk_size: c.chunk_size,
            pace: Duration::from_millis(c.pace_ms),
            max_iterations: c.max_iterations,
            overall_timeout: c.overall_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// `[serial]` section to connection settings.
#[cfg(feature = "serial")]
pub fn serial_settings(c: &scale_config::Serial) -> scale_serial::SerialSettings {
    scale_serial::SerialSettings::new(
        c.port.clone(),
        c.baud_rate,
        Duration::from_millis(c.timeout_ms),
    )
}
