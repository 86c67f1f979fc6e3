//! The `read` command: config mapping, link assembly, and the result envelope.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use scale_core::error::Result as CoreResult;
use scale_core::{SessionCfg, StableWeight, Unit};
use scale_serial::SerialSettings;
#[cfg(feature = "sim")]
use scale_serial::SimulatedLink;
#[cfg(feature = "sim")]
use scale_traits::clock::MonotonicClock;

/// Replaces the serial device with a scripted stream when set.
///
/// Reads are separated by `|`; an empty piece is a read timeout and `!fail`
/// is a device fault. Example: `05=||05=`. Only honoured in builds with the
/// `sim` feature.
#[cfg(feature = "sim")]
pub const SIM_STREAM_ENV: &str = "SCALE_TEST_SIM_STREAM";

/// Command-line overrides for one read.
#[derive(Debug, Default, Clone)]
pub struct ReadOverrides {
    pub port: Option<String>,
    pub baudrate: Option<u32>,
    pub timeout: Option<Duration>,
    pub max_iterations: Option<u64>,
    pub overall_timeout_ms: Option<u64>,
}

/// Merge config file values and CLI overrides (CLI wins).
pub fn effective_settings(
    cfg: &scale_config::Config,
    o: &ReadOverrides,
) -> (SerialSettings, SessionCfg) {
    let mut serial = scale_core::conversions::serial_settings(&cfg.serial);
    if let Some(port) = &o.port {
        serial.port = port.clone();
    }
    if let Some(baud) = o.baudrate {
        serial.baud_rate = baud;
    }
    if let Some(t) = o.timeout {
        serial.timeout = t;
    }

    let mut session = SessionCfg::from(&cfg.parser);
    if let Some(n) = o.max_iterations {
        session.max_iterations = Some(n);
    }
    if let Some(ms) = o.overall_timeout_ms {
        session.overall_timeout = Some(Duration::from_millis(ms));
    }
    (serial, session)
}

#[cfg(feature = "sim")]
pub fn sim_link_from_script(script: &str) -> SimulatedLink {
    script.split('|').fold(SimulatedLink::new(), |link, piece| match piece {
        "" => link.silence(),
        "!fail" => link.fail("simulated device fault"),
        data => link.data(data),
    })
}

pub fn run_read(
    cfg: &scale_config::Config,
    overrides: &ReadOverrides,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<StableWeight> {
    let (serial, session) = effective_settings(cfg, overrides);
    if session.is_unbounded() {
        tracing::debug!("no max_iterations or overall_timeout: reading until stable");
    }

    #[cfg(feature = "sim")]
    if let Ok(script) = std::env::var(SIM_STREAM_ENV) {
        tracing::info!(port = %serial.port, "using simulated scale");
        return scale_core::read_weight_from(
            sim_link_from_script(&script),
            MonotonicClock::new(),
            session,
            Some(shutdown),
        );
    }

    let req = scale_core::ReadRequest::new(serial).with_session(session);
    scale_core::read_weight(&req, Some(shutdown))
}

pub const MSG_OK: &str = "Weight read successfully";
pub const MSG_NO_READING: &str = "Failed to read weight";

/// Response envelope for a successful read.
pub fn success_json(w: &StableWeight) -> serde_json::Value {
    serde_json::json!({
        "message": MSG_OK,
        "weight": w.value,
        "unit": w.unit.as_str(),
    })
}

/// Response envelope for a failed read; the weight is always zero.
pub fn failure_json(message: &str) -> serde_json::Value {
    serde_json::json!({
        "message": message,
        "weight": 0.0,
        "unit": Unit::Kg.as_str(),
    })
}
