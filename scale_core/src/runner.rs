//! One-shot read sessions: open, parse until stable, release.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use scale_traits::SerialLink;
use scale_traits::clock::Clock;

use crate::config::SessionCfg;
use crate::error::Result;
use crate::parser::StabilityParser;
use crate::weight::StableWeight;

/// Run one session over an already open link.
///
/// The link is consumed and dropped when the session ends, whatever the
/// outcome.
pub fn read_weight_from<L, C>(
    link: L,
    clock: C,
    session: SessionCfg,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<StableWeight>
where
    L: SerialLink,
    C: Clock,
{
    let mut builder = StabilityParser::builder()
        .with_link(link)
        .with_clock(clock)
        .with_session(session);
    if let Some(flag) = shutdown {
        builder = builder.with_shutdown(flag);
    }
    let mut parser = builder.build()?;
    parser.run()
}

#[cfg(feature = "serial")]
pub use port::{ReadRequest, read_weight};

#[cfg(feature = "serial")]
mod port {
    use super::*;
    use crate::error::{Report, WeightError};
    use scale_serial::SerialSettings;
    use scale_traits::clock::MonotonicClock;

    /// Parameters of the inbound "read weight" query.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ReadRequest {
        pub serial: SerialSettings,
        pub session: SessionCfg,
    }

    impl ReadRequest {
        pub fn new(serial: SerialSettings) -> Self {
            Self {
                serial,
                session: SessionCfg::default(),
            }
        }

        pub fn with_session(mut self, session: SessionCfg) -> Self {
            self.session = session;
            self
        }
    }

    /// Open the configured port and read until stable.
    ///
    /// An open failure surfaces as `WeightError::Connection` before any
    /// frame is processed. The port is closed on every exit path.
    pub fn read_weight(
        req: &ReadRequest,
        shutdown: Option<Arc<AtomicBool>>,
    ) -> Result<StableWeight> {
        let conn = req
            .serial
            .open()
            .map_err(|e| Report::new(WeightError::Connection(e.to_string())))?;
        tracing::info!(port = %req.serial.port, "connected, waiting for stable data");
        read_weight_from(conn, MonotonicClock::new(), req.session.clone(), shutdown)
    }
}
