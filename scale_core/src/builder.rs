//! Builder for `StabilityParser`.
//!
//! The link is checked and the session config validated on `build()`.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use scale_traits::SerialLink;
use scale_traits::clock::{Clock, MonotonicClock};

use crate::config::SessionCfg;
use crate::error::{BuildError, Report, Result};
use crate::parser::StabilityParser;

pub struct ParserBuilder<L, C = MonotonicClock> {
    link: Option<L>,
    clock: C,
    cfg: SessionCfg,
    shutdown: Option<Arc<AtomicBool>>,
}

impl<L: SerialLink> Default for ParserBuilder<L, MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SerialLink> ParserBuilder<L, MonotonicClock> {
    pub fn new() -> Self {
        Self {
            link: None,
            clock: MonotonicClock::new(),
            cfg: SessionCfg::default(),
            shutdown: None,
        }
    }
}

impl<L: SerialLink, C: Clock> ParserBuilder<L, C> {
    pub fn with_link(mut self, link: L) -> Self {
        self.link = Some(link);
        self
    }

    /// Swap the clock used for pacing and the overall deadline.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ParserBuilder<L, C2> {
        ParserBuilder {
            link: self.link,
            clock,
            cfg: self.cfg,
            shutdown: self.shutdown,
        }
    }

    pub fn with_session(mut self, cfg: SessionCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.cfg.chunk_size = bytes;
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.cfg.pace = pace;
        self
    }

    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.cfg.max_iterations = Some(n);
        self
    }

    pub fn with_overall_timeout(mut self, limit: Duration) -> Self {
        self.cfg.overall_timeout = Some(limit);
        self
    }

    /// Abort the session with `Interrupted` once `flag` becomes true.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub fn build(self) -> Result<StabilityParser<L, C>> {
        let link = self
            .link
            .ok_or_else(|| Report::new(BuildError::MissingLink))?;
        if self.cfg.chunk_size == 0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "chunk_size must be >= 1",
            )));
        }
        if self.cfg.max_iterations == Some(0) {
            return Err(Report::new(BuildError::InvalidConfig(
                "max_iterations must be >= 1 when set",
            )));
        }
        if self.cfg.overall_timeout.is_some_and(|d| d.is_zero()) {
            return Err(Report::new(BuildError::InvalidConfig(
                "overall_timeout must be > 0 when set",
            )));
        }
        Ok(StabilityParser::from_parts(
            link,
            self.clock,
            self.cfg,
            self.shutdown,
        ))
    }
}
