//! The stability parser read loop (`StabilityParser`).
//!
//! Each `step` performs one read: fold the chunk into the frame buffer, take
//! the first completed frame, drop sentinels, compare against the held
//! candidate, then pace before the next read. Two consecutive equal readings
//! end the session with a `StableWeight`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use scale_traits::clock::{Clock, MonotonicClock};
use scale_traits::{Chunk, SerialLink};

use crate::builder::ParserBuilder;
use crate::config::SessionCfg;
use crate::error::{Report, Result, WeightError};
use crate::frame::{FrameBuffer, Token};
use crate::hw_error::map_transport_error;
use crate::stability::{StabilityState, Verdict};
use crate::status::{ParseStatus, ParserState};
use crate::weight::StableWeight;

pub struct StabilityParser<L: SerialLink, C: Clock = MonotonicClock> {
    pub(crate) link: L,
    pub(crate) clock: C,
    pub(crate) cfg: SessionCfg,
    pub(crate) shutdown: Option<Arc<AtomicBool>>,

    pub(crate) buffer: FrameBuffer,
    pub(crate) stability: StabilityState,
    pub(crate) state: ParserState,
    pub(crate) iterations: u64,
    pub(crate) epoch: Option<Instant>,
}

impl<L: SerialLink, C: Clock> core::fmt::Debug for StabilityParser<L, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StabilityParser")
            .field("state", &self.state)
            .field("iterations", &self.iterations)
            .field("held", &self.stability.held())
            .field("pending", &self.buffer.pending())
            .finish()
    }
}

impl<L: SerialLink> StabilityParser<L, MonotonicClock> {
    /// Start building a parser.
    pub fn builder() -> ParserBuilder<L> {
        ParserBuilder::new()
    }
}

impl<L: SerialLink, C: Clock> StabilityParser<L, C> {
    pub(crate) fn from_parts(
        link: L,
        clock: C,
        cfg: SessionCfg,
        shutdown: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            link,
            clock,
            cfg,
            shutdown,
            buffer: FrameBuffer::new(),
            stability: StabilityState::new(),
            state: ParserState::AwaitingData,
            iterations: 0,
            epoch: None,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reads performed in the current session.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The candidate awaiting confirmation, if any.
    pub fn held(&self) -> Option<&str> {
        self.stability.held()
    }

    /// Unterminated text carried into the next read.
    pub fn pending(&self) -> &str {
        self.buffer.pending()
    }

    pub fn session_cfg(&self) -> &SessionCfg {
        &self.cfg
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Give the link back, closing nothing; dropping it releases the device.
    pub fn into_link(self) -> L {
        self.link
    }

    /// Reset per-session state. Call before reusing the parser.
    pub fn begin(&mut self) {
        self.buffer = FrameBuffer::new();
        self.stability.clear();
        self.state = ParserState::AwaitingData;
        self.iterations = 0;
        self.epoch = None;
    }

    /// Read until stable or a terminal failure.
    ///
    /// Without `max_iterations` or `overall_timeout` this only returns on a
    /// confirmed reading, a link fault or an interruption.
    pub fn run(&mut self) -> Result<StableWeight> {
        loop {
            match self.step()? {
                ParseStatus::Pending => continue,
                ParseStatus::Stable(w) => return Ok(w),
            }
        }
    }

    /// One iteration of the read loop.
    pub fn step(&mut self) -> Result<ParseStatus> {
        if self.state.is_terminal() {
            eyre::bail!("session already finished ({:?}); call begin() first", self.state);
        }
        if self.epoch.is_none() {
            self.epoch = Some(self.clock.now());
            tracing::info!(
                chunk_size = self.cfg.chunk_size,
                pace_ms = self.cfg.pace.as_millis() as u64,
                unbounded = self.cfg.is_unbounded(),
                "waiting for stable data"
            );
        }
        if self.interrupted() {
            return self.fail(WeightError::Interrupted);
        }

        let chunk = self.link.read_chunk(self.cfg.chunk_size);
        self.iterations = self.iterations.saturating_add(1);

        match chunk {
            Chunk::Error(e) => return self.fail(map_transport_error(e.as_ref())),
            Chunk::Empty => {
                tracing::trace!(iteration = self.iterations, "no data within read window");
            }
            Chunk::Data(bytes) => {
                tracing::trace!(iteration = self.iterations, len = bytes.len(), "chunk");
                if let Some(token) = self.buffer.fold(&bytes)
                    && let Some(weight) = self.evaluate(token)?
                {
                    return Ok(ParseStatus::Stable(weight));
                }
            }
        }

        if let Some(err) = self.cap_reached() {
            return self.fail(err);
        }
        self.clock.sleep(self.cfg.pace);
        Ok(ParseStatus::Pending)
    }

    fn evaluate(&mut self, token: Token) -> Result<Option<StableWeight>> {
        let reading = match token {
            Token::Reading(r) => r,
            Token::Sentinel(s) => {
                tracing::debug!(token = %s, "skipping invalid reading");
                return Ok(None);
            }
        };

        match self.stability.observe(reading) {
            Verdict::Held => {
                tracing::debug!(candidate = ?self.stability.held(), "candidate reading");
                self.state = ParserState::HaveCandidate;
                Ok(None)
            }
            Verdict::Discrepancy { held, got } => {
                tracing::debug!(%held, %got, "discrepancy found, resetting candidate");
                self.state = ParserState::AwaitingData;
                Ok(None)
            }
            Verdict::Confirmed(text) => match StableWeight::parse(&text) {
                Ok(weight) => {
                    self.state = ParserState::Stable;
                    tracing::info!(
                        weight = weight.value,
                        unit = %weight.unit,
                        iterations = self.iterations,
                        "stable weight detected"
                    );
                    Ok(Some(weight))
                }
                Err(e) => self.fail(e),
            },
        }
    }

    fn interrupted(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn cap_reached(&self) -> Option<WeightError> {
        let by_count = self
            .cfg
            .max_iterations
            .is_some_and(|max| self.iterations >= max);
        let by_time = match (self.cfg.overall_timeout, self.epoch) {
            (Some(limit), Some(epoch)) => self.clock.elapsed_since(epoch) >= limit,
            _ => false,
        };
        (by_count || by_time).then_some(WeightError::NoStableReading {
            iterations: self.iterations,
        })
    }

    fn fail<T>(&mut self, e: WeightError) -> Result<T> {
        self.state = ParserState::Failed;
        match &e {
            WeightError::Connection(_) => tracing::error!(error = %e, "read session failed"),
            WeightError::Interrupted => tracing::info!("read session interrupted"),
            _ => tracing::warn!(error = %e, iterations = self.iterations, "read session failed"),
        }
        Err(Report::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scale_traits::clock::test_clock::TestClock;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Link replaying literal chunks, then timing out forever.
    struct Replay(VecDeque<Chunk>);

    impl Replay {
        fn of(chunks: &[&[u8]]) -> Self {
            Self(
                chunks
                    .iter()
                    .map(|c| {
                        if c.is_empty() {
                            Chunk::Empty
                        } else {
                            Chunk::Data(c.to_vec())
                        }
                    })
                    .collect(),
            )
        }
    }

    impl SerialLink for Replay {
        fn read_chunk(&mut self, _max_bytes: usize) -> Chunk {
            self.0.pop_front().unwrap_or(Chunk::Empty)
        }
    }

    fn parser(chunks: &[&[u8]]) -> (StabilityParser<Replay, TestClock>, TestClock) {
        let clock = TestClock::new();
        let p = StabilityParser::from_parts(
            Replay::of(chunks),
            clock.clone(),
            SessionCfg {
                max_iterations: Some(50),
                ..SessionCfg::default()
            },
            None,
        );
        (p, clock)
    }

    #[test]
    fn state_walks_through_candidate_to_stable() {
        let (mut p, _) = parser(&[b"05=", b"05="]);
        assert_eq!(p.state(), ParserState::AwaitingData);
        assert_eq!(p.step().unwrap(), ParseStatus::Pending);
        assert_eq!(p.state(), ParserState::HaveCandidate);
        assert_eq!(p.held(), Some("50"));
        assert_eq!(
            p.step().unwrap(),
            ParseStatus::Stable(StableWeight::kg(50.0))
        );
        assert_eq!(p.state(), ParserState::Stable);
    }

    #[test]
    fn empty_chunk_changes_nothing_but_paces() {
        let (mut p, clock) = parser(&[b"5", b"", b"0="]);
        p.step().unwrap();
        assert_eq!(p.pending(), "5");
        p.step().unwrap();
        assert_eq!(p.pending(), "5");
        assert_eq!(p.held(), None);
        assert_eq!(p.state(), ParserState::AwaitingData);
        assert_eq!(clock.sleeps(), 2);
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn no_pacing_after_stable() {
        let (mut p, clock) = parser(&[b"3=", b"3="]);
        let w = p.run().unwrap();
        assert_eq!(w.value, 3.0);
        assert_eq!(clock.sleeps(), 1);
    }

    #[test]
    fn step_after_finish_requires_begin() {
        let (mut p, _) = parser(&[b"3=", b"3=", b"4=", b"4="]);
        p.run().unwrap();
        assert!(p.step().is_err());
        p.begin();
        assert_eq!(p.iterations(), 0);
        assert_eq!(p.run().unwrap().value, 4.0);
    }
}
