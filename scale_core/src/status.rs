//! Per-step status and session state of the stability parser.

use crate::weight::StableWeight;

/// Public status of a single step of the read loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseStatus {
    /// Keep reading; no confirmed value yet.
    Pending,
    /// Two consecutive equal readings arrived.
    Stable(StableWeight),
}

/// Where the session currently is in the stability protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// No candidate held.
    #[default]
    AwaitingData,
    /// One reading held, waiting for a confirming one.
    HaveCandidate,
    /// Confirmed; the session produced its weight.
    Stable,
    /// Transport fault, interruption, cap or malformed value ended the session.
    Failed,
}

impl ParserState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ParserState::Stable | ParserState::Failed)
    }
}
