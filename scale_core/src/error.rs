use thiserror::Error;

/// Terminal outcomes of a read session other than a stable weight.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightError {
    /// The device could not be opened or failed mid-session.
    #[error("connection error: {0}")]
    Connection(String),
    /// A configured session cap ran out before two matching readings arrived.
    #[error("no stable reading after {iterations} reads")]
    NoStableReading { iterations: u64 },
    /// A confirmed token is not a decimal number.
    #[error("malformed token {token:?}: not a decimal number")]
    MalformedToken { token: String },
    /// The caller or a shutdown signal cancelled the session.
    #[error("read interrupted")]
    Interrupted,
}

impl WeightError {
    /// True for faults of the transport rather than of the reading itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, WeightError::Connection(_))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing serial link")]
    MissingLink,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
