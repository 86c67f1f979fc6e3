use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open serial port '{port}': {reason}")]
    Open { port: String, reason: String },
    #[error("serial device disconnected")]
    Disconnected,
    #[error("simulated fault: {0}")]
    Simulated(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub fn open(port: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Open {
            port: port.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
