pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Outcome of a single read from the serial device.
///
/// A read timeout is not a fault: it is reported as `Empty` so the caller can
/// branch on the variant instead of inspecting error kinds.
#[derive(Debug)]
pub enum Chunk {
    /// No data arrived within the read window.
    Empty,
    /// Raw bytes, at most the requested quantum.
    Data(Vec<u8>),
    /// The device failed or disconnected mid-read.
    Error(Box<dyn std::error::Error + Send + Sync>),
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        match self {
            Chunk::Empty => true,
            Chunk::Data(bytes) => bytes.is_empty(),
            Chunk::Error(_) => false,
        }
    }
}

/// A byte source delivering chunks from a scale.
pub trait SerialLink {
    /// Block up to the link's read timeout and return at most `max_bytes`.
    fn read_chunk(&mut self, max_bytes: usize) -> Chunk;
}

impl<L: SerialLink + ?Sized> SerialLink for Box<L> {
    fn read_chunk(&mut self, max_bytes: usize) -> Chunk {
        (**self).read_chunk(max_bytes)
    }
}
