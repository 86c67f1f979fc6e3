//! Test and helper links for scale_core

use scale_traits::{Chunk, SerialLink};

/// A link whose every read times out; useful for exercising session caps and
/// interruption without a device.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLink;

impl SerialLink for SilentLink {
    fn read_chunk(&mut self, _max_bytes: usize) -> Chunk {
        Chunk::Empty
    }
}

/// A link that fails every read as if the cable had been pulled.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnpluggedLink;

impl SerialLink for UnpluggedLink {
    fn read_chunk(&mut self, _max_bytes: usize) -> Chunk {
        Chunk::Error(Box::new(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "device unplugged",
        )))
    }
}
