use std::io::{ErrorKind, Read};

use scale_traits::{Chunk, SerialLink};
use tracing::{debug, error, trace};

use crate::SerialSettings;
use crate::error::{Result, TransportError};

/// An open, exclusively owned serial connection to the scale.
///
/// The port is closed when the value is dropped, so every exit path of a
/// session releases the device.
pub struct SerialConnection {
    port: Box<dyn serialport::SerialPort>,
    name: String,
    buf: Vec<u8>,
}

impl std::fmt::Debug for SerialConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialConnection")
            .field("port", &self.name)
            .finish_non_exhaustive()
    }
}

impl SerialConnection {
    /// Open `settings.port` at the configured baud rate and read timeout.
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        let port = serialport::new(&settings.port, settings.baud_rate)
            .timeout(settings.timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|e| {
                error!(port = %settings.port, error = %e, "serial open failed");
                TransportError::open(&settings.port, e.to_string())
            })?;
        debug!(
            port = %settings.port,
            baud_rate = settings.baud_rate,
            timeout_ms = settings.timeout.as_millis() as u64,
            "serial port opened"
        );
        Ok(Self {
            port,
            name: settings.port.clone(),
            buf: Vec::new(),
        })
    }

    fn read_raw(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        if self.buf.len() < max_bytes {
            self.buf.resize(max_bytes, 0);
        }
        match self.port.read(&mut self.buf[..max_bytes]) {
            Ok(n) => Ok(self.buf[..n].to_vec()),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                Ok(Vec::new())
            }
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(TransportError::Disconnected),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

impl SerialLink for SerialConnection {
    fn read_chunk(&mut self, max_bytes: usize) -> Chunk {
        match self.read_raw(max_bytes) {
            Ok(bytes) if bytes.is_empty() => Chunk::Empty,
            Ok(bytes) => {
                trace!(port = %self.name, len = bytes.len(), "serial chunk");
                Chunk::Data(bytes)
            }
            Err(e) => {
                error!(port = %self.name, error = %e, "serial read failed");
                Chunk::Error(Box::new(e))
            }
        }
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        debug!(port = %self.name, "serial port released");
    }
}
