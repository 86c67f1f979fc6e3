pub mod connection;
pub mod error;

pub use connection::SerialConnection;
pub use error::TransportError;

use scale_traits::{Chunk, SerialLink};
use std::collections::VecDeque;
use std::time::Duration;

/// Platform default device path for the scale.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection parameters for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    /// Per-read timeout; an expired read yields an empty chunk.
    pub timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SerialSettings {
    pub fn new(port: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout,
        }
    }

    /// Open a connection with these settings.
    pub fn open(&self) -> error::Result<SerialConnection> {
        SerialConnection::open(self)
    }
}

/// A serial port visible to the OS.
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub name: String,
    pub kind: &'static str,
}

/// Enumerate serial ports known to the OS.
pub fn list_ports() -> error::Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()
        .map_err(|e| TransportError::Io(std::io::Error::other(e.to_string())))?;
    Ok(ports
        .into_iter()
        .map(|p| PortInfo {
            kind: port_type_name(&p.port_type),
            name: p.port_name,
        })
        .collect())
}

fn port_type_name(port_type: &serialport::SerialPortType) -> &'static str {
    match port_type {
        serialport::SerialPortType::UsbPort(_) => "USB",
        serialport::SerialPortType::BluetoothPort => "Bluetooth",
        serialport::SerialPortType::PciPort => "PCI",
        serialport::SerialPortType::Unknown => "Unknown",
    }
}

#[derive(Debug, Clone)]
enum Step {
    Data(Vec<u8>),
    Silence,
    Fail(String),
}

/// Simulated scale link replaying a scripted sequence of reads.
///
/// Data steps longer than the requested quantum are split across reads.
/// Once the script is exhausted the link either goes silent or, when built
/// with [`SimulatedLink::looping`], starts over.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLink {
    script: Vec<Step>,
    pending: VecDeque<Step>,
    looping: bool,
    reads: usize,
}

impl SimulatedLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole stream delivered as one data step (split by the read quantum).
    pub fn from_stream(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new().data(bytes)
    }

    /// Append a data step.
    pub fn data(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.push(Step::Data(bytes.into()));
        self
    }

    /// Append a read that times out with no data.
    pub fn silence(mut self) -> Self {
        self.push(Step::Silence);
        self
    }

    /// Append a read that fails as if the device dropped off the bus.
    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.push(Step::Fail(reason.into()));
        self
    }

    /// Replay the script indefinitely.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Number of `read_chunk` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn push(&mut self, step: Step) {
        self.script.push(step.clone());
        self.pending.push_back(step);
    }

    fn next_step(&mut self) -> Option<Step> {
        if self.pending.is_empty() && self.looping && !self.script.is_empty() {
            self.pending.extend(self.script.iter().cloned());
        }
        self.pending.pop_front()
    }
}

impl SerialLink for SimulatedLink {
    fn read_chunk(&mut self, max_bytes: usize) -> Chunk {
        self.reads += 1;
        match self.next_step() {
            None | Some(Step::Silence) => Chunk::Empty,
            Some(Step::Fail(reason)) => {
                tracing::warn!(%reason, "simulated serial fault");
                Chunk::Error(Box::new(TransportError::Simulated(reason)))
            }
            Some(Step::Data(mut bytes)) => {
                let take = max_bytes.max(1);
                if bytes.len() > take {
                    let rest = bytes.split_off(take);
                    self.pending.push_front(Step::Data(rest));
                }
                if bytes.is_empty() {
                    Chunk::Empty
                } else {
                    Chunk::Data(bytes)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(chunk: Chunk) -> Vec<u8> {
        match chunk {
            Chunk::Data(b) => b,
            other => panic!("expected data, got {other:?}"),
        }
    }

    #[test]
    fn splits_data_by_quantum() {
        let mut link = SimulatedLink::from_stream("0123456789");
        assert_eq!(bytes(link.read_chunk(4)), b"0123");
        assert_eq!(bytes(link.read_chunk(4)), b"4567");
        assert_eq!(bytes(link.read_chunk(4)), b"89");
        assert!(matches!(link.read_chunk(4), Chunk::Empty));
        assert_eq!(link.reads(), 4);
    }

    #[test]
    fn silence_and_fault_steps() {
        let mut link = SimulatedLink::new().silence().fail("unplugged");
        assert!(matches!(link.read_chunk(8), Chunk::Empty));
        match link.read_chunk(8) {
            Chunk::Error(e) => assert!(e.to_string().contains("unplugged")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn looping_replays_script() {
        let mut link = SimulatedLink::from_stream("05=").looping();
        for _ in 0..3 {
            assert_eq!(bytes(link.read_chunk(128)), b"05=");
        }
    }

    #[test]
    fn default_settings_match_device_defaults() {
        let s = SerialSettings::default();
        assert_eq!(s.port, DEFAULT_PORT);
        assert_eq!(s.baud_rate, 9600);
        assert_eq!(s.timeout, Duration::from_secs(1));
    }
}
