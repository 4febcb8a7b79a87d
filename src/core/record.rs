use serde::{Deserialize, Serialize};

/// One decoded message from a telemetry dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Little-endian 16-bit counter from frame offsets 0 and 1
    pub timestamp: u16,

    /// Sender address (frame offset 6)
    pub source: u8,

    /// Receiver address (frame offset 7)
    pub destination: u8,

    /// Data value (frame offset 9)
    pub payload: u8,
}

impl Record {
    pub fn new(timestamp: u16, source: u8, destination: u8, payload: u8) -> Self {
        Self {
            timestamp,
            source,
            destination,
            payload,
        }
    }

    /// Payload as an unsigned magnitude for averaging
    pub fn value(&self) -> f64 {
        f64::from(self.payload)
    }

    /// True when the record travelled from `source` to `destination`
    pub fn routes(&self, source: u8, destination: u8) -> bool {
        self.source == source && self.destination == destination
    }
}
