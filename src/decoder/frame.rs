use crate::core::Record;

/// Number of byte slots between two delimiters in a well-formed dump
pub const FRAME_LEN: usize = 19;

/// Delimiter byte; two in a row close a frame
pub const DELIMITER: u8 = 0xFF;

const TIMESTAMP_LO: usize = 0;
const TIMESTAMP_HI: usize = 1;
const SOURCE: usize = 6;
const DESTINATION: usize = 7;
const PAYLOAD: usize = 9;

/// Result of feeding one byte into the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Byte stored, cursor advanced
    Buffered,
    /// Byte stored in the last slot and the cursor wrapped to 0 without a
    /// delimiter; subsequent fields are read from a misaligned window until
    /// the next delimiter pair resynchronizes
    Wrapped,
    /// Byte completed a delimiter pair
    Frame(Record),
}

/// Streaming decoder for `0xFF 0xFF` terminated frames.
///
/// The buffer is never cleared. When a delimiter pair arrives after fewer
/// than [`FRAME_LEN`] bytes, slots the current frame did not reach still hold
/// bytes from an earlier frame and are read as-is.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    buffer: [u8; FRAME_LEN],
    cursor: usize,
    previous: u8,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: [0; FRAME_LEN],
            cursor: 0,
            previous: 0,
        }
    }

    /// Write cursor for the next incoming byte
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn push(&mut self, byte: u8) -> Step {
        self.buffer[self.cursor] = byte;
        let closes_frame = byte == DELIMITER && self.previous == DELIMITER;
        self.previous = byte;

        if closes_frame {
            self.cursor = 0;
            return Step::Frame(self.record());
        }

        self.cursor += 1;
        if self.cursor >= FRAME_LEN {
            self.cursor = 0;
            return Step::Wrapped;
        }
        Step::Buffered
    }

    /// Decode a complete byte slice; a trailing partial frame is dropped
    pub fn decode(bytes: &[u8]) -> Vec<Record> {
        let mut decoder = Self::new();
        bytes
            .iter()
            .filter_map(|&byte| match decoder.push(byte) {
                Step::Frame(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    fn record(&self) -> Record {
        let timestamp =
            u16::from_le_bytes([self.buffer[TIMESTAMP_LO], self.buffer[TIMESTAMP_HI]]);
        Record::new(
            timestamp,
            self.buffer[SOURCE],
            self.buffer[DESTINATION],
            self.buffer[PAYLOAD],
        )
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
