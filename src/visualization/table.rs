use crate::core::Record;
use serde::{Deserialize, Serialize};

/// Record formatted for a tabular view: addresses and payload as hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub index: usize,
    pub timestamp: u16,
    pub source: String,
    pub destination: String,
    pub payload: String,
}

impl RecordRow {
    pub fn new(index: usize, record: &Record) -> Self {
        Self {
            index,
            timestamp: record.timestamp,
            source: hex::encode([record.source]),
            destination: hex::encode([record.destination]),
            payload: hex::encode([record.payload]),
        }
    }

    pub fn headers() -> [&'static str; 5] {
        ["Packet", "Time", "Src", "Dst", "Data"]
    }

    pub fn cells(&self) -> [String; 5] {
        [
            self.index.to_string(),
            self.timestamp.to_string(),
            self.source.clone(),
            self.destination.clone(),
            self.payload.clone(),
        ]
    }
}

/// Rows for a whole record sequence, indexed in decode order
pub fn record_rows(records: &[Record]) -> Vec<RecordRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| RecordRow::new(index, record))
        .collect()
}
