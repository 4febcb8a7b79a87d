use crate::core::Record;

/// Maximal run of records sharing one timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBlock<'a> {
    pub timestamp: u16,
    pub records: &'a [Record],
}

impl<'a> TimeBlock<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable sort by timestamp; equal timestamps keep decode order
pub fn sort_by_timestamp(records: &[Record]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.timestamp);
    sorted
}

/// Split a timestamp-sorted slice into time blocks, ascending
pub fn time_blocks(sorted: &[Record]) -> Vec<TimeBlock<'_>> {
    let mut blocks = Vec::new();
    let mut start = 0;

    while start < sorted.len() {
        let timestamp = sorted[start].timestamp;
        let end = sorted[start..]
            .iter()
            .position(|record| record.timestamp != timestamp)
            .map_or(sorted.len(), |offset| start + offset);

        blocks.push(TimeBlock {
            timestamp,
            records: &sorted[start..end],
        });
        start = end;
    }

    blocks
}
