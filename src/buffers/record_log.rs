use crate::core::Record;
use std::sync::{Arc, Mutex, MutexGuard};

/// Append-only record sequence shared between the decode task and readers.
///
/// Every access goes through the mutex, so a reader always observes a
/// prefix of whole records in decode order.
#[derive(Debug, Default)]
pub struct RecordLog {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index in decode order
    pub fn push(&self, record: Record) -> usize {
        let mut records = self.lock();
        records.push(record);
        records.len() - 1
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Record> {
        self.lock().get(index).copied()
    }

    /// Copy of everything appended so far
    pub fn snapshot(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// Copy of at most the first `limit` records
    pub fn head(&self, limit: usize) -> Vec<Record> {
        let records = self.lock();
        records[..limit.min(records.len())].to_vec()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for RecordLog {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}
