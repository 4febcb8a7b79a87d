use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters updated by the decode task and read by anyone holding the handle
pub struct DecoderMetrics {
    bytes_read: AtomicU64,
    frames_decoded: AtomicU64,
    wraparounds: AtomicU64,
    read_calls: AtomicU64,
    total_read_latency_us: AtomicU64,
}

/// Point-in-time copy of [`DecoderMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub bytes_read: u64,
    pub frames_decoded: u64,
    pub wraparounds: u64,
    pub avg_read_latency_us: u64,
}

impl DecoderMetrics {
    pub fn new() -> Self {
        Self {
            bytes_read: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            wraparounds: AtomicU64::new(0),
            read_calls: AtomicU64::new(0),
            total_read_latency_us: AtomicU64::new(0),
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded.load(Ordering::Relaxed)
    }

    pub fn wraparounds(&self) -> u64 {
        self.wraparounds.load(Ordering::Relaxed)
    }

    pub fn start_read(&self) -> Instant {
        Instant::now()
    }

    /// Record a completed read of `bytes` bytes started at `start`
    pub fn finish_read(&self, start: Instant, bytes: usize) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_read_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_frame(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_wraparound(&self) {
        self.wraparounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_read_latency(&self) -> Duration {
        let calls = self.read_calls.load(Ordering::Relaxed);
        if calls == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.total_read_latency_us.load(Ordering::Relaxed) / calls)
    }

    pub fn reset(&self) {
        self.bytes_read.store(0, Ordering::Relaxed);
        self.frames_decoded.store(0, Ordering::Relaxed);
        self.wraparounds.store(0, Ordering::Relaxed);
        self.read_calls.store(0, Ordering::Relaxed);
        self.total_read_latency_us.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bytes_read: self.bytes_read(),
            frames_decoded: self.frames_decoded(),
            wraparounds: self.wraparounds(),
            avg_read_latency_us: self.avg_read_latency().as_micros() as u64,
        }
    }
}

impl Default for DecoderMetrics {
    fn default() -> Self {
        Self::new()
    }
}
