use anyhow::Result;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::buffers::RecordLog;
use crate::core::Record;
use crate::decoder::{DumpSource, FrameDecoder, Step};
use crate::observability::DecoderMetrics;
use crate::visualization::RecordRow;

/// Why the decode loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    EndOfStream,
    Cancelled,
}

/// Outcome of one decode run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeSummary {
    pub source: String,
    pub frames: u64,
    pub bytes: u64,
    pub wraparounds: u64,
    pub stop_reason: StopReason,
}

/// Byte pump from a [`DumpSource`] through a [`FrameDecoder`] into a [`RecordLog`]
pub struct DecodeTask {
    records: RecordLog,
    metrics: Arc<DecoderMetrics>,
    feed: Option<Sender<RecordRow>>,
    chunk_size: usize,
}

impl DecodeTask {
    pub fn new(records: RecordLog, metrics: Arc<DecoderMetrics>, chunk_size: usize) -> Self {
        Self {
            records,
            metrics,
            feed: None,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Mirror every decoded record as a table row on `feed`
    pub fn with_feed(mut self, feed: Sender<RecordRow>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Decode until end of stream, a shutdown signal, or a read error.
    ///
    /// Shutdown is checked before every read and before every byte of a
    /// chunk. The source is closed on every exit path and a frame still
    /// being buffered is dropped.
    pub async fn run(
        mut self,
        mut source: Box<dyn DumpSource>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<DecodeSummary> {
        let name = source.describe();
        log::info!("Decoding {}", name);

        let outcome = self.pump(source.as_mut(), &mut shutdown_rx).await;

        if let Err(e) = source.close().await {
            log::warn!("Failed to close {}: {:#}", name, e);
        }

        let stop_reason = match outcome {
            Ok(reason) => reason,
            Err(e) => {
                log::warn!("Decoding {} failed: {:#}", name, e);
                return Err(e);
            }
        };

        let summary = DecodeSummary {
            source: name,
            frames: self.metrics.frames_decoded(),
            bytes: self.metrics.bytes_read(),
            wraparounds: self.metrics.wraparounds(),
            stop_reason,
        };
        log::info!(
            "File reading stopped ({:?}). Decoded {} frames from {} bytes",
            summary.stop_reason,
            summary.frames,
            summary.bytes
        );
        Ok(summary)
    }

    async fn pump(
        &mut self,
        source: &mut dyn DumpSource,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<StopReason> {
        let mut decoder = FrameDecoder::new();
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let start = self.metrics.start_read();
            let n = tokio::select! {
                biased;
                // A closed channel means the owning session is gone
                _ = shutdown_rx.recv() => return Ok(StopReason::Cancelled),
                read = source.read_chunk(&mut buf) => read?,
            };
            self.metrics.finish_read(start, n);

            if n == 0 {
                return Ok(StopReason::EndOfStream);
            }

            for &byte in &buf[..n] {
                if stop_requested(shutdown_rx) {
                    return Ok(StopReason::Cancelled);
                }
                match decoder.push(byte) {
                    Step::Frame(record) => self.emit(record),
                    Step::Wrapped => {
                        self.metrics.record_wraparound();
                        log::debug!(
                            "No delimiter within {} bytes; decoding from a misaligned window",
                            crate::decoder::FRAME_LEN
                        );
                    }
                    Step::Buffered => {}
                }
            }
        }
    }

    fn emit(&mut self, record: Record) {
        let index = self.records.push(record);
        self.metrics.record_frame();

        let disconnected = match &self.feed {
            Some(feed) => feed.send(RecordRow::new(index, &record)).is_err(),
            None => false,
        };
        if disconnected {
            log::debug!("Record feed receiver dropped; no longer mirroring rows");
            self.feed = None;
        }
    }
}

/// Non-blocking shutdown check between bytes of an already read chunk
fn stop_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty))
}
