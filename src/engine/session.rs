use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::aggregate::{AggregateError, FilterError, TimeBlockAggregator};
use crate::buffers::RecordLog;
use crate::config::ViewerConfig;
use crate::core::{Point3D, Record};
use crate::decoder::{DumpSource, FileSource, SourceState};
use crate::engine::reader::{DecodeSummary, DecodeTask, StopReason};
use crate::engine::state::SessionState;
use crate::observability::{DecoderMetrics, MetricsSnapshot};
use crate::visualization::{record_rows, RecordRow, Scene};

/// Errors produced by session requests.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a dump is already being decoded")]
    AlreadyReading,
    #[error("dump file {path:?} does not exist")]
    MissingDump { path: PathBuf },
    #[error("no decode task to wait for")]
    NotReading,
    #[error("dump source failed: {0:#}")]
    Source(anyhow::Error),
    #[error("decode task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Cloneable handle that cancels the running decode task
#[derive(Debug, Clone)]
pub struct StopHandle {
    shutdown_tx: broadcast::Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// One loaded dump: the decode task, the records it produced and the
/// settings used to turn them into a scene
pub struct Session {
    /// Records appended by the decode task in stream order
    records: RecordLog,

    config: ViewerConfig,

    metrics: Arc<DecoderMetrics>,

    /// Shared with the decode task, which writes the final state
    state: Arc<Mutex<SessionState>>,

    /// Row mirror handed to the next decode task
    feed: Option<Sender<RecordRow>>,

    shutdown_tx: Option<broadcast::Sender<()>>,

    handle: Option<JoinHandle<Result<DecodeSummary>>>,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            records: RecordLog::new(),
            config,
            metrics: Arc::new(DecoderMetrics::new()),
            state: Arc::new(Mutex::new(SessionState::Idle)),
            feed: None,
            shutdown_tx: None,
            handle: None,
        }
    }

    pub fn state(&self) -> SessionState {
        lock_state(&self.state).clone()
    }

    pub fn is_reading(&self) -> bool {
        lock_state(&self.state).is_reading()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace settings; takes effect on the next recompute or load
    pub fn set_config(&mut self, config: ViewerConfig) {
        self.config = config;
    }

    pub fn records(&self) -> &RecordLog {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<Record> {
        self.records.snapshot()
    }

    /// Table rows for the first `limit` records decoded so far
    pub fn rows(&self, limit: usize) -> Vec<RecordRow> {
        record_rows(&self.records.head(limit))
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Receive a table row for every record decoded by the next load
    pub fn subscribe(&mut self) -> Receiver<RecordRow> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.feed = Some(tx);
        rx
    }

    /// Start decoding the dump at `path`, replacing any previous records
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        if self.is_reading() {
            return Err(SessionError::AlreadyReading);
        }
        if !path.exists() {
            log::warn!("File {:?} doesn't exist", path);
            return Err(SessionError::MissingDump {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loading data from {:?}", path);
        self.start(Box::new(FileSource::new(path))).await
    }

    /// Start decoding from an arbitrary source, opening it if needed
    pub async fn start(&mut self, mut source: Box<dyn DumpSource>) -> Result<(), SessionError> {
        if self.is_reading() {
            return Err(SessionError::AlreadyReading);
        }

        if source.state() == SourceState::Unopened {
            source.open().await.map_err(SessionError::Source)?;
        }

        transition(
            &self.state,
            SessionState::Reading {
                source: source.describe(),
            },
        )?;

        self.records.clear();
        self.metrics.reset();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(16);
        self.shutdown_tx = Some(shutdown_tx);

        let mut task = DecodeTask::new(
            self.records.clone(),
            self.metrics.clone(),
            self.config.read_chunk,
        );
        if let Some(feed) = &self.feed {
            task = task.with_feed(feed.clone());
        }

        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            let result = task.run(source, shutdown_rx).await;
            let next = match &result {
                Ok(summary) => match summary.stop_reason {
                    StopReason::EndOfStream => SessionState::Finished {
                        frames: summary.frames,
                    },
                    StopReason::Cancelled => SessionState::Stopped {
                        frames: summary.frames,
                    },
                },
                Err(e) => SessionState::Failed {
                    error_msg: format!("{:#}", e),
                },
            };
            *lock_state(&state) = next;
            result
        });

        self.handle = Some(handle);
        Ok(())
    }

    /// Ask the decode task to stop after its current read
    pub fn stop(&self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.send(());
        }
    }

    pub fn stop_handle(&self) -> Option<StopHandle> {
        self.shutdown_tx.as_ref().map(|tx| StopHandle {
            shutdown_tx: tx.clone(),
        })
    }

    /// Wait for the decode task to end and return its summary
    pub async fn wait(&mut self) -> Result<DecodeSummary, SessionError> {
        let handle = self.handle.take().ok_or(SessionError::NotReading)?;
        let result = handle.await?;
        self.shutdown_tx = None;
        result.map_err(SessionError::Source)
    }

    /// Normalized cloud from the records decoded so far; averaging uses the
    /// configured window, otherwise one point per timestamp
    pub fn compute_points(&self, average: bool) -> Result<Vec<Point3D>, SessionError> {
        self.compute_points_with(self.config.blocks_per_point(average))
    }

    pub fn compute_points_with(
        &self,
        blocks_per_point: usize,
    ) -> Result<Vec<Point3D>, SessionError> {
        // Filters are validated before the records are touched
        let filters = self.config.resolve_filters()?;
        let records = self.snapshot();
        let points = TimeBlockAggregator::new(filters, blocks_per_point).aggregate(&records)?;
        log::debug!(
            "Aggregated {} records into {} points (blocks_per_point = {})",
            records.len(),
            points.len(),
            blocks_per_point
        );
        Ok(points)
    }

    pub fn scene(&self, average: bool) -> Result<Scene, SessionError> {
        let points = self.compute_points(average)?;
        Ok(Scene::new(points, self.config.bar_width))
    }
}

/// Dropping a session cancels its decode task but cannot await it
impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock_state(state: &Mutex<SessionState>) -> std::sync::MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn transition(state: &Mutex<SessionState>, next: SessionState) -> Result<(), SessionError> {
    let mut current = lock_state(state);
    if !current.can_transition_to(&next) {
        return Err(SessionError::AlreadyReading);
    }
    *current = next;
    Ok(())
}
