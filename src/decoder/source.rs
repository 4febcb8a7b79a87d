use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Lifecycle of a byte source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Unopened,
    Opened,
    Closed,
}

/// Byte producer feeding the decode loop
#[async_trait]
pub trait DumpSource: Send {
    /// Human-readable origin, used in logs and session status
    fn describe(&self) -> String;

    async fn open(&mut self) -> Result<()>;

    /// Fill `buf` with the next bytes; `Ok(0)` signals end of stream
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    async fn close(&mut self) -> Result<()>;

    fn state(&self) -> SourceState;
}

/// Dump file on disk
pub struct FileSource {
    path: PathBuf,
    file: Option<File>,
    state: SourceState,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            state: SourceState::Unopened,
        }
    }
}

#[async_trait]
impl DumpSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn open(&mut self) -> Result<()> {
        if self.state != SourceState::Unopened {
            return Err(anyhow!("Cannot open source in state {:?}", self.state));
        }
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("Failed to open dump {:?}", self.path))?;
        self.file = Some(file);
        self.state = SourceState::Opened;
        Ok(())
    }

    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| anyhow!("Source not open: {:?}", self.path))?;
        let n = file
            .read(buf)
            .await
            .with_context(|| format!("Failed to read dump {:?}", self.path))?;
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        self.file = None;
        self.state = SourceState::Closed;
        Ok(())
    }

    fn state(&self) -> SourceState {
        self.state
    }
}

/// Any async reader as a dump source (sockets, pipes, in-memory cursors)
pub struct ReaderSource<R> {
    label: String,
    reader: Option<R>,
    state: SourceState,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(label: impl Into<String>, reader: R) -> Self {
        Self {
            label: label.into(),
            reader: Some(reader),
            state: SourceState::Unopened,
        }
    }
}

#[async_trait]
impl<R> DumpSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn open(&mut self) -> Result<()> {
        if self.state != SourceState::Unopened {
            return Err(anyhow!("Cannot open source in state {:?}", self.state));
        }
        self.state = SourceState::Opened;
        Ok(())
    }

    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.state != SourceState::Opened {
            return Err(anyhow!("Source {} not open", self.label));
        }
        match self.reader.as_mut() {
            Some(reader) => Ok(reader.read(buf).await?),
            None => Ok(0),
        }
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the reader releases the underlying handle
        self.reader = None;
        self.state = SourceState::Closed;
        Ok(())
    }

    fn state(&self) -> SourceState {
        self.state
    }
}
