//! Frame recovery from unframed telemetry dumps.

pub mod frame;
pub mod source;

pub use frame::{FrameDecoder, Step, DELIMITER, FRAME_LEN};
pub use source::{DumpSource, FileSource, ReaderSource, SourceState};
