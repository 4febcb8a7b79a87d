pub mod reader;
pub mod session;
pub mod state;

pub use reader::{DecodeSummary, DecodeTask, StopReason};
pub use session::{Session, SessionError, StopHandle};
pub use state::SessionState;
