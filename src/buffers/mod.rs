pub mod record_log;

pub use record_log::RecordLog;
