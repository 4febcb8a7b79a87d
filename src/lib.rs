//! Decode binary telemetry dumps into timestamped records and turn them into
//! a normalized point cloud with per-axis histograms.

pub mod aggregate;
pub mod binning;
pub mod buffers;
pub mod config;
pub mod core;
pub mod decoder;
pub mod engine;
pub mod observability;
pub mod visualization;

pub use crate::aggregate::{AxisFilter, AxisFilters, TimeBlockAggregator};
pub use crate::config::ViewerConfig;
pub use crate::core::{Point3D, Record};
pub use crate::decoder::FrameDecoder;
pub use crate::engine::{Session, SessionError};
