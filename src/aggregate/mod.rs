//! Time-block grouping, per-axis averaging and normalization.

pub mod aggregator;
pub mod blocks;
pub mod filter;

pub use aggregator::{normalize, AggregateError, TimeBlockAggregator, MIN_RECORDS};
pub use blocks::{sort_by_timestamp, time_blocks, TimeBlock};
pub use filter::{Axis, AxisFilter, AxisFilters, FilterError};
