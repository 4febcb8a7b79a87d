use crate::core::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Point-cloud axis an address filter feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while building axis filters from hex text.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{axis} filter {field} '{value}' is not valid hex: {source}")]
    InvalidHex {
        axis: Axis,
        field: &'static str,
        value: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("{axis} filter {field} '{value}' must be exactly one byte, got {len}")]
    WrongLength {
        axis: Axis,
        field: &'static str,
        value: String,
        len: usize,
    },
    #[error("{axis} filter '{value}' must look like SRC:DST")]
    MissingSeparator { axis: Axis, value: String },
}

/// `(source, destination)` address pair selecting the records of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisFilter {
    pub source: u8,
    pub destination: u8,
}

impl AxisFilter {
    pub fn new(source: u8, destination: u8) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Build a filter from two single-byte hex strings such as `"1a"` and `"2B"`
    pub fn from_hex(axis: Axis, source: &str, destination: &str) -> Result<Self, FilterError> {
        Ok(Self {
            source: parse_byte(axis, "source", source)?,
            destination: parse_byte(axis, "destination", destination)?,
        })
    }

    /// Build a filter from `"SRC:DST"` shorthand
    pub fn from_pair(axis: Axis, pair: &str) -> Result<Self, FilterError> {
        let (source, destination) = pair
            .split_once(':')
            .ok_or_else(|| FilterError::MissingSeparator {
                axis,
                value: pair.to_string(),
            })?;
        Self::from_hex(axis, source, destination)
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.routes(self.source, self.destination)
    }
}

/// One filter per axis, validated before any aggregation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisFilters {
    pub x: AxisFilter,
    pub y: AxisFilter,
    pub z: AxisFilter,
}

impl AxisFilters {
    pub fn new(x: AxisFilter, y: AxisFilter, z: AxisFilter) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> &AxisFilter {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

fn parse_byte(axis: Axis, field: &'static str, text: &str) -> Result<u8, FilterError> {
    let trimmed = text.trim();
    let bytes = hex::decode(trimmed).map_err(|source| FilterError::InvalidHex {
        axis,
        field,
        value: text.to_string(),
        source,
    })?;

    match bytes.as_slice() {
        [byte] => Ok(*byte),
        _ => Err(FilterError::WrongLength {
            axis,
            field,
            value: text.to_string(),
            len: bytes.len(),
        }),
    }
}
