use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::aggregate::{Axis, AxisFilter, AxisFilters, FilterError};
use crate::binning::DEFAULT_BAR_WIDTH;

/// Bytes requested from the source per read
pub const DEFAULT_READ_CHUNK: usize = 1024;

/// Address pair as typed by the user, validated only when resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub source: String,
    pub destination: String,
}

impl FilterConfig {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Parse `"SRC:DST"` without validating the hex
    pub fn from_pair(pair: &str) -> Option<Self> {
        let (source, destination) = pair.split_once(':')?;
        Some(Self::new(source.trim(), destination.trim()))
    }

    pub fn resolve(&self, axis: Axis) -> Result<AxisFilter, FilterError> {
        AxisFilter::from_hex(axis, &self.source, &self.destination)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new("00", "00")
    }
}

/// Viewer settings: axis filters, averaging window and display tweaks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub x: FilterConfig,
    pub y: FilterConfig,
    pub z: FilterConfig,

    /// Extra time blocks merged into each point when averaging is requested
    pub average_blocks: usize,

    pub bar_width: f64,

    pub read_chunk: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            x: FilterConfig::default(),
            y: FilterConfig::default(),
            z: FilterConfig::default(),
            average_blocks: 0,
            bar_width: DEFAULT_BAR_WIDTH,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

impl ViewerConfig {
    /// Load settings from a JSON file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .context(format!("Failed to read config from {:?}", path))?;

        let config: ViewerConfig =
            serde_json::from_str(&json).context("Failed to deserialize viewer config")?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize viewer config")?;

        fs::write(path, json).context(format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    pub fn filter(&self, axis: Axis) -> &FilterConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn filter_mut(&mut self, axis: Axis) -> &mut FilterConfig {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Validate all three hex pairs; the first malformed field is reported
    pub fn resolve_filters(&self) -> Result<AxisFilters, FilterError> {
        Ok(AxisFilters::new(
            self.x.resolve(Axis::X)?,
            self.y.resolve(Axis::Y)?,
            self.z.resolve(Axis::Z)?,
        ))
    }

    /// Window size for a plain (0) or averaged recompute
    pub fn blocks_per_point(&self, average: bool) -> usize {
        if average {
            self.average_blocks
        } else {
            0
        }
    }
}
