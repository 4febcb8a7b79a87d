use super::blocks::{sort_by_timestamp, time_blocks, TimeBlock};
use super::filter::{Axis, AxisFilters};
use crate::core::{Point3D, Record};
use thiserror::Error;

/// Minimum number of records before aggregation is attempted
pub const MIN_RECORDS: usize = 2;

/// Errors produced while turning records into a normalized point cloud.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("every coordinate is zero; the point cloud cannot be normalized")]
    DegenerateNormalization,
}

/// Running sum of matched payloads for one axis
#[derive(Debug, Clone, Copy, Default)]
struct AxisAccumulator {
    sum: f64,
    matches: u32,
}

impl AxisAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.matches += 1;
    }

    fn mean(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.sum / f64::from(self.matches)
        }
    }
}

/// Coalesces time blocks into averaged points
#[derive(Debug, Clone)]
pub struct TimeBlockAggregator {
    filters: AxisFilters,
    blocks_per_point: usize,
}

impl TimeBlockAggregator {
    /// `blocks_per_point` extra blocks are merged into every point; 0 keeps
    /// one point per distinct timestamp
    pub fn new(filters: AxisFilters, blocks_per_point: usize) -> Self {
        Self {
            filters,
            blocks_per_point,
        }
    }

    pub fn filters(&self) -> &AxisFilters {
        &self.filters
    }

    pub fn blocks_per_point(&self) -> usize {
        self.blocks_per_point
    }

    /// Sorted, grouped, averaged and normalized point cloud.
    ///
    /// Returns an empty cloud for fewer than [`MIN_RECORDS`] records or when
    /// no coalescing window was completed.
    pub fn aggregate(&self, records: &[Record]) -> Result<Vec<Point3D>, AggregateError> {
        let mut points = self.averaged_points(records);
        normalize(&mut points)?;
        Ok(points)
    }

    /// Per-window averages in payload units, before normalization
    pub fn averaged_points(&self, records: &[Record]) -> Vec<Point3D> {
        if records.len() < MIN_RECORDS {
            return Vec::new();
        }

        let sorted = sort_by_timestamp(records);
        let window = self.blocks_per_point + 1;

        let mut points = Vec::new();
        let mut accumulators = [AxisAccumulator::default(); 3];
        let mut blocks_in_window = 0;

        for block in time_blocks(&sorted) {
            self.accumulate(&block, &mut accumulators);
            blocks_in_window += 1;

            if blocks_in_window == window {
                points.push(Point3D::new(
                    accumulators[0].mean(),
                    accumulators[1].mean(),
                    accumulators[2].mean(),
                ));
                accumulators = [AxisAccumulator::default(); 3];
                blocks_in_window = 0;
            }
        }

        if blocks_in_window > 0 {
            log::debug!(
                "Dropping {} trailing time block(s) short of a {}-block window",
                blocks_in_window,
                window
            );
        }

        points
    }

    fn accumulate(&self, block: &TimeBlock<'_>, accumulators: &mut [AxisAccumulator; 3]) {
        for record in block.records {
            for (slot, axis) in Axis::all().into_iter().enumerate() {
                if self.filters.get(axis).matches(record) {
                    accumulators[slot].add(record.value());
                }
            }
        }
    }
}

/// Divide every coordinate by the largest coordinate in the cloud.
///
/// An empty cloud is left untouched. A cloud whose largest coordinate is
/// zero has no valid scale and is rejected instead of filled with NaN.
pub fn normalize(points: &mut [Point3D]) -> Result<(), AggregateError> {
    if points.is_empty() {
        return Ok(());
    }

    let max = points
        .iter()
        .map(Point3D::max_coordinate)
        .fold(f64::NEG_INFINITY, f64::max);

    if max == 0.0 {
        return Err(AggregateError::DegenerateNormalization);
    }

    for point in points.iter_mut() {
        *point = point.scaled(max);
    }
    Ok(())
}
