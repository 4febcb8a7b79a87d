//! Ten-bucket histograms over normalized axis values.

use crate::core::Point3D;
use serde::{Deserialize, Serialize};

/// Number of equal-width intervals over `[0, 1)`
pub const BIN_COUNT: usize = 10;

/// Interval width
pub const BIN_WIDTH: f64 = 0.1;

/// Thickness of a bar across its non-counting dimension
pub const DEFAULT_BAR_WIDTH: f64 = 0.08;

/// Offset of the bar planes from the unit cube
const BAR_PLANE: f64 = 1.5;

/// Geometric layout of one axis's bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Bars stacked along y on the z = 1.5 plane, growing along x
    X,
    /// Bars stacked along x on the y = 1.5 plane, growing along z
    Y,
    /// Bars stacked along y on the x = 1.5 plane, growing along z
    Z,
}

impl Orientation {
    /// Which `size` component carries the normalized count
    pub fn count_dimension(self) -> usize {
        match self {
            Orientation::X => 0,
            Orientation::Y | Orientation::Z => 2,
        }
    }

    pub fn position(self, lower: f64) -> [f64; 3] {
        match self {
            Orientation::X => [0.0, lower, BAR_PLANE],
            Orientation::Y => [lower, BAR_PLANE, 0.0],
            Orientation::Z => [BAR_PLANE, lower, 0.0],
        }
    }

    pub fn size(self, height: f64, bar_width: f64) -> [f64; 3] {
        match self {
            Orientation::X => [height, bar_width, 0.0],
            Orientation::Y => [bar_width, 0.0, height],
            Orientation::Z => [0.0, bar_width, height],
        }
    }
}

/// One non-empty histogram bucket with renderer geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub index: usize,
    pub count: usize,
    pub position: [f64; 3],
    pub size: [f64; 3],
}

/// Lower and upper bound of interval `index`
pub fn interval(index: usize) -> (f64, f64) {
    let lower = index as f64 / BIN_COUNT as f64;
    (lower, lower + BIN_WIDTH)
}

/// Values in `[lower, upper)` for every interval.
///
/// Each interval is tested on its own, so `1.0` lands in none of them.
pub fn counts(values: &[f64]) -> [usize; BIN_COUNT] {
    let mut counts = [0; BIN_COUNT];
    for (index, count) in counts.iter_mut().enumerate() {
        let (lower, upper) = interval(index);
        *count = values.iter().filter(|&&v| lower <= v && v < upper).count();
    }
    counts
}

/// Histogram builder for a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinner {
    orientation: Orientation,
    bar_width: f64,
}

impl AxisBinner {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Bins for every non-empty interval, heights scaled by the fullest one.
    /// Empty or out-of-range input yields no bins.
    pub fn bin(&self, values: &[f64]) -> Vec<Bin> {
        let counts = counts(values);
        let max_count = counts.iter().copied().max().unwrap_or(0);
        if max_count == 0 {
            return Vec::new();
        }

        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, &count)| {
                let (lower, _) = interval(index);
                let height = count as f64 / max_count as f64;
                Bin {
                    index,
                    count,
                    position: self.orientation.position(lower),
                    size: self.orientation.size(height, self.bar_width),
                }
            })
            .collect()
    }
}

/// Bar charts for all three orientations of a point cloud
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisBars {
    /// Histogram of the y coordinates, laid out in [`Orientation::X`]
    pub x: Vec<Bin>,
    /// Histogram of the x coordinates, laid out in [`Orientation::Y`]
    pub y: Vec<Bin>,
    /// Histogram of the z coordinates, laid out in [`Orientation::Z`] with
    /// bar positions in reverse order
    pub z: Vec<Bin>,
}

impl AxisBars {
    pub fn from_points(points: &[Point3D], bar_width: f64) -> Self {
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let zs: Vec<f64> = points.iter().map(|p| p.z).collect();

        let x = AxisBinner::new(Orientation::X)
            .with_bar_width(bar_width)
            .bin(&ys);
        let y = AxisBinner::new(Orientation::Y)
            .with_bar_width(bar_width)
            .bin(&xs);
        let mut z = AxisBinner::new(Orientation::Z)
            .with_bar_width(bar_width)
            .bin(&zs);

        let reversed: Vec<[f64; 3]> = z.iter().rev().map(|bin| bin.position).collect();
        for (bin, position) in z.iter_mut().zip(reversed) {
            bin.position = position;
        }

        Self { x, y, z }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty() && self.z.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds() {
        assert_eq!(interval(0), (0.0, 0.1));
        let (lower, upper) = interval(9);
        assert_eq!(lower, 0.9);
        assert_eq!(upper, 1.0);
    }

    #[test]
    fn test_negative_values_are_ignored() {
        assert_eq!(counts(&[-0.01]), [0; BIN_COUNT]);
    }

    #[test]
    fn test_count_dimension_matches_size_rule() {
        for orientation in [Orientation::X, Orientation::Y, Orientation::Z] {
            let size = orientation.size(0.5, DEFAULT_BAR_WIDTH);
            assert_eq!(size[orientation.count_dimension()], 0.5);
        }
    }
}
