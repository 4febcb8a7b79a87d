use crate::binning::AxisBars;
use crate::core::Point3D;
use serde::{Deserialize, Serialize};

use super::projection::PlaneProjections;

/// Everything a renderer needs for one recompute: the normalized cloud, its
/// side-plane shadows and the three bar charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub points: Vec<Point3D>,
    pub projections: PlaneProjections,
    pub bars: AxisBars,
}

impl Scene {
    pub fn new(points: Vec<Point3D>, bar_width: f64) -> Self {
        let projections = PlaneProjections::from_points(&points);
        let bars = AxisBars::from_points(&points, bar_width);
        Self {
            points,
            projections,
            bars,
        }
    }

    /// Nothing to draw; renderers should skip the update
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
