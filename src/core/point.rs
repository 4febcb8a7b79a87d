use serde::{Deserialize, Serialize};

/// One aggregated sample of the point cloud.
///
/// Coordinates hold payload averages until the aggregator normalizes the
/// whole sequence, after which every coordinate lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Largest of the three coordinates
    pub fn max_coordinate(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }

    pub fn scaled(self, divisor: f64) -> Self {
        Self {
            x: self.x / divisor,
            y: self.y / divisor,
            z: self.z / divisor,
        }
    }
}
