use crate::core::Point3D;
use serde::{Deserialize, Serialize};

/// Coordinate of the three projection planes outside the unit cube
pub const PLANE_OFFSET: f64 = -0.5;

/// Point cloud flattened onto the xy, xz and yz side planes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneProjections {
    pub xy: Vec<Point3D>,
    pub xz: Vec<Point3D>,
    pub yz: Vec<Point3D>,
}

impl PlaneProjections {
    pub fn from_points(points: &[Point3D]) -> Self {
        Self {
            xy: points
                .iter()
                .map(|p| Point3D::new(p.x, p.y, PLANE_OFFSET))
                .collect(),
            xz: points
                .iter()
                .map(|p| Point3D::new(p.x, PLANE_OFFSET, p.z))
                .collect(),
            yz: points
                .iter()
                .map(|p| Point3D::new(PLANE_OFFSET, p.y, p.z))
                .collect(),
        }
    }
}
