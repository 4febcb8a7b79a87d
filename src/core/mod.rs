pub mod point;
pub mod record;

pub use point::Point3D;
pub use record::Record;
