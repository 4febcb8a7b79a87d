//! Data-side half of the display boundary: table rows, plane projections,
//! bundled scenes and printable reports.

pub mod projection;
pub mod report;
pub mod scene;
pub mod table;

pub use projection::{PlaneProjections, PLANE_OFFSET};
pub use report::Report;
pub use scene::Scene;
pub use table::{record_rows, RecordRow};
