mod point_id;
mod point_set;

pub use point_id::PointId;
pub use point_set::{PointRecord, PointSet};
