use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a point feature.
///
/// Ids are opaque apart from their numeric order, which decides ties between
/// equidistant candidates. They need not be contiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PointId {
    fn from(value: u64) -> Self { Self(value) }
}
