//! Error types for point ordering.

use thiserror::Error;

use crate::types::PointId;

/// Failures raised while validating a point set or ordering it.
///
/// All variants are raised before any traversal work starts. Cancellation is
/// not an error and is reported through [`crate::Outcome::Cancelled`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Fewer than two points were supplied.
    #[error("need at least 2 points to order, got {count}")]
    InsufficientPoints { count: usize },

    /// The starting id is not present in the point set.
    #[error("starting point {0} not found")]
    UnknownStartId(PointId),

    /// Two records carry the same id.
    #[error("point id {0} appears more than once")]
    DuplicateId(PointId),

    /// Two records share a location, so the nearest neighbor is ill-defined.
    #[error("points {first} and {second} share the same location; input must not have overlapping points")]
    DuplicateLocation { first: PointId, second: PointId },

    /// A coordinate is NaN or infinite.
    #[error("point {0} has a non-finite coordinate")]
    NonFiniteLocation(PointId),
}

/// Result type for point ordering.
pub type Result<T> = std::result::Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_ids() {
        let err = OrderError::DuplicateLocation { first: PointId(3), second: PointId(7) };
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('7'), "{msg}");

        assert_eq!(OrderError::UnknownStartId(PointId(42)).to_string(), "starting point 42 not found");
        assert_eq!(
            OrderError::InsufficientPoints { count: 1 }.to_string(),
            "need at least 2 points to order, got 1",
        );
    }
}
