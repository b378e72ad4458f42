//! Nearest-neighbor ordering of a point set.
//!
//! The pipeline runs strictly forward: a [`PointSet`] is walked by
//! [`build_chain`] (using [`distance`]) and the resulting chain is turned into
//! an [`OrderingResult`] by [`OrderingResult::from_chain`].

mod chain;
mod distance;
mod feedback;
mod rank;

pub use chain::build_chain;
pub use distance::distance;
pub use feedback::{CancelToken, Feedback, LogProgress, NoFeedback};
pub use rank::OrderingResult;

use crate::error::Result;
use crate::types::{PointId, PointSet};

/// Result of a computation that may be withdrawn by its caller.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool { matches!(self, Outcome::Cancelled) }

    /// The finished value, or `None` if cancelled.
    pub fn complete(self) -> Option<T> {
        match self {
            Outcome::Complete(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Complete(value) => Outcome::Complete(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

/// Rank every point of `points` by a greedy nearest-neighbor walk from `start`.
///
/// Fails with `InsufficientPoints` for fewer than two points and with
/// `UnknownStartId` when `start` is absent, both before any work is done.
/// A cancelled run yields `Outcome::Cancelled` and no ranks at all.
pub fn order_points(points: &PointSet, start: PointId, feedback: &mut dyn Feedback) -> Result<Outcome<OrderingResult>> {
    let outcome = build_chain(points, start, feedback)?;
    Ok(outcome.map(|chain| OrderingResult::from_chain(points, chain)))
}

/// Stateless router over a borrowed point set.
///
/// Holds no mutable state, so one router can serve several threads at once.
#[derive(Clone, Copy, Debug)]
pub struct NearestNeighborRouter<'a> {
    points: &'a PointSet,
}

impl<'a> NearestNeighborRouter<'a> {
    pub fn new(points: &'a PointSet) -> Self { Self { points } }

    pub fn points(&self) -> &'a PointSet { self.points }

    /// See [`order_points`].
    pub fn order(&self, start: PointId, feedback: &mut dyn Feedback) -> Result<Outcome<OrderingResult>> {
        order_points(self.points, start, feedback)
    }

    /// [`Self::order`] without progress reporting or cancellation.
    pub fn order_from(&self, start: PointId) -> Result<OrderingResult> {
        match self.order(start, &mut NoFeedback)? {
            Outcome::Complete(result) => Ok(result),
            Outcome::Cancelled => unreachable!("NoFeedback never cancels"),
        }
    }
}
