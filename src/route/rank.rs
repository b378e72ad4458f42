use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Serialize, Serializer};

use crate::types::{PointId, PointSet};
use super::distance::distance;

/// Dense id → rank assignment produced from a finished chain.
///
/// Ranks are the 0-based positions in the chain, so they form a bijection
/// onto `0..len()` and the starting point always has rank 0.
#[derive(Clone, Debug)]
pub struct OrderingResult {
    chain: Vec<PointId>,
    ranks: AHashMap<PointId, usize>,
    tour_length: f64,
}

impl OrderingResult {
    /// Assign `rank(chain[i]) = i`.
    ///
    /// `chain` must list each id of `points` exactly once, as produced by
    /// [`super::build_chain`].
    pub fn from_chain(points: &PointSet, chain: Vec<PointId>) -> Self {
        let ranks = chain.iter().enumerate()
            .map(|(rank, &id)| (id, rank))
            .collect::<AHashMap<_, _>>();
        debug_assert_eq!(ranks.len(), chain.len(), "chain repeats an id");

        let tour_length = chain.windows(2)
            .filter_map(|pair| Some(distance(points.location(pair[0])?, points.location(pair[1])?)))
            .sum();

        Self { chain, ranks, tour_length }
    }

    /// Number of ranked points.
    pub fn len(&self) -> usize { self.chain.len() }

    pub fn is_empty(&self) -> bool { self.chain.is_empty() }

    /// Rank of `id`, or `None` if it was not part of the ordering.
    pub fn rank(&self, id: PointId) -> Option<usize> { self.ranks.get(&id).copied() }

    /// Ids in rank order; the first entry is the starting point.
    pub fn chain(&self) -> &[PointId] { &self.chain }

    /// The starting point (rank 0).
    pub fn start(&self) -> Option<PointId> { self.chain.first().copied() }

    /// Sum of the distances between consecutive points of the chain.
    pub fn tour_length(&self) -> f64 { self.tour_length }

    /// `(id, rank)` pairs in ascending id order.
    pub fn ranks_by_id(&self) -> BTreeMap<PointId, usize> {
        self.ranks.iter().map(|(&id, &rank)| (id, rank)).collect()
    }
}

/// The rank map and tour length are derived from the chain.
impl PartialEq for OrderingResult {
    fn eq(&self, other: &Self) -> bool { self.chain == other.chain }
}

/// Serialises as a JSON object keyed by id, ascending.
impl Serialize for OrderingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ranks_by_id().serialize(serializer)
    }
}
