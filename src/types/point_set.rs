use ahash::AHashMap;
use geo::Coord;

use crate::error::{OrderError, Result};
use super::PointId;

/// A single point feature: an id and its planar location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointRecord {
    pub id: PointId,
    pub location: Coord<f64>,
}

impl PointRecord {
    pub fn new(id: impl Into<PointId>, x: f64, y: f64) -> Self {
        Self { id: id.into(), location: Coord { x, y } }
    }
}

/// Immutable snapshot of the points to order.
///
/// Records are kept sorted by ascending id, so every scan over the set visits
/// candidates in tie-break order regardless of how the input was supplied.
/// Construction rejects duplicate ids, non-finite coordinates and coincident
/// locations.
#[derive(Clone, Debug)]
pub struct PointSet {
    records: Vec<PointRecord>,
    index: AHashMap<PointId, usize>,
}

impl PointSet {
    /// Validate and snapshot `records`.
    pub fn new(records: impl IntoIterator<Item = PointRecord>) -> Result<Self> {
        let mut records = records.into_iter().collect::<Vec<_>>();
        records.sort_by_key(|record| record.id);

        if let Some(pair) = records.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(OrderError::DuplicateId(pair[0].id))
        }

        // Keyed by bit pattern; adding 0.0 folds -0.0 into 0.0.
        let mut seen = AHashMap::with_capacity(records.len());
        for record in &records {
            let Coord { x, y } = record.location;
            if !x.is_finite() || !y.is_finite() { return Err(OrderError::NonFiniteLocation(record.id)) }

            if let Some(&first) = seen.get(&((x + 0.0).to_bits(), (y + 0.0).to_bits())) {
                return Err(OrderError::DuplicateLocation { first, second: record.id })
            }
            seen.insert(((x + 0.0).to_bits(), (y + 0.0).to_bits()), record.id);
        }

        let index = records.iter().enumerate()
            .map(|(slot, record)| (record.id, slot))
            .collect();

        Ok(Self { records, index })
    }

    /// Build a set from `(id, x, y)` triples.
    pub fn from_triples(triples: impl IntoIterator<Item = (u64, f64, f64)>) -> Result<Self> {
        Self::new(triples.into_iter().map(|(id, x, y)| PointRecord::new(id, x, y)))
    }

    /// Number of points.
    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn contains(&self, id: PointId) -> bool { self.index.contains_key(&id) }

    pub fn get(&self, id: PointId) -> Option<&PointRecord> {
        self.slot(id).map(|slot| &self.records[slot])
    }

    pub fn location(&self, id: PointId) -> Option<Coord<f64>> {
        self.get(id).map(|record| record.location)
    }

    /// Records in ascending id order.
    pub fn records(&self) -> &[PointRecord] { &self.records }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    /// Position of `id` within `records()`.
    pub(crate) fn slot(&self, id: PointId) -> Option<usize> {
        self.index.get(&id).copied()
    }
}
