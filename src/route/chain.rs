use crate::error::{OrderError, Result};
use crate::types::{PointId, PointSet};
use super::distance::distance;
use super::feedback::Feedback;
use super::Outcome;

/// Greedy nearest-unvisited-neighbor walk over `points`, starting at `start`.
///
/// Returns every id exactly once, `start` first. Each step scans all
/// unvisited points in ascending id order and keeps the first strict minimum,
/// so equidistant candidates resolve to the smallest id. O(N²) time, O(N)
/// extra space; no backtracking.
///
/// Progress is reported after every appended point and cancellation is
/// polled right after it. A cancelled walk drops its partial chain.
pub fn build_chain(points: &PointSet, start: PointId, feedback: &mut dyn Feedback) -> Result<Outcome<Vec<PointId>>> {
    let n = points.len();
    if n < 2 { return Err(OrderError::InsufficientPoints { count: n }) }
    let mut current = points.slot(start).ok_or(OrderError::UnknownStartId(start))?;

    let records = points.records();
    let mut visited = vec![false; n];
    let mut chain = Vec::with_capacity(n);

    visited[current] = true;
    chain.push(start);

    while chain.len() < n {
        let here = records[current].location;

        let mut best: Option<(usize, f64)> = None;
        for (slot, record) in records.iter().enumerate() {
            if visited[slot] { continue }
            let dist = distance(here, record.location);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((slot, dist));
            }
        }

        // Unvisited points remain while chain.len() < n.
        let Some((next, dist)) = best else { unreachable!("no unvisited point left") };
        tracing::debug!(from = %records[current].id, to = %records[next].id, dist, "step");

        visited[next] = true;
        chain.push(records[next].id);
        current = next;

        feedback.set_progress(chain.len() as f64 * 100.0 / n as f64);
        if feedback.is_cancelled() {
            tracing::info!(visited = chain.len(), total = n, "ordering cancelled");
            return Ok(Outcome::Cancelled)
        }
    }

    Ok(Outcome::Complete(chain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::feedback::NoFeedback;

    fn ids(raw: &[u64]) -> Vec<PointId> { raw.iter().copied().map(PointId).collect() }

    fn chain_of(points: &PointSet, start: u64) -> Vec<PointId> {
        build_chain(points, PointId(start), &mut NoFeedback).unwrap().complete().unwrap()
    }

    #[test]
    fn square_prefers_smaller_id_on_tie() {
        let square = PointSet::from_triples([
            (1, 0.0, 0.0), (2, 10.0, 0.0), (3, 10.0, 10.0), (4, 0.0, 10.0),
        ]).unwrap();
        assert_eq!(chain_of(&square, 1), ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn two_points() {
        let pair = PointSet::from_triples([(7, 0.0, 0.0), (3, 5.0, 5.0)]).unwrap();
        assert_eq!(chain_of(&pair, 7), ids(&[7, 3]));
        assert_eq!(chain_of(&pair, 3), ids(&[3, 7]));
    }

    #[test]
    fn greedy_does_not_backtrack() {
        // From 1 the nearest is 2, then 3 is nearer than 0, so 0 is reached last
        // even though it sits right next to the start.
        let line = PointSet::from_triples([
            (0, -1.5, 0.0), (1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0),
        ]).unwrap();
        assert_eq!(chain_of(&line, 1), ids(&[1, 2, 3, 0]));
    }

    #[test]
    fn insufficient_points() {
        let empty = PointSet::new([]).unwrap();
        assert_eq!(
            build_chain(&empty, PointId(0), &mut NoFeedback).unwrap_err(),
            OrderError::InsufficientPoints { count: 0 },
        );

        let single = PointSet::from_triples([(1, 0.0, 0.0)]).unwrap();
        assert_eq!(
            build_chain(&single, PointId(1), &mut NoFeedback).unwrap_err(),
            OrderError::InsufficientPoints { count: 1 },
        );
    }

    #[test]
    fn unknown_start() {
        let pair = PointSet::from_triples([(1, 0.0, 0.0), (2, 1.0, 0.0)]).unwrap();
        assert_eq!(
            build_chain(&pair, PointId(9), &mut NoFeedback).unwrap_err(),
            OrderError::UnknownStartId(PointId(9)),
        );
    }

    struct Recorder { progress: Vec<f64>, cancel_after: Option<usize> }

    impl Feedback for Recorder {
        fn set_progress(&mut self, percent: f64) { self.progress.push(percent) }

        fn is_cancelled(&self) -> bool {
            self.cancel_after.is_some_and(|k| self.progress.len() >= k)
        }
    }

    #[test]
    fn progress_rises_once_per_step_to_100() {
        let points = PointSet::from_triples((0..5).map(|i| (i, i as f64, 0.0))).unwrap();
        let mut recorder = Recorder { progress: Vec::new(), cancel_after: None };
        build_chain(&points, PointId(0), &mut recorder).unwrap();

        assert_eq!(recorder.progress, vec![40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let points = PointSet::from_triples((0..10).map(|i| (i, i as f64, 0.0))).unwrap();
        let mut recorder = Recorder { progress: Vec::new(), cancel_after: Some(3) };
        let outcome = build_chain(&points, PointId(0), &mut recorder).unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(recorder.progress.len(), 3);
    }
}
