use geo::Coord;

/// Euclidean distance between two planar locations.
///
/// `hypot` is insensitive to the sign and order of the deltas, so pairs that
/// are algebraically the same distance apart compare exactly equal.
#[inline]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> { Coord { x, y } }

    #[test]
    fn three_four_five() {
        assert_eq!(distance(c(0.0, 0.0), c(3.0, 4.0)), 5.0);
    }

    #[test]
    fn symmetric_and_zero_on_self() {
        let (a, b) = (c(-2.5, 7.0), c(11.0, -3.25));
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn axis_aligned_ties_are_exact() {
        let origin = c(0.0, 0.0);
        assert_eq!(distance(origin, c(10.0, 0.0)), distance(origin, c(0.0, 10.0)));
        assert_eq!(distance(origin, c(-10.0, 0.0)), distance(origin, c(0.0, -10.0)));
        assert_eq!(distance(c(1.0, 1.0), c(4.0, 5.0)), distance(c(1.0, 1.0), c(5.0, 4.0)));
    }
}
