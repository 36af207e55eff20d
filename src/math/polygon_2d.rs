use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon in the plan (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the left-pointing normal of a plan direction, normalized.
///
/// Zero-length input yields a zero vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    let n = Vector2::new(-dir.y, dir.x);
    n.try_normalize(TOLERANCE).unwrap_or_else(Vector2::zeros)
}

/// Checks that a closed quadrilateral does not self-intersect.
///
/// Only the two pairs of opposite edges can cross in a quad.
#[must_use]
pub fn is_simple_quad(quad: &[Point2; 4]) -> bool {
    let crosses = |a: usize, b: usize| {
        segment_segment_intersect_2d(&quad[a], &quad[(a + 1) % 4], &quad[b], &quad[(b + 1) % 4])
            .is_some()
    };
    !crosses(0, 2) && !crosses(1, 3) && signed_area_2d(quad).abs() > TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_of_ccw_square() {
        let sq = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!((signed_area_2d(&sq) - 4.0).abs() < TOLERANCE);
        assert!(is_simple_quad(&sq));
    }

    #[test]
    fn bow_tie_is_not_simple() {
        let bow = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(!is_simple_quad(&bow));
    }

    #[test]
    fn left_normal_of_x_axis_is_y() {
        let n = left_normal(&Vector2::new(3.0, 0.0));
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
