use super::{Point2, Point3};

/// The closest pair of samples between two point lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPair {
    /// Index into the first list.
    pub first: usize,
    /// Index into the second list.
    pub second: usize,
    /// Plan distance between the two samples.
    pub distance: f64,
}

impl ClosestPair {
    /// Midpoint of the pair, given the lists it was computed from.
    #[must_use]
    pub fn midpoint(&self, a: &[Point2], b: &[Point2]) -> Point2 {
        nalgebra::center(&a[self.first], &b[self.second])
    }
}

/// Brute-force closest pair between two sample lists.
///
/// Returns `None` if either list is empty.
#[must_use]
pub fn closest_pair(a: &[Point2], b: &[Point2]) -> Option<ClosestPair> {
    let mut best: Option<ClosestPair> = None;
    for (i, pa) in a.iter().enumerate() {
        for (j, pb) in b.iter().enumerate() {
            let distance = nalgebra::distance(pa, pb);
            if best.is_none_or(|c| distance < c.distance) {
                best = Some(ClosestPair {
                    first: i,
                    second: j,
                    distance,
                });
            }
        }
    }
    best
}

/// Finds the vertex of `buffer` whose plan position is closest to `target`,
/// considering only vertices within `radius`.
#[must_use]
pub fn nearest_vertex_within(buffer: &[Point3], target: &Point2, radius: f64) -> Option<Point3> {
    let radius_sq = radius * radius;
    buffer
        .iter()
        .map(|v| (v, (Point2::new(v.x, v.y) - target).norm_squared()))
        .filter(|(_, d_sq)| *d_sq <= radius_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(v, _)| *v)
}
