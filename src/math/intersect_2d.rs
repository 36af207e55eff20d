use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let delta = p2 - p1;
    let t = delta.perp(d2) / cross;
    let u = delta.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel and collinear segments never intersect.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// A crossing between two polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineHit {
    /// Crossing point.
    pub point: Point2,
    /// Index of the segment in the primary polyline.
    pub primary_segment: usize,
    /// Index of the segment in the secondary polyline.
    pub secondary_segment: usize,
}

/// Finds the first crossing between two open polylines.
///
/// Segments of `primary` form the outer loop and segments of `secondary` the
/// inner loop, so the hit returned is the one closest to the start of
/// `primary`, ties broken by the start of `secondary`.
#[must_use]
pub fn polyline_first_intersection(primary: &[Point2], secondary: &[Point2]) -> Option<PolylineHit> {
    for (i, a) in primary.windows(2).enumerate() {
        for (j, b) in secondary.windows(2).enumerate() {
            if let Some((point, _, _)) = segment_segment_intersect_2d(&a[0], &a[1], &b[0], &b[1]) {
                return Some(PolylineHit {
                    point,
                    primary_segment: i,
                    secondary_segment: j,
                });
            }
        }
    }
    None
}

/// Finds where the ray `origin + t * dir`, `t >= 0`, first meets a polyline.
///
/// Returns the hit point and its ray parameter.
#[must_use]
pub fn ray_polyline_intersect_2d(origin: &Point2, dir: &Vector2, polyline: &[Point2]) -> Option<(Point2, f64)> {
    polyline
        .windows(2)
        .filter_map(|seg| {
            let (t, u) = line_line_intersect_2d(origin, dir, &seg[0], &(seg[1] - seg[0]))?;
            (t >= -TOLERANCE && (-TOLERANCE..=1.0 + TOLERANCE).contains(&u)).then(|| (origin + dir * t.max(0.0), t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Unit rays leaving both ends of an open polyline along its terminal segments.
fn end_rays(polyline: &[Point2]) -> Vec<(Point2, Vector2)> {
    let n = polyline.len();
    if n < 2 {
        return Vec::new();
    }
    [
        (polyline[0], polyline[0] - polyline[1]),
        (polyline[n - 1], polyline[n - 1] - polyline[n - 2]),
    ]
    .into_iter()
    .filter_map(|(origin, dir)| dir.try_normalize(TOLERANCE).map(|dir| (origin, dir)))
    .collect()
}

/// Crossing of two open polylines once their ends are extended straight on.
///
/// Either polyline, or both, may be extended along its terminal segments.
/// The crossing needing the least total extension wins, and crossings that
/// need more than `reach` are ignored.
#[must_use]
pub fn extended_polyline_intersection(primary: &[Point2], secondary: &[Point2], reach: f64) -> Option<Point2> {
    let mut best: Option<(Point2, f64)> = None;
    let mut consider = |point: Point2, extension: f64| {
        if extension <= reach && best.is_none_or(|(_, e)| extension < e) {
            best = Some((point, extension));
        }
    };

    let primary_rays = end_rays(primary);
    let secondary_rays = end_rays(secondary);
    for (origin, dir) in &secondary_rays {
        if let Some((point, t)) = ray_polyline_intersect_2d(origin, dir, primary) {
            consider(point, t);
        }
    }
    for (origin, dir) in &primary_rays {
        if let Some((point, t)) = ray_polyline_intersect_2d(origin, dir, secondary) {
            consider(point, t);
        }
    }
    for (p_origin, p_dir) in &primary_rays {
        for (s_origin, s_dir) in &secondary_rays {
            if let Some((t, u)) = line_line_intersect_2d(p_origin, p_dir, s_origin, s_dir) {
                if t >= 0.0 && u >= 0.0 {
                    consider(p_origin + p_dir * t, t + u);
                }
            }
        }
    }
    best.map(|(point, _)| point)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_line_perpendicular() {
        let p1 = Point2::new(0.0, 0.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(0.5, -1.0);
        let d2 = Vector2::new(0.0, 1.0);
        let (t, u) = line_line_intersect_2d(&p1, &d1, &p2, &d2).unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        let p1 = Point2::new(0.0, 0.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(0.0, 1.0);
        assert!(line_line_intersect_2d(&p1, &d1, &p2, &d1).is_none());
    }

    #[test]
    fn segment_segment_crossing() {
        let (pt, t, u) = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_touching_endpoint() {
        let hit = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(1.0, -1.0),
            &Point2::new(1.0, 1.0),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn segment_segment_no_crossing() {
        assert!(segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn polyline_hit_prefers_earliest_primary_segment() {
        // A zig-zag crossing the vertical secondary twice.
        let primary = [
            Point2::new(-2.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(-2.0, 1.0),
        ];
        let secondary = [Point2::new(0.0, -5.0), Point2::new(0.0, 5.0)];
        let hit = polyline_first_intersection(&primary, &secondary).unwrap();
        assert_eq!(hit.primary_segment, 0);
        assert!(hit.point.y.abs() < TOLERANCE);
    }

    #[test]
    fn polyline_no_hit() {
        let primary = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let secondary = [Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)];
        assert!(polyline_first_intersection(&primary, &secondary).is_none());
    }

    #[test]
    fn ray_hits_nearest_segment_ahead() {
        let polyline = [Point2::new(-5.0, 2.0), Point2::new(5.0, 2.0), Point2::new(5.0, 6.0), Point2::new(-5.0, 6.0)];
        let (point, t) =
            ray_polyline_intersect_2d(&Point2::new(0.0, 0.0), &Vector2::new(0.0, 1.0), &polyline).unwrap();
        assert!((point.y - 2.0).abs() < TOLERANCE);
        assert!((t - 2.0).abs() < TOLERANCE);
        assert!(ray_polyline_intersect_2d(&Point2::new(0.0, 0.0), &Vector2::new(0.0, -1.0), &polyline).is_none());
    }

    #[test]
    fn stem_extends_back_onto_main_edge() {
        // A stem starting on the main road's centerline, four short of its right edge.
        let main_right = [Point2::new(-40.0, -4.0), Point2::new(40.0, -4.0)];
        let stem = [Point2::new(-4.0, 0.0), Point2::new(-4.0, 4.0), Point2::new(-4.0, 8.0)];
        assert!(polyline_first_intersection(&main_right, &stem).is_none());
        let point = extended_polyline_intersection(&main_right, &stem, 16.0).unwrap();
        assert!((point - Point2::new(-4.0, -4.0)).norm() < TOLERANCE);
    }

    #[test]
    fn both_polylines_extend_when_neither_reaches() {
        let a = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
        let b = [Point2::new(5.0, 3.0), Point2::new(5.0, 1.0)];
        let point = extended_polyline_intersection(&a, &b, 10.0).unwrap();
        assert!((point - Point2::new(5.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn extension_beyond_reach_is_ignored() {
        let a = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
        let b = [Point2::new(50.0, 3.0), Point2::new(50.0, 1.0)];
        assert!(extended_polyline_intersection(&a, &b, 10.0).is_none());
        assert!(extended_polyline_intersection(&a, &b, 60.0).is_some());
    }
}
