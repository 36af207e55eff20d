use tracing::{debug, warn};

use crate::config::{CornerStrategy, IntersectionConfig, LegacyThresholds};
use crate::error::{OperationError, Result};
use crate::math::distance_2d::{closest_pair, ClosestPair};
use crate::math::intersect_2d::{extended_polyline_intersection, polyline_first_intersection};
use crate::math::polygon_2d::is_simple_quad;
use crate::math::{lift, plan, Point2, Point3};
use crate::network::{CornerSlot, Corners, IntersectionId, RoadNetwork};

use super::scratch::{samples_of, EdgeSamples, Readiness, ScratchMap};

/// The four corners of an intersection and the junction center.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerSolution {
    pub corners: Corners,
    /// Road A's endpoint position at the mean endpoint height.
    pub center: Point3,
    /// Slots whose edges never crossed, even extended, and fell back to the nearest samples.
    pub missing: Vec<CornerSlot>,
}

/// Locates the four corners where the road edges of an intersection meet.
///
/// Each slot pairs one of A's edges with one of B's edges, B's sides taken
/// in A's frame (so B's lists swap when the intersection is flipped).
/// Dual-turn roads use their outer-turn edges.
///
/// An edge that stops short of the other road, such as the stem of a
/// T-junction starting on the main road's centerline, is extended straight
/// on by up to the two road widths combined.
#[derive(Debug)]
pub struct SolveCorners {
    intersection: IntersectionId,
    strategy: CornerStrategy,
    thresholds: LegacyThresholds,
}

impl SolveCorners {
    /// Creates a new corner solve using the strategy selected in `config`.
    #[must_use]
    pub fn new(intersection: IntersectionId, config: &IntersectionConfig) -> Self {
        Self {
            intersection,
            strategy: config.strategy,
            thresholds: config.legacy_thresholds,
        }
    }

    /// Executes the solve. Reads the intersection's `flipped` flag, so the
    /// orientation must be resolved first.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is unknown, a curve fails to evaluate, or an
    /// edge has no samples at all.
    pub fn execute(&self, network: &RoadNetwork, scratch: &ScratchMap) -> Result<Readiness<CornerSolution>> {
        let data = network.intersection(self.intersection)?;
        let (Readiness::Ready(a), Readiness::Ready(b)) =
            (samples_of(scratch, data.first), samples_of(scratch, data.second))
        else {
            return Ok(Readiness::NotYetReady);
        };

        let first = network.sample_curve(data.first, network.endpoint(data.first)?.t)?;
        let second = network.sample_curve(data.second, network.endpoint(data.second)?.t)?;
        let height = (first.position.z + second.position.z) * 0.5;
        let center = Point3::new(first.position.x, first.position.y, height);

        let (near, far) = b_edges(b, data.flipped);
        let reach = span(a) + span(b);
        let mut missing = Vec::new();
        let mut solve = |slot: CornerSlot| -> Result<Point3> {
            let a_edge = if slot.a_right() { a.corner_right() } else { a.corner_left() };
            let b_edge = if slot.b_right() { near } else { far };
            let point = match self.strategy {
                CornerStrategy::Current => {
                    if let Some(hit) = polyline_first_intersection(a_edge, b_edge) {
                        hit.point
                    } else if let Some(point) = extended_polyline_intersection(a_edge, b_edge, reach) {
                        debug!(intersection = %data.name, %slot, "edges meet once extended");
                        point
                    } else {
                        warn!(intersection = %data.name, %slot, "edges never cross; using nearest samples");
                        missing.push(slot);
                        nearest(a_edge, b_edge)?.midpoint(a_edge, b_edge)
                    }
                }
                CornerStrategy::Legacy => legacy_pair(a_edge, b_edge, &self.thresholds)
                    .ok_or_else(empty_edge)?
                    .midpoint(a_edge, b_edge),
            };
            Ok(lift(&point, height))
        };

        let corners = Corners {
            rr: solve(CornerSlot::RR)?,
            rl: solve(CornerSlot::RL)?,
            lr: solve(CornerSlot::LR)?,
            ll: solve(CornerSlot::LL)?,
        };
        if !is_simple_quad(&corners.ring().map(|p| plan(&p))) {
            warn!(intersection = %data.name, "corner ring self-intersects");
        }
        Ok(Readiness::Ready(CornerSolution {
            corners,
            center,
            missing,
        }))
    }
}

/// B's near and far corner edges in A's frame.
fn b_edges(b: &EdgeSamples, flipped: bool) -> (&[Point2], &[Point2]) {
    if flipped {
        (b.corner_left(), b.corner_right())
    } else {
        (b.corner_right(), b.corner_left())
    }
}

/// Plan width across the first sample of an endpoint's corner edges.
fn span(samples: &EdgeSamples) -> f64 {
    samples
        .corner_right()
        .first()
        .zip(samples.corner_left().first())
        .map_or(0.0, |(r, l)| nalgebra::distance(r, l))
}

fn nearest(a: &[Point2], b: &[Point2]) -> Result<ClosestPair> {
    closest_pair(a, b).ok_or_else(empty_edge)
}

fn empty_edge() -> crate::error::CrosswayError {
    OperationError::Failed("corner search on an edge without samples".to_owned()).into()
}

/// Closest sample pair with early cut-offs, scanning A's samples in order.
///
/// A row closer than `settle` ends the scan at once. After any row has come
/// within `close`, a row farther than `diverge` ends it as well.
fn legacy_pair(a: &[Point2], b: &[Point2], thresholds: &LegacyThresholds) -> Option<ClosestPair> {
    let mut best: Option<ClosestPair> = None;
    let mut came_close = false;
    for (i, pa) in a.iter().enumerate() {
        let Some((j, distance)) = b
            .iter()
            .map(|pb| nalgebra::distance(pa, pb))
            .enumerate()
            .min_by(|x, y| x.1.total_cmp(&y.1))
        else {
            return None;
        };
        if best.is_none_or(|c| distance < c.distance) {
            best = Some(ClosestPair {
                first: i,
                second: j,
                distance,
            });
        }
        if distance < thresholds.settle {
            break;
        }
        if distance <= thresholds.close {
            came_close = true;
        } else if came_close && distance > thresholds.diverge {
            break;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::network::RoadType;
    use crate::operations::test_support::{crossing, Crossing};
    use crate::operations::{ResolveOrientation, ResolveWindow, SampleEdges};
    use approx::assert_relative_eq;

    fn solve(c: &mut Crossing, road_type: RoadType, config: &IntersectionConfig) -> CornerSolution {
        let mut scratch = ScratchMap::new();
        for e in [c.a, c.b] {
            ResolveWindow::new(e, config.sampling()).execute(&c.network, &mut scratch).unwrap();
            SampleEdges::new(e, road_type, config.sampling())
                .execute(&c.network, &mut scratch)
                .unwrap();
        }
        let Readiness::Ready(o) = ResolveOrientation::new(c.id, config.match_tolerance())
            .execute(&c.network, &scratch)
            .unwrap()
        else {
            panic!("orientation not ready");
        };
        c.network.intersection_mut(c.id).unwrap().flipped = o.flipped;
        let Readiness::Ready(solution) = SolveCorners::new(c.id, config).execute(&c.network, &scratch).unwrap()
        else {
            panic!("corners not ready");
        };
        solution
    }

    #[test]
    fn basic_four_way() {
        let mut c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let s = solve(&mut c, RoadType::NoTurnLane, &IntersectionConfig::default());
        assert!(s.missing.is_empty());
        let ring = s.corners.ring();
        // Sides are 8 and diagonals 8 * sqrt(2).
        for i in 0..4 {
            for j in (i + 1)..4 {
                let d = nalgebra::distance(&ring[i], &ring[j]);
                assert!((7.2..=12.0).contains(&d), "corners {i}-{j} = {d}");
            }
        }
        assert_relative_eq!(s.corners.rr.x, -4.0, epsilon = 1e-9);
        assert_relative_eq!(s.corners.rr.y, -4.0, epsilon = 1e-9);
        assert_relative_eq!(s.corners.ll.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(s.corners.ll.y, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn symmetric_crossing_has_symmetric_corners() {
        for angle in [90.0, -90.0] {
            let mut c = crossing(8.0, 2, RoadType::NoTurnLane, angle);
            let s = solve(&mut c, RoadType::NoTurnLane, &IntersectionConfig::default());
            let k = s.corners;
            assert_relative_eq!((k.rr - s.center).norm(), (k.ll - s.center).norm(), epsilon = 1e-9);
            assert_relative_eq!(((k.rr.coords + k.ll.coords) * 0.5 - s.center.coords).norm(), 0.0, epsilon = 1e-9);
            assert_relative_eq!(((k.rl.coords + k.lr.coords) * 0.5 - s.center.coords).norm(), 0.0, epsilon = 1e-9);
            let quad = k.ring().map(|p| plan(&p));
            assert!(is_simple_quad(&quad));
        }
    }

    #[test]
    fn flip_keeps_corner_frame() {
        let mut from_right = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let mut from_left = crossing(8.0, 2, RoadType::NoTurnLane, -90.0);
        let a = solve(&mut from_right, RoadType::NoTurnLane, &IntersectionConfig::default());
        let b = solve(&mut from_left, RoadType::NoTurnLane, &IntersectionConfig::default());
        for slot in CornerSlot::ALL {
            assert_relative_eq!(
                (a.corners.get(slot) - b.corners.get(slot)).norm(),
                0.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn dual_turn_uses_outer_edges() {
        let mut c = crossing(8.0, 2, RoadType::DualTurnLane, 90.0);
        let s = solve(&mut c, RoadType::DualTurnLane, &IntersectionConfig::default());
        // Half-width 6, plus one 4-wide approach lane on the near-right corner.
        assert_relative_eq!(s.corners.rr.y, -10.0, epsilon = 1e-9);
        assert!(s.corners.rr.x.abs() >= 6.0 - 1e-9);
    }

    #[test]
    fn legacy_strategy_lands_near_crossing() {
        let config = IntersectionConfig::with_strategy(CornerStrategy::Legacy);
        let mut c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let s = solve(&mut c, RoadType::NoTurnLane, &config);
        assert!((plan(&s.corners.rr) - Point2::new(-4.0, -4.0)).norm() < 0.1);
        assert!((plan(&s.corners.ll) - Point2::new(4.0, 4.0)).norm() < 0.1);
    }

    #[test]
    fn non_crossing_edges_fall_back_to_nearest_pair() {
        let a = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let b = [Point2::new(3.0, 1.0), Point2::new(3.0, 2.0)];
        assert!(polyline_first_intersection(&a, &b).is_none());
        let pair = nearest(&a, &b).unwrap();
        assert_eq!((pair.first, pair.second), (1, 0));
    }

    #[test]
    fn legacy_pair_stops_after_divergence() {
        let thresholds = LegacyThresholds::default();
        let a = [
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.15),
            Point2::new(0.0, 0.9),
            Point2::new(0.0, 0.1),
        ];
        let b = [Point2::new(0.0, 0.0)];
        let pair = legacy_pair(&a, &b, &thresholds).unwrap();
        assert_eq!(pair.first, 1);
    }

    #[test]
    fn center_takes_mean_height() {
        let mut c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let s = solve(&mut c, RoadType::NoTurnLane, &IntersectionConfig::default());
        assert_relative_eq!(s.center.z, 0.0);
        assert_relative_eq!(s.corners.rr.z, s.center.z);
    }
}
