use crate::config::IntersectionConfig;
use crate::error::{OperationError, Result};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::left_normal;
use crate::math::{lerp3, lift, plan, Point2, Point3, Vector2};
use crate::network::{
    CornerSlot, Corners, IntersectionId, IntersectionOutline, LaneBoundaries, RoadNetwork,
};

/// Derives the outline geometry of an intersection from its corners.
///
/// Produces the bounding radius, the lane-boundary subdivisions of the four
/// corner-to-corner edges, and the shoulder and ramp corners pushed outward
/// from each corner along both roads.
#[derive(Debug)]
pub struct BuildOutline {
    intersection: IntersectionId,
    shoulder_factor: f64,
    ramp_factor: f64,
    radius_factor: f64,
}

impl BuildOutline {
    /// Creates a new outline build.
    #[must_use]
    pub fn new(intersection: IntersectionId, config: &IntersectionConfig) -> Self {
        Self {
            intersection,
            shoulder_factor: config.shoulder_factor,
            ramp_factor: config.ramp_factor,
            radius_factor: config.radius_factor,
        }
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection has no corners yet, or an id or
    /// curve evaluation fails.
    pub fn execute(&self, network: &RoadNetwork) -> Result<IntersectionOutline> {
        let data = network.intersection(self.intersection)?;
        let corners = data.corners.ok_or(OperationError::MissingStage {
            stage: "outline",
            requirement: "solved corners",
        })?;
        let a_profile = network.curve(network.endpoint(data.first)?.curve)?.profile;
        let b_profile = network.curve(network.endpoint(data.second)?.curve)?.profile;

        let radius = self.radius_factor * farthest_edge_midpoint(&corners, &data.center);

        let turn = data.road_type.turn_lanes();
        let across_b = b_profile.lane_count() + 1 + turn;
        let across_a = a_profile.lane_count() + 1 + turn;
        let boundaries = LaneBoundaries {
            rr_rl: subdivide(&corners.rr, &corners.rl, across_b),
            lr_ll: subdivide(&corners.lr, &corners.ll, across_b),
            rr_lr: subdivide(&corners.rr, &corners.lr, across_a),
            rl_ll: subdivide(&corners.rl, &corners.ll, across_a),
        };

        let a_tangent = network.sample_curve(data.first, network.endpoint(data.first)?.t)?.tangent;
        let b_tangent = network.sample_curve(data.second, network.endpoint(data.second)?.t)?.tangent;
        let a_dir = Vector2::new(a_tangent.x, a_tangent.y);
        let mut b_dir = Vector2::new(b_tangent.x, b_tangent.y);
        if data.flipped {
            b_dir = -b_dir;
        }
        let frame = EdgeFrame {
            a_dir,
            a_normal: left_normal(&a_dir),
            b_dir,
            b_normal: left_normal(&b_dir),
        };

        let push = |factor: f64| -> Corners {
            let mut out = corners;
            for slot in CornerSlot::ALL {
                *out.get_mut(slot) = frame.push_out(
                    corners.get(slot),
                    slot,
                    a_profile.shoulder_width() * factor,
                    b_profile.shoulder_width() * factor,
                );
            }
            out
        };

        Ok(IntersectionOutline {
            shoulder: push(self.shoulder_factor),
            ramp: push(self.ramp_factor),
            boundaries,
            radius,
            radius_sq: radius * radius,
            corners_2d: [
                plan(&corners.rr),
                plan(&corners.rl),
                plan(&corners.lr),
                plan(&corners.ll),
            ],
        })
    }
}

/// Plan directions of both roads at the junction, B in A's frame.
struct EdgeFrame {
    a_dir: Vector2,
    a_normal: Vector2,
    b_dir: Vector2,
    b_normal: Vector2,
}

impl EdgeFrame {
    /// Moves `corner` outward by `a_offset` across road A and `b_offset` across road B.
    fn push_out(&self, corner: &Point3, slot: CornerSlot, a_offset: f64, b_offset: f64) -> Point3 {
        let a_shift = self.a_normal * if slot.a_right() { -a_offset } else { a_offset };
        let b_shift = self.b_normal * if slot.b_right() { -b_offset } else { b_offset };
        let base = plan(corner);
        let a_point = base + a_shift;
        let b_point = base + b_shift;
        let moved: Point2 = match line_line_intersect_2d(&a_point, &self.a_dir, &b_point, &self.b_dir) {
            Some((t, _)) => a_point + self.a_dir * t,
            None => base + a_shift + b_shift,
        };
        lift(&moved, corner.z)
    }
}

/// Largest distance from `center` to the midpoint of a corner-to-corner edge.
fn farthest_edge_midpoint(corners: &Corners, center: &Point3) -> f64 {
    let ring = corners.ring();
    (0..4)
        .map(|i| {
            let mid = nalgebra::center(&plan(&ring[i]), &plan(&ring[(i + 1) % 4]));
            nalgebra::distance(&mid, &plan(center))
        })
        .fold(0.0, f64::max)
}

/// `count` evenly spaced points from `from` to `to`, both included.
#[allow(clippy::cast_precision_loss)]
fn subdivide(from: &Point3, to: &Point3, count: usize) -> Vec<Point3> {
    if count < 2 {
        return vec![*from];
    }
    let last = (count - 1) as f64;
    (0..count).map(|i| lerp3(from, to, i as f64 / last)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::network::RoadType;
    use crate::operations::test_support::{crossing, Crossing};
    use approx::assert_relative_eq;

    fn square(road_type: RoadType) -> Crossing {
        let mut c = crossing(8.0, 2, road_type, 90.0);
        let data = c.network.intersection_mut(c.id).unwrap();
        data.flipped = true;
        data.corners = Some(Corners {
            rr: Point3::new(-4.0, -4.0, 0.0),
            rl: Point3::new(4.0, -4.0, 0.0),
            lr: Point3::new(-4.0, 4.0, 0.0),
            ll: Point3::new(4.0, 4.0, 0.0),
        });
        c
    }

    #[test]
    fn requires_corners() {
        let c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        assert!(BuildOutline::new(c.id, &IntersectionConfig::default())
            .execute(&c.network)
            .is_err());
    }

    #[test]
    fn radius_covers_edge_midpoints() {
        let c = square(RoadType::NoTurnLane);
        let outline = BuildOutline::new(c.id, &IntersectionConfig::default())
            .execute(&c.network)
            .unwrap();
        assert_relative_eq!(outline.radius, 5.0, epsilon = 1e-12);
        assert_relative_eq!(outline.radius_sq, 25.0, epsilon = 1e-12);
        assert_relative_eq!(outline.corners_2d[2].y, 4.0);
    }

    #[test]
    fn subdivisions_follow_turn_lanes() {
        for (road_type, n) in [
            (RoadType::NoTurnLane, 3),
            (RoadType::SingleTurnLane, 4),
            (RoadType::DualTurnLane, 5),
        ] {
            let c = square(road_type);
            let outline = BuildOutline::new(c.id, &IntersectionConfig::default())
                .execute(&c.network)
                .unwrap();
            let b = &outline.boundaries;
            for edge in [&b.rr_rl, &b.lr_ll, &b.rr_lr, &b.rl_ll] {
                assert_eq!(edge.len(), n);
            }
            assert_relative_eq!(b.rr_rl[0].x, -4.0);
            assert_relative_eq!(b.rr_rl[n - 1].x, 4.0);
        }
    }

    #[test]
    fn shoulder_and_ramp_sit_outside_corners() {
        let c = square(RoadType::NoTurnLane);
        let outline = BuildOutline::new(c.id, &IntersectionConfig::default())
            .execute(&c.network)
            .unwrap();
        // Default shoulder width 2: shoulder pushes 3.5, ramp 4.
        assert_relative_eq!(outline.shoulder.rr.x, -7.5, epsilon = 1e-9);
        assert_relative_eq!(outline.shoulder.rr.y, -7.5, epsilon = 1e-9);
        assert_relative_eq!(outline.ramp.ll.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(outline.ramp.ll.y, 8.0, epsilon = 1e-9);
        for slot in CornerSlot::ALL {
            let corner = plan(c.network.intersection(c.id).unwrap().corners.unwrap().get(slot)).coords.norm();
            let shoulder = plan(outline.shoulder.get(slot)).coords.norm();
            let ramp = plan(outline.ramp.get(slot)).coords.norm();
            assert!(corner < shoulder && shoulder < ramp, "{slot}");
        }
    }

    #[test]
    fn parallel_edges_sum_offsets() {
        let frame = EdgeFrame {
            a_dir: Vector2::new(1.0, 0.0),
            a_normal: Vector2::new(0.0, 1.0),
            b_dir: Vector2::new(1.0, 0.0),
            b_normal: Vector2::new(0.0, 1.0),
        };
        let moved = frame.push_out(&Point3::new(0.0, 0.0, 2.0), CornerSlot::LL, 1.0, 2.0);
        assert_relative_eq!(moved.y, 3.0);
        assert_relative_eq!(moved.z, 2.0);
    }
}
