use tracing::warn;

use crate::config::{IntersectionConfig, SamplingParams};
use crate::diagnostics::Diagnostic;
use crate::error::{GeometryError, OperationError, Result};
use crate::math::distance_2d::nearest_vertex_within;
use crate::math::polygon_2d::left_normal;
use crate::math::{plan, Point3, Vector2, Vector3, TOLERANCE};
use crate::network::{CenterSide, EndpointId, RoadNetwork};
use crate::strength::{blend_height, IntersectionStrength};

use super::sample::sample_params;
use super::scratch::{scratch_entry, LaneEdges, LaneHalves, ScratchMap};

/// Builds the per-lane vertex lists of one endpoint.
///
/// Every lane boundary is re-sampled across the endpoint window. Vertex
/// heights blend towards the pad height by the strength oracle, and vertices
/// fully on the pad drop below it. Each vertex lands in the front or back
/// half by the oracle's past-center flag. Left and right lists are then
/// reconciled to equal length and their ends snapped onto the ordinary road
/// mesh.
pub struct BuildLaneStrips<'a> {
    endpoint: EndpointId,
    sampling: SamplingParams,
    full_strength_threshold: f64,
    pad_drop: f64,
    reconcile_slack: usize,
    snap_radius: f64,
    strength: &'a dyn IntersectionStrength,
}

impl<'a> BuildLaneStrips<'a> {
    /// Creates a new lane strip build for `endpoint`.
    #[must_use]
    pub fn new(endpoint: EndpointId, config: &IntersectionConfig, strength: &'a dyn IntersectionStrength) -> Self {
        Self {
            endpoint,
            sampling: config.sampling(),
            full_strength_threshold: config.full_strength_threshold,
            pad_drop: config.pad_drop,
            reconcile_slack: config.reconcile_slack,
            snap_radius: config.snap_radius,
            strength,
        }
    }

    /// Executes the build, storing the lanes in the endpoint's scratch.
    ///
    /// Returns an [`Diagnostic::ExtremeAngle`] when a lane's left and right
    /// sample counts diverged beyond the configured slack. Does nothing if
    /// the lanes were already built.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint has no resolved window or is not part
    /// of an intersection, the curve is degenerate, or the strength oracle fails.
    pub fn execute(&self, network: &RoadNetwork, scratch: &mut ScratchMap) -> Result<Option<Diagnostic>> {
        let entry = scratch.get(self.endpoint);
        if entry.is_some_and(|s| s.lanes.is_some()) {
            return Ok(None);
        }
        let window = entry
            .and_then(|s| s.window)
            .ok_or(OperationError::MissingStage {
                stage: "lane strips",
                requirement: "a resolved window",
            })?;

        let endpoint = network.endpoint(self.endpoint)?;
        let intersection = network.intersection(network.intersection_of(self.endpoint)?)?;
        let curve = network.curve(endpoint.curve)?;
        let layout = curve.profile.layout(intersection.road_type)?;
        let length = curve.centerline.distance();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("curve {} has zero length", curve.name)).into());
        }

        let lane_total = layout.lane_total();
        let mut halves = LaneHalves::default();
        for lane in 0..lane_total {
            let edges = LaneEdges {
                middle: layout.middle_lane() == Some(lane),
                ..LaneEdges::default()
            };
            halves.front.insert(lane, edges.clone());
            halves.back.insert(lane, edges);
        }

        for t in sample_params(window.start, window.end, self.sampling.sample_spacing / length) {
            let sample = curve.centerline.evaluate(t)?;
            let normal = left_normal(&Vector2::new(sample.tangent.x, sample.tangent.y));
            if normal.norm_squared() < TOLERANCE {
                return Err(GeometryError::ZeroVector.into());
            }
            let normal = Vector3::new(normal.x, normal.y, 0.0);
            let side = CenterSide::of(t, endpoint.t);

            for k in 0..=lane_total {
                let mut point = sample.position + normal * layout.boundary_offset(k, side);
                let s = self.strength.strength(network, &point, t, self.endpoint)?;
                if s.owner.is_some_and(|owner| owner != self.endpoint) {
                    continue;
                }
                point.z = blend_height(s.strength, s.blend_height, point.z);
                if s.strength >= self.full_strength_threshold {
                    point.z -= self.pad_drop;
                }

                let half = if s.past_center { &mut halves.back } else { &mut halves.front };
                if let Some(lane) = half.get_mut(&k) {
                    lane.right.push(point);
                }
                if let Some(lane) = k.checked_sub(1).and_then(|l| half.get_mut(&l)) {
                    lane.left.push(point);
                }
            }
        }

        let mut extreme = false;
        let mut anchors = Vec::new();
        for lanes in [&mut halves.front, &mut halves.back] {
            for edges in lanes.values_mut() {
                if reconcile(&mut edges.left, &mut edges.right) > self.reconcile_slack {
                    extreme = true;
                }
                for list in [&mut edges.left, &mut edges.right] {
                    snap_ends(list, &curve.road_vertices, self.snap_radius, &mut anchors);
                }
            }
        }

        let slot = scratch_entry(scratch, self.endpoint);
        slot.lanes = Some(halves);
        slot.anchors.extend(anchors);

        if !extreme {
            return Ok(None);
        }
        let diagnostic = Diagnostic::ExtremeAngle {
            intersection: intersection.name.clone(),
            road: curve.name.clone(),
        };
        warn!(endpoint = %endpoint.name, "{diagnostic}");
        Ok(Some(diagnostic))
    }
}

/// Pads the shorter list with its last element until both lists match.
///
/// If the shorter list is empty nothing can pad it, so the longer one is
/// cleared instead. Returns the difference of the original lengths.
pub fn reconcile(left: &mut Vec<Point3>, right: &mut Vec<Point3>) -> usize {
    let difference = left.len().abs_diff(right.len());
    let (short, long) = if left.len() < right.len() {
        (left, right)
    } else {
        (right, left)
    };
    match short.last().copied() {
        Some(last) => short.resize(long.len(), last),
        None => long.clear(),
    }
    difference
}

/// Interleaves two equal-length lists into a degenerate quad strip: `L, L, R, R` per sample.
#[must_use]
pub fn interleave(left: &[Point3], right: &[Point3]) -> Vec<Point3> {
    left.iter()
        .zip(right)
        .flat_map(|(l, r)| [*l, *l, *r, *r])
        .collect()
}

/// Snaps the first and last vertex of `list` onto the nearest road vertex.
fn snap_ends(list: &mut [Point3], road_vertices: &[Point3], radius: f64, anchors: &mut Vec<Point3>) {
    if list.is_empty() || road_vertices.is_empty() {
        return;
    }
    let last = list.len() - 1;
    for i in std::iter::once(0).chain((last > 0).then_some(last)) {
        if let Some(vertex) = nearest_vertex_within(road_vertices, &plan(&list[i]), radius) {
            list[i] = vertex;
            anchors.push(vertex);
        }
    }
}
