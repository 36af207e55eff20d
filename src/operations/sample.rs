use crate::config::SamplingParams;
use crate::error::{GeometryError, OperationError, Result};
use crate::math::polygon_2d::left_normal;
use crate::math::{plan, Point2, Vector2, TOLERANCE};
use crate::network::{CenterSide, EndpointId, RoadNetwork, RoadType};

use super::scratch::{scratch_entry, EdgeSamples, ScratchMap};

/// Samples the road edges of an endpoint across its resolved window.
///
/// Edges are offset along the plan-view left normal of the centerline. Roads
/// with a middle turn lane widen both edges by half a lane; dual-turn roads
/// additionally get outer-turn edges that bulge one lane outward on the
/// approach side of each direction.
#[derive(Debug)]
pub struct SampleEdges {
    endpoint: EndpointId,
    road_type: RoadType,
    sampling: SamplingParams,
}

impl SampleEdges {
    /// Creates a new edge sampling for `endpoint`.
    #[must_use]
    pub fn new(endpoint: EndpointId, road_type: RoadType, sampling: SamplingParams) -> Self {
        Self {
            endpoint,
            road_type,
            sampling,
        }
    }

    /// Executes the sampling and returns the number of samples per edge.
    ///
    /// Does nothing if the endpoint has already been sampled.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint has no resolved window, the profile
    /// cannot carry the requested turn lanes, or the curve evaluates to a
    /// zero-length tangent.
    pub fn execute(&self, network: &RoadNetwork, scratch: &mut ScratchMap) -> Result<usize> {
        let entry = scratch.get(self.endpoint);
        if let Some(samples) = entry.and_then(|s| s.samples.as_ref()) {
            return Ok(samples.params.len());
        }
        let window = entry
            .and_then(|s| s.window)
            .ok_or(OperationError::MissingStage {
                stage: "edge sampling",
                requirement: "a resolved window",
            })?;

        let endpoint = network.endpoint(self.endpoint)?;
        let curve = network.curve(endpoint.curve)?;
        let layout = curve.profile.layout(self.road_type)?;
        let length = curve.centerline.distance();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("curve {} has zero length", curve.name)).into());
        }

        let params = sample_params(window.start, window.end, self.sampling.sample_spacing / length);
        let half = layout.base_half();
        let mut samples = EdgeSamples {
            params: Vec::with_capacity(params.len()),
            right: Vec::with_capacity(params.len()),
            left: Vec::with_capacity(params.len()),
            outer_right: Vec::new(),
            outer_left: Vec::new(),
        };

        for &t in &params {
            let sample = curve.centerline.evaluate(t)?;
            let normal = left_normal(&Vector2::new(sample.tangent.x, sample.tangent.y));
            if normal.norm_squared() < TOLERANCE {
                return Err(GeometryError::ZeroVector.into());
            }
            let origin = plan(&sample.position);
            let at = |offset: f64| -> Point2 { origin + normal * offset };

            samples.right.push(at(-half));
            samples.left.push(at(half));
            if layout.is_dual() {
                let side = CenterSide::of(t, endpoint.t);
                samples.outer_right.push(at(layout.outer_right_offset(side)));
                samples.outer_left.push(at(layout.outer_left_offset(side)));
            }
        }
        samples.params = params;

        let count = samples.params.len();
        scratch_entry(scratch, self.endpoint).samples = Some(samples);
        Ok(count)
    }
}

/// Parameters from `start` to `end` inclusive, `step` apart, the last one clamped to `end`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub(crate) fn sample_params(start: f64, end: f64, step: f64) -> Vec<f64> {
    let span = end - start;
    if span <= 0.0 || step <= 0.0 {
        return vec![start];
    }
    let n = (span / step).ceil() as usize + 1;
    (0..n).map(|i| (start + i as f64 * step).min(end)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::IntersectionConfig;
    use crate::operations::test_support::crossing;
    use crate::operations::ResolveWindow;
    use approx::assert_relative_eq;

    #[test]
    fn params_cover_window_inclusive() {
        let params = sample_params(0.2, 0.5, 0.07);
        assert_eq!(params.len(), 6);
        assert_relative_eq!(params[0], 0.2);
        assert_relative_eq!(*params.last().unwrap(), 0.5);
        assert!(params.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_window_yields_single_sample() {
        assert_eq!(sample_params(0.0, 0.0, 0.1), vec![0.0]);
    }

    #[test]
    fn sampling_requires_window() {
        let c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let mut scratch = ScratchMap::new();
        let sampling = IntersectionConfig::default().sampling();
        assert!(SampleEdges::new(c.a, RoadType::NoTurnLane, sampling)
            .execute(&c.network, &mut scratch)
            .is_err());
    }

    #[test]
    fn edges_sit_half_a_width_from_centerline() {
        let c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let mut scratch = ScratchMap::new();
        let sampling = IntersectionConfig::default().sampling();
        ResolveWindow::new(c.a, sampling).execute(&c.network, &mut scratch).unwrap();
        let n = SampleEdges::new(c.a, RoadType::NoTurnLane, sampling)
            .execute(&c.network, &mut scratch)
            .unwrap();
        let samples = scratch[c.a].samples.as_ref().unwrap();
        assert_eq!(samples.right.len(), n);
        assert_eq!(samples.left.len(), n);
        assert!(samples.outer_right.is_empty());
        // Road A runs along +x, so its right edge is at y = -4.
        for (r, l) in samples.right.iter().zip(&samples.left) {
            assert_relative_eq!(r.y, -4.0, epsilon = 1e-9);
            assert_relative_eq!(l.y, 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn dual_turn_outer_edges_bulge_on_approach() {
        let c = crossing(8.0, 2, RoadType::DualTurnLane, 90.0);
        let mut scratch = ScratchMap::new();
        let sampling = IntersectionConfig::default().sampling();
        ResolveWindow::new(c.a, sampling).execute(&c.network, &mut scratch).unwrap();
        SampleEdges::new(c.a, RoadType::DualTurnLane, sampling)
            .execute(&c.network, &mut scratch)
            .unwrap();
        let samples = scratch[c.a].samples.as_ref().unwrap();
        let n = samples.params.len();
        assert_eq!(samples.outer_right.len(), n);
        assert_eq!(samples.outer_left.len(), n);
        // Base half-width is 4 + 2 = 6; the bulge adds a 4-wide lane.
        assert_relative_eq!(samples.right[0].y, -6.0, epsilon = 1e-9);
        assert_relative_eq!(samples.outer_right[0].y, -10.0, epsilon = 1e-9);
        assert_relative_eq!(samples.outer_left[0].y, 6.0, epsilon = 1e-9);
        assert_relative_eq!(samples.outer_right[n - 1].y, -6.0, epsilon = 1e-9);
        assert_relative_eq!(samples.outer_left[n - 1].y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn resampling_is_a_no_op() {
        let c = crossing(8.0, 2, RoadType::NoTurnLane, 90.0);
        let mut scratch = ScratchMap::new();
        let sampling = IntersectionConfig::default().sampling();
        ResolveWindow::new(c.a, sampling).execute(&c.network, &mut scratch).unwrap();
        let op = SampleEdges::new(c.a, RoadType::NoTurnLane, sampling);
        let first = op.execute(&c.network, &mut scratch).unwrap();
        let before = scratch[c.a].samples.clone();
        let second = op.execute(&c.network, &mut scratch).unwrap();
        assert_eq!(first, second);
        assert_eq!(before, scratch[c.a].samples);
    }
}
