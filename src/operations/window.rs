use crate::config::SamplingParams;
use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;
use crate::network::{EndpointId, RoadNetwork, Window};

use super::scratch::{scratch_entry, ScratchMap};

/// Resolves the parameter window sampled around an endpoint.
///
/// The window reaches `window_factor` road widths to each side of the
/// endpoint and is clamped so that it
///
/// - stays inside `[0, 1]`,
/// - keeps one road width clear of a special start or end control node,
/// - does not cross into a neighboring endpoint's window on the same curve
///   (or past the parameter midpoint when the neighbor is unresolved),
/// - always contains the endpoint itself.
///
/// Once resolved, the window is cached in the endpoint's scratch and never recomputed.
#[derive(Debug)]
pub struct ResolveWindow {
    endpoint: EndpointId,
    sampling: SamplingParams,
}

impl ResolveWindow {
    /// Creates a new window resolution for `endpoint`.
    #[must_use]
    pub fn new(endpoint: EndpointId, sampling: SamplingParams) -> Self {
        Self { endpoint, sampling }
    }

    /// Executes the resolution, storing the window in `scratch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or its curve is unknown, or the curve
    /// has zero length.
    pub fn execute(&self, network: &RoadNetwork, scratch: &mut ScratchMap) -> Result<Window> {
        if let Some(window) = scratch.get(self.endpoint).and_then(|s| s.window) {
            return Ok(window);
        }

        let endpoint = network.endpoint(self.endpoint)?;
        let curve = network.curve(endpoint.curve)?;
        let length = curve.centerline.distance();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("curve {} has zero length", curve.name)).into());
        }

        let t = endpoint.t;
        let width = curve.profile.width() / length;
        let reach = self.sampling.window_factor * width;

        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        if curve.centerline.is_special_start() {
            lo = lo.max(width);
        }
        if curve.centerline.is_special_end() {
            hi = hi.min(1.0 - width);
        }

        for neighbor in network.neighbors_on_curve(self.endpoint)? {
            let other = network.endpoint(neighbor)?;
            let resolved = scratch
                .get(neighbor)
                .and_then(|s| s.window)
                .or(other.window);
            let midpoint = (other.t + t) * 0.5;
            if other.t < t {
                lo = lo.max(resolved.map_or(midpoint, |w| w.end));
            } else if other.t > t {
                hi = hi.min(resolved.map_or(midpoint, |w| w.start));
            }
        }

        let window = Window {
            start: (t - reach).max(lo).min(t),
            end: (t + reach).min(hi).max(t),
        };
        scratch_entry(scratch, self.endpoint).window = Some(window);
        Ok(window)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::IntersectionConfig;
    use crate::geometry::StraightCenterline;
    use crate::math::Point3;
    use crate::network::{CurveData, RoadProfile};

    fn sampling() -> SamplingParams {
        IntersectionConfig::default().sampling()
    }

    fn road(network: &mut RoadNetwork, special_start: bool, special_end: bool) -> crate::network::CurveId {
        let line = StraightCenterline::new(Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0))
            .unwrap()
            .with_special_nodes(special_start, special_end);
        network.add_curve(CurveData::new("r", Box::new(line), RoadProfile::new(8.0, 2).unwrap()))
    }

    #[test]
    fn window_contains_endpoint_everywhere() {
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            for (s, e) in [(false, false), (true, false), (false, true), (true, true)] {
                let mut network = RoadNetwork::new();
                let curve = road(&mut network, s, e);
                let ep = network.add_endpoint(curve, t, "e").unwrap();
                let mut scratch = ScratchMap::new();
                let w = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
                assert!(0.0 <= w.start && w.start <= t && t <= w.end && w.end <= 1.0, "t={t} w={w:?}");
            }
        }
    }

    #[test]
    fn window_reach_scales_with_width() {
        let mut network = RoadNetwork::new();
        let curve = road(&mut network, false, false);
        let ep = network.add_endpoint(curve, 0.5, "e").unwrap();
        let mut scratch = ScratchMap::new();
        let w = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
        // 5.5 widths of 8 on a 100-long curve.
        assert!((w.start - 0.06).abs() < 1e-12);
        assert!((w.end - 0.94).abs() < 1e-12);
    }

    #[test]
    fn special_start_reserves_one_width() {
        let mut network = RoadNetwork::new();
        let curve = road(&mut network, true, false);
        let ep = network.add_endpoint(curve, 0.2, "e").unwrap();
        let mut scratch = ScratchMap::new();
        let w = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
        assert!((w.start - 0.08).abs() < 1e-12);
    }

    #[test]
    fn unresolved_neighbor_clamps_at_midpoint() {
        let mut network = RoadNetwork::new();
        let curve = road(&mut network, false, false);
        let ep = network.add_endpoint(curve, 0.3, "e").unwrap();
        network.add_endpoint(curve, 0.5, "n").unwrap();
        let mut scratch = ScratchMap::new();
        let w = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
        assert!((w.end - 0.4).abs() < 1e-12);
    }

    #[test]
    fn resolved_neighbor_window_is_respected() {
        let mut network = RoadNetwork::new();
        let curve = road(&mut network, false, false);
        let first = network.add_endpoint(curve, 0.3, "first").unwrap();
        let second = network.add_endpoint(curve, 0.6, "second").unwrap();
        let mut scratch = ScratchMap::new();
        let w1 = ResolveWindow::new(first, sampling()).execute(&network, &mut scratch).unwrap();
        let w2 = ResolveWindow::new(second, sampling()).execute(&network, &mut scratch).unwrap();
        assert!((w1.end - 0.45).abs() < 1e-12);
        assert!((w2.start - w1.end).abs() < 1e-12);
    }

    #[test]
    fn resolution_is_cached() {
        let mut network = RoadNetwork::new();
        let curve = road(&mut network, false, false);
        let ep = network.add_endpoint(curve, 0.5, "e").unwrap();
        let mut scratch = ScratchMap::new();
        let first = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
        network.endpoint_mut(ep).unwrap().t = 0.1;
        let second = ResolveWindow::new(ep, sampling()).execute(&network, &mut scratch).unwrap();
        assert_eq!(first, second);
    }
}
