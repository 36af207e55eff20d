use crate::error::Result;
use crate::math::{plan, Point3, Vector2};
use crate::network::{EndpointId, IntersectionId, RoadNetwork};

/// How deep a point lies inside a flattened intersection pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthSample {
    /// Blend factor in `[0, 1]`; 1 means fully on the pad.
    pub strength: f64,
    /// Height of the pad the point blends towards.
    pub blend_height: f64,
    /// Intersection whose pad dominates at this point.
    pub intersection: Option<IntersectionId>,
    /// Whether the point lies past the queried endpoint's center.
    pub past_center: bool,
    /// Endpoint of the dominating intersection on the queried curve.
    pub owner: Option<EndpointId>,
}

/// Strength oracle consulted by the lane strip builder.
pub trait IntersectionStrength {
    /// Evaluates the strength at `position`, sampled at parameter `t` on `endpoint`'s curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or its intersection cannot be found.
    fn strength(
        &self,
        network: &RoadNetwork,
        position: &Point3,
        t: f64,
        endpoint: EndpointId,
    ) -> Result<StrengthSample>;
}

/// Blends a road height towards the pad height.
///
/// The extremes are exact: strength 0 returns `road` and strength 1 returns `pad`.
#[must_use]
pub fn blend_height(strength: f64, pad: f64, road: f64) -> f64 {
    if strength <= 0.0 {
        road
    } else if strength >= 1.0 {
        pad
    } else {
        strength * pad + (1.0 - strength) * road
    }
}

/// Smoothstep falloff around each intersection center, scaled by its bounding radius.
///
/// Strength is 1 within `inner_fraction × radius` and fades to 0 at the radius.
/// Where pads overlap the strongest one wins.
#[derive(Debug, Clone, Copy)]
pub struct RadialFalloff {
    inner_fraction: f64,
}

impl RadialFalloff {
    /// Creates a falloff with the given inner plateau fraction, clamped to `[0, 1)`.
    #[must_use]
    pub fn new(inner_fraction: f64) -> Self {
        Self {
            inner_fraction: inner_fraction.clamp(0.0, 0.999),
        }
    }

    fn falloff(&self, distance: f64, radius: f64) -> f64 {
        let inner = radius * self.inner_fraction;
        if distance <= inner {
            1.0
        } else if distance >= radius {
            0.0
        } else {
            let x = (radius - distance) / (radius - inner);
            x * x * (3.0 - 2.0 * x)
        }
    }
}

impl Default for RadialFalloff {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl IntersectionStrength for RadialFalloff {
    fn strength(
        &self,
        network: &RoadNetwork,
        position: &Point3,
        t: f64,
        endpoint: EndpointId,
    ) -> Result<StrengthSample> {
        let endpoint_data = network.endpoint(endpoint)?;
        let own_id = network.intersection_of(endpoint)?;
        let own = network.intersection(own_id)?;

        let tangent = network.sample_curve(endpoint, endpoint_data.t)?.tangent;
        let along = (plan(position) - plan(&own.center)).dot(&Vector2::new(tangent.x, tangent.y));
        let past_center = if along.abs() > crate::math::TOLERANCE {
            along > 0.0
        } else {
            t > endpoint_data.t
        };

        let mut best = (own_id, 0.0, own.center.z);
        for (id, data) in network.intersections() {
            let Some(outline) = &data.outline else {
                continue;
            };
            let distance = nalgebra::distance(&plan(position), &plan(&data.center));
            let s = self.falloff(distance, outline.radius);
            if s > best.1 {
                best = (id, s, data.center.z);
            }
        }

        let (id, strength, blend) = best;
        let owner = if id == own_id {
            Some(endpoint)
        } else {
            let other = network.intersection(id)?;
            [other.first, other.second].into_iter().find(|e| {
                network
                    .endpoint(*e)
                    .is_ok_and(|d| d.curve == endpoint_data.curve)
            })
        };

        Ok(StrengthSample {
            strength,
            blend_height: blend,
            intersection: Some(id),
            past_center,
            owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_extremes_are_exact() {
        let road = 3.217_f64;
        let pad = 10.5_f64;
        assert_eq!(blend_height(0.0, pad, road).to_bits(), road.to_bits());
        assert_eq!(blend_height(1.0, pad, road).to_bits(), pad.to_bits());
        assert!((blend_height(0.5, pad, road) - (pad + road) * 0.5).abs() < 1e-12);
    }

    #[test]
    fn falloff_plateau_and_edge() {
        let f = RadialFalloff::new(0.5);
        assert!((f.falloff(1.0, 10.0) - 1.0).abs() < f64::EPSILON);
        assert!(f.falloff(10.0, 10.0).abs() < f64::EPSILON);
        let mid = f.falloff(7.5, 10.0);
        assert!(mid > 0.0 && mid < 1.0);
    }
}
