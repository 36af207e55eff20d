use crate::error::{GeometryError, Result};
use crate::geometry::Centerline;
use crate::math::Point3;

use super::intersection::RoadType;

slotmap::new_key_type! {
    /// Unique identifier for a centerline curve in the road network.
    pub struct CurveId;
}

/// Cross-section of an ordinary road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadProfile {
    width: f64,
    lane_count: usize,
    shoulder_width: f64,
}

impl RoadProfile {
    /// Default shoulder width for new profiles.
    pub const DEFAULT_SHOULDER: f64 = 2.0;

    /// Creates a profile with the default shoulder width.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidProfile` if `width` is not positive or
    /// `lane_count` is zero.
    pub fn new(width: f64, lane_count: usize) -> Result<Self> {
        if width.is_nan() || width <= 0.0 {
            return Err(GeometryError::InvalidProfile(format!("road width {width} must be positive")).into());
        }
        if lane_count == 0 {
            return Err(GeometryError::InvalidProfile("a road needs at least one lane".to_owned()).into());
        }
        Ok(Self {
            width,
            lane_count,
            shoulder_width: Self::DEFAULT_SHOULDER,
        })
    }

    /// Replaces the shoulder width.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidProfile` if `shoulder_width` is negative.
    pub fn with_shoulder(mut self, shoulder_width: f64) -> Result<Self> {
        if shoulder_width.is_nan() || shoulder_width < 0.0 {
            return Err(GeometryError::InvalidProfile(format!(
                "shoulder width {shoulder_width} must not be negative"
            ))
            .into());
        }
        self.shoulder_width = shoulder_width;
        Ok(self)
    }

    /// Total width of the ordinary lanes.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Number of ordinary lanes, both directions.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Width of the shoulder outside the road edges.
    #[must_use]
    pub fn shoulder_width(&self) -> f64 {
        self.shoulder_width
    }

    /// Width of a single lane.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn lane_width(&self) -> f64 {
        self.width / self.lane_count as f64
    }

    /// Lane layout of this road when it enters an intersection of `road_type`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidProfile` if a turn-lane layout is
    /// requested for an odd lane count (the middle lane must sit on the centerline).
    pub fn layout(&self, road_type: RoadType) -> Result<LaneLayout> {
        let middle = road_type.has_middle_lane();
        if middle && self.lane_count % 2 != 0 {
            return Err(GeometryError::InvalidProfile(format!(
                "turn lanes need an even lane count, got {}",
                self.lane_count
            ))
            .into());
        }
        let lane_width = self.lane_width();
        let base_half = self.width * 0.5 + if middle { lane_width * 0.5 } else { 0.0 };
        Ok(LaneLayout {
            lane_width,
            base_half,
            lane_total: self.lane_count + usize::from(middle),
            middle_lane: middle.then_some(self.lane_count / 2),
            dual: road_type == RoadType::DualTurnLane,
        })
    }
}

/// Where a sample lies relative to the junction center along its curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterSide {
    Before,
    At,
    Past,
}

impl CenterSide {
    /// Classifies parameter `t` against the center parameter.
    #[must_use]
    pub fn of(t: f64, center: f64) -> Self {
        if t < center {
            Self::Before
        } else if t > center {
            Self::Past
        } else {
            Self::At
        }
    }
}

/// Lateral positions of the lane boundaries of a road at an intersection.
///
/// Offsets are signed along the left normal of the centerline: negative
/// values lie on the right. Lane 0 is the right road edge lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneLayout {
    lane_width: f64,
    base_half: f64,
    lane_total: usize,
    middle_lane: Option<usize>,
    dual: bool,
}

impl LaneLayout {
    /// Number of lanes including the middle turn lane.
    #[must_use]
    pub fn lane_total(&self) -> usize {
        self.lane_total
    }

    /// Index of the middle turn lane, if any.
    #[must_use]
    pub fn middle_lane(&self) -> Option<usize> {
        self.middle_lane
    }

    /// Half-width of the road surface without approach turn lanes.
    #[must_use]
    pub fn base_half(&self) -> f64 {
        self.base_half
    }

    /// Width of a single lane.
    #[must_use]
    pub fn lane_width(&self) -> f64 {
        self.lane_width
    }

    /// Whether approach turn lanes widen the outer edges.
    #[must_use]
    pub fn is_dual(&self) -> bool {
        self.dual
    }

    /// Offset of boundary `k` (`0..=lane_total`) for a sample on `side` of the center.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn boundary_offset(&self, k: usize, side: CenterSide) -> f64 {
        let mut offset = -self.base_half + k as f64 * self.lane_width;
        if self.dual {
            if k == 0 && side == CenterSide::Before {
                offset -= self.lane_width;
            } else if k == self.lane_total && side == CenterSide::Past {
                offset += self.lane_width;
            }
        }
        offset
    }

    /// Right outer-turn edge offset.
    #[must_use]
    pub fn outer_right_offset(&self, side: CenterSide) -> f64 {
        self.boundary_offset(0, side)
    }

    /// Left outer-turn edge offset.
    #[must_use]
    pub fn outer_left_offset(&self, side: CenterSide) -> f64 {
        self.boundary_offset(self.lane_total, side)
    }
}

/// Data associated with a centerline curve.
#[derive(Debug)]
pub struct CurveData {
    /// The centerline evaluator supplied by the host.
    pub centerline: Box<dyn Centerline>,
    /// Cross-section of the road along this curve.
    pub profile: RoadProfile,
    /// Display name used in diagnostics.
    pub name: String,
    /// Vertices of the ordinary road mesh, used to snap strip ends.
    pub road_vertices: Vec<Point3>,
}

impl CurveData {
    /// Creates curve data without road vertices.
    #[must_use]
    pub fn new(name: impl Into<String>, centerline: Box<dyn Centerline>, profile: RoadProfile) -> Self {
        Self {
            centerline,
            profile,
            name: name.into(),
            road_vertices: Vec::new(),
        }
    }

    /// Attaches the ordinary road vertex buffer.
    #[must_use]
    pub fn with_road_vertices(mut self, road_vertices: Vec<Point3>) -> Self {
        self.road_vertices = road_vertices;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_profiles() {
        assert!(RoadProfile::new(0.0, 2).is_err());
        assert!(RoadProfile::new(8.0, 0).is_err());
        assert!(RoadProfile::new(8.0, 2).unwrap().with_shoulder(-1.0).is_err());
    }

    #[test]
    fn no_turn_layout_spans_road_width() {
        let layout = RoadProfile::new(8.0, 2).unwrap().layout(RoadType::NoTurnLane).unwrap();
        assert_eq!(layout.lane_total(), 2);
        assert_eq!(layout.middle_lane(), None);
        assert!((layout.boundary_offset(0, CenterSide::At) + 4.0).abs() < 1e-12);
        assert!((layout.boundary_offset(1, CenterSide::At)).abs() < 1e-12);
        assert!((layout.boundary_offset(2, CenterSide::At) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn single_turn_layout_adds_centered_middle_lane() {
        let layout = RoadProfile::new(8.0, 2).unwrap().layout(RoadType::SingleTurnLane).unwrap();
        assert_eq!(layout.lane_total(), 3);
        assert_eq!(layout.middle_lane(), Some(1));
        assert!((layout.base_half() - 6.0).abs() < 1e-12);
        let lo = layout.boundary_offset(1, CenterSide::At);
        let hi = layout.boundary_offset(2, CenterSide::At);
        assert!((lo + hi).abs() < 1e-12);
    }

    #[test]
    fn dual_turn_layout_widens_approach_sides() {
        let layout = RoadProfile::new(8.0, 2).unwrap().layout(RoadType::DualTurnLane).unwrap();
        assert!((layout.outer_right_offset(CenterSide::Before) + 10.0).abs() < 1e-12);
        assert!((layout.outer_right_offset(CenterSide::Past) + 6.0).abs() < 1e-12);
        assert!((layout.outer_left_offset(CenterSide::Past) - 10.0).abs() < 1e-12);
        assert!((layout.outer_left_offset(CenterSide::Before) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn turn_layout_needs_even_lanes() {
        assert!(RoadProfile::new(9.0, 3).unwrap().layout(RoadType::SingleTurnLane).is_err());
        assert!(RoadProfile::new(9.0, 3).unwrap().layout(RoadType::NoTurnLane).is_ok());
    }
}
