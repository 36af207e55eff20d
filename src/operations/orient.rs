use tracing::debug;

use crate::error::Result;
use crate::math::distance_2d::closest_pair;
use crate::math::Point2;
use crate::network::{
    Classification, IntersectionId, IntersectionKind, RoadNetwork, RoadType, SpecialFlags, StopType,
    TurnLanes,
};

use super::scratch::{samples_of, Readiness, ScratchMap};

/// Missing arm in front of the center along road A.
const SIDE_A_FRONT: u8 = 3;
/// Missing arm past the center along road A.
const SIDE_A_BACK: u8 = 1;
/// Missing arm of road B on A's right.
const SIDE_RIGHT: u8 = 2;
/// Missing arm of road B on A's left.
const SIDE_LEFT: u8 = 0;

/// (ignored side, ignored corner) per special flag, unflipped then flipped.
const IGNORE_TABLE: [[(u8, u8); 2]; 4] = [
    [(SIDE_A_FRONT, 0), (SIDE_A_FRONT, 0)],
    [(SIDE_A_BACK, 3), (SIDE_A_BACK, 3)],
    [(SIDE_LEFT, 2), (SIDE_RIGHT, 1)],
    [(SIDE_RIGHT, 1), (SIDE_LEFT, 2)],
];

/// Relative orientation of the two roads of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// Whether B's left/right sense is reversed relative to A.
    pub flipped: bool,
    pub classification: Classification,
    pub turn_lanes: TurnLanes,
}

/// Decides the flip, the junction topology and the available turn lanes.
///
/// Needs the edge samples of both endpoints and reports
/// [`Readiness::NotYetReady`] while either is missing.
#[derive(Debug)]
pub struct ResolveOrientation {
    intersection: IntersectionId,
    tolerance: f64,
}

impl ResolveOrientation {
    /// Creates a new orientation resolution; `tolerance` is the edge match distance.
    #[must_use]
    pub fn new(intersection: IntersectionId, tolerance: f64) -> Self {
        Self {
            intersection,
            tolerance,
        }
    }

    /// Executes the resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection is not in the network.
    pub fn execute(&self, network: &RoadNetwork, scratch: &ScratchMap) -> Result<Readiness<Orientation>> {
        let data = network.intersection(self.intersection)?;
        let (Readiness::Ready(a), Readiness::Ready(b)) =
            (samples_of(scratch, data.first), samples_of(scratch, data.second))
        else {
            return Ok(Readiness::NotYetReady);
        };

        let flipped = detect_flip(&a.right, &b.right, &b.left, self.tolerance);
        let classification = classify(data.special, flipped, data.stop_type);
        let turn_lanes = turn_lanes(data.road_type, classification.ignore_side);
        Ok(Readiness::Ready(Orientation {
            flipped,
            classification,
            turn_lanes,
        }))
    }
}

/// Whether road A's right edge meets road B's left edge before its right edge.
///
/// A's right samples are scanned in order; the first one with a B sample
/// within `tolerance` decides, the right edge winning ties. When no sample
/// comes that close the overall nearest pair decides.
#[must_use]
pub fn detect_flip(a_right: &[Point2], b_right: &[Point2], b_left: &[Point2], tolerance: f64) -> bool {
    let nearest = |p: &Point2, list: &[Point2]| {
        list.iter()
            .map(|q| nalgebra::distance(p, q))
            .fold(f64::INFINITY, f64::min)
    };
    for p in a_right {
        let to_right = nearest(p, b_right);
        let to_left = nearest(p, b_left);
        if to_right.min(to_left) <= tolerance {
            return to_left < to_right;
        }
    }

    let right = closest_pair(a_right, b_right).map_or(f64::INFINITY, |c| c.distance);
    let left = closest_pair(a_right, b_left).map_or(f64::INFINITY, |c| c.distance);
    debug!(right, left, tolerance, "no edge match within tolerance; using nearest pair");
    left < right
}

/// Classifies the junction from its special flags.
///
/// The first set flag decides the missing arm. Its corner is only reported
/// when the junction has signs or signals to place.
#[must_use]
pub fn classify(special: SpecialFlags, flipped: bool, stop_type: StopType) -> Classification {
    let flags = [
        special.first_special_first,
        special.first_special_last,
        special.second_special_first,
        special.second_special_last,
    ];
    let Some(row) = flags.iter().position(|set| *set) else {
        return Classification::default();
    };
    let (side, corner) = IGNORE_TABLE[row][usize::from(flipped)];
    Classification {
        kind: IntersectionKind::ThreeWay,
        ignore_side: Some(side),
        ignore_corner: stop_type.has_corner_control().then_some(corner),
    }
}

/// Turn lanes of road A's approaches, minus the turns into a missing arm.
#[must_use]
pub fn turn_lanes(road_type: RoadType, ignore_side: Option<u8>) -> TurnLanes {
    let mut lanes = match road_type {
        RoadType::NoTurnLane => TurnLanes::default(),
        RoadType::SingleTurnLane => TurnLanes {
            front_left: true,
            back_left: true,
            ..TurnLanes::default()
        },
        RoadType::DualTurnLane => TurnLanes {
            front_left: true,
            front_right: true,
            back_left: true,
            back_right: true,
        },
    };
    match ignore_side {
        Some(SIDE_A_FRONT) => {
            lanes.front_left = false;
            lanes.front_right = false;
        }
        Some(SIDE_A_BACK) => {
            lanes.back_left = false;
            lanes.back_right = false;
        }
        Some(SIDE_RIGHT) => {
            lanes.front_right = false;
            lanes.back_left = false;
        }
        Some(SIDE_LEFT) => {
            lanes.front_left = false;
            lanes.back_right = false;
        }
        _ => {}
    }
    lanes
}
