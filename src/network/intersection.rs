use std::fmt;

use crate::math::{Point2, Point3};

use super::endpoint::EndpointId;
use super::output::IntersectionOutput;

slotmap::new_key_type! {
    /// Unique identifier for an intersection in the road network.
    pub struct IntersectionId;
}

/// Turn-lane configuration shared by both roads of an intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoadType {
    #[default]
    NoTurnLane,
    SingleTurnLane,
    DualTurnLane,
}

impl RoadType {
    /// Extra lanes this configuration adds to an edge subdivision.
    #[must_use]
    pub fn turn_lanes(self) -> usize {
        match self {
            Self::NoTurnLane => 0,
            Self::SingleTurnLane => 1,
            Self::DualTurnLane => 2,
        }
    }

    /// Whether the road carries a middle turn lane on its centerline.
    #[must_use]
    pub fn has_middle_lane(self) -> bool {
        self != Self::NoTurnLane
    }
}

/// Traffic control at the junction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopType {
    #[default]
    None,
    StopSignAllWay,
    TrafficLight1,
    TrafficLight2,
}

impl StopType {
    /// Whether signs or signals stand at the corners.
    #[must_use]
    pub fn has_corner_control(self) -> bool {
        self != Self::None
    }
}

/// Which curve ends terminate at this junction.
///
/// A curve that begins ("special first") or ends ("special last") here
/// contributes only one arm, turning the junction into a three-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SpecialFlags {
    pub first_special_first: bool,
    pub first_special_last: bool,
    pub second_special_first: bool,
    pub second_special_last: bool,
}

impl SpecialFlags {
    /// Whether any arm is missing.
    #[must_use]
    pub fn any(&self) -> bool {
        self.first_special_first
            || self.first_special_last
            || self.second_special_first
            || self.second_special_last
    }
}

/// Topology of the junction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntersectionKind {
    #[default]
    FourWay,
    ThreeWay,
}

/// Junction topology together with the missing arm and its corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub kind: IntersectionKind,
    /// Missing arm: 3 = A front, 1 = A back, 2 = arm on A's right, 0 = arm on A's left.
    pub ignore_side: Option<u8>,
    /// Corner (see [`CornerSlot::index`]) whose sign or signal is not needed.
    pub ignore_corner: Option<u8>,
}

/// Turn lanes available on road A's two approaches.
///
/// "Front" is the approach before the center along A, "back" the opposing
/// approach past it; left and right are the turn directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TurnLanes {
    pub front_left: bool,
    pub front_right: bool,
    pub back_left: bool,
    pub back_right: bool,
}

/// One of the four corners, named by (road A side, road B side).
///
/// Road B's side is taken in A's frame, so `RR` is always the near-right
/// corner met first along A's right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CornerSlot {
    RR,
    RL,
    LR,
    LL,
}

impl CornerSlot {
    /// All slots in index order.
    pub const ALL: [Self; 4] = [Self::RR, Self::RL, Self::LR, Self::LL];

    /// Numeric index used by [`Classification::ignore_corner`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::RR => 0,
            Self::RL => 1,
            Self::LR => 2,
            Self::LL => 3,
        }
    }

    /// Whether the corner lies on road A's right edge.
    #[must_use]
    pub fn a_right(self) -> bool {
        matches!(self, Self::RR | Self::RL)
    }

    /// Whether the corner lies on road B's right edge (in A's frame).
    #[must_use]
    pub fn b_right(self) -> bool {
        matches!(self, Self::RR | Self::LR)
    }
}

impl fmt::Display for CornerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RR => "RR",
            Self::RL => "RL",
            Self::LR => "LR",
            Self::LL => "LL",
        };
        f.write_str(name)
    }
}

/// The four corner points of an intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub rr: Point3,
    pub rl: Point3,
    pub lr: Point3,
    pub ll: Point3,
}

impl Corners {
    /// Returns the corner in `slot`.
    #[must_use]
    pub fn get(&self, slot: CornerSlot) -> &Point3 {
        match slot {
            CornerSlot::RR => &self.rr,
            CornerSlot::RL => &self.rl,
            CornerSlot::LR => &self.lr,
            CornerSlot::LL => &self.ll,
        }
    }

    /// Mutable access to the corner in `slot`.
    pub fn get_mut(&mut self, slot: CornerSlot) -> &mut Point3 {
        match slot {
            CornerSlot::RR => &mut self.rr,
            CornerSlot::RL => &mut self.rl,
            CornerSlot::LR => &mut self.lr,
            CornerSlot::LL => &mut self.ll,
        }
    }

    /// Corners in boundary order: RR, RL, LL, LR.
    #[must_use]
    pub fn ring(&self) -> [Point3; 4] {
        [self.rr, self.rl, self.ll, self.lr]
    }
}

/// Lane-boundary points along the four corner-to-corner edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneBoundaries {
    /// Along A's right edge, across road B.
    pub rr_rl: Vec<Point3>,
    /// Along A's left edge, across road B.
    pub lr_ll: Vec<Point3>,
    /// Along B's near edge, across road A.
    pub rr_lr: Vec<Point3>,
    /// Along B's far edge, across road A.
    pub rl_ll: Vec<Point3>,
}

/// Derived outline geometry of an intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOutline {
    pub shoulder: Corners,
    pub ramp: Corners,
    pub boundaries: LaneBoundaries,
    pub radius: f64,
    pub radius_sq: f64,
    /// Plan projections of RR, RL, LR, LL.
    pub corners_2d: [Point2; 4],
}

/// Data associated with an intersection of two curves.
#[derive(Debug, Clone)]
pub struct IntersectionData {
    /// Endpoint on road A.
    pub first: EndpointId,
    /// Endpoint on road B.
    pub second: EndpointId,
    /// Display name used in diagnostics.
    pub name: String,
    pub road_type: RoadType,
    pub stop_type: StopType,
    pub special: SpecialFlags,
    /// Whether B's left/right sense is reversed relative to A.
    pub flipped: bool,
    pub classification: Classification,
    pub turn_lanes: TurnLanes,
    /// Junction center on A's centerline, at the flattened pad height.
    pub center: Point3,
    pub corners: Option<Corners>,
    pub outline: Option<IntersectionOutline>,
    /// Guards the one-time orientation, corner and outline computation.
    pub geometry_done: bool,
    /// Strips and plates registered by the finalizer.
    pub output: IntersectionOutput,
}

impl IntersectionData {
    /// Creates an unsolved intersection between two endpoints.
    #[must_use]
    pub fn new(name: impl Into<String>, first: EndpointId, second: EndpointId) -> Self {
        Self {
            first,
            second,
            name: name.into(),
            road_type: RoadType::default(),
            stop_type: StopType::default(),
            special: SpecialFlags::default(),
            flipped: false,
            classification: Classification::default(),
            turn_lanes: TurnLanes::default(),
            center: Point3::origin(),
            corners: None,
            outline: None,
            geometry_done: false,
            output: IntersectionOutput::default(),
        }
    }

    /// Sets the turn-lane configuration.
    #[must_use]
    pub fn with_road_type(mut self, road_type: RoadType) -> Self {
        self.road_type = road_type;
        self
    }

    /// Sets the traffic control.
    #[must_use]
    pub fn with_stop_type(mut self, stop_type: StopType) -> Self {
        self.stop_type = stop_type;
        self
    }

    /// Sets the special end flags.
    #[must_use]
    pub fn with_special(mut self, special: SpecialFlags) -> Self {
        self.special = special;
        self
    }

    /// The endpoint paired with `endpoint`, if it belongs to this intersection.
    #[must_use]
    pub fn partner_of(&self, endpoint: EndpointId) -> Option<EndpointId> {
        if endpoint == self.first {
            Some(self.second)
        } else if endpoint == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    /// Whether every endpoint's strips have been registered.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.output.endpoints.len() == 2
    }
}
