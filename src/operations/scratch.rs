use std::collections::BTreeMap;

use slotmap::SecondaryMap;

use crate::math::{Point2, Point3};
use crate::network::{EndpointId, Window};

/// Result of asking for a partner endpoint's intermediate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness<T> {
    /// The partner has not reached the required stage; retry later.
    NotYetReady,
    Ready(T),
}

impl<T> Readiness<T> {
    /// Converts an optional value into a readiness signal.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::NotYetReady, Self::Ready)
    }

    /// Whether the value is available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Edge polylines sampled across an endpoint window, in plan view.
///
/// All lists have one entry per parameter. The outer-turn lists are empty
/// unless the road carries approach turn lanes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSamples {
    pub params: Vec<f64>,
    pub right: Vec<Point2>,
    pub left: Vec<Point2>,
    pub outer_right: Vec<Point2>,
    pub outer_left: Vec<Point2>,
}

impl EdgeSamples {
    /// Right edge used for corner finding.
    #[must_use]
    pub fn corner_right(&self) -> &[Point2] {
        if self.outer_right.is_empty() {
            &self.right
        } else {
            &self.outer_right
        }
    }

    /// Left edge used for corner finding.
    #[must_use]
    pub fn corner_left(&self) -> &[Point2] {
        if self.outer_left.is_empty() {
            &self.left
        } else {
            &self.outer_left
        }
    }
}

/// Left and right boundary vertices of one lane over one half of a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneEdges {
    pub left: Vec<Point3>,
    pub right: Vec<Point3>,
    pub middle: bool,
}

/// Per-lane edges of both halves of a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneHalves {
    /// Samples before the junction center, ordered by increasing parameter.
    pub front: BTreeMap<usize, LaneEdges>,
    /// Samples past the junction center, ordered by increasing parameter.
    pub back: BTreeMap<usize, LaneEdges>,
}

/// Intersection-lifetime working state of one endpoint.
///
/// Lives in a [`ScratchMap`] owned by a single build and is removed when the
/// endpoint's intersection is finalized.
#[derive(Debug, Clone, Default)]
pub struct ConstructionScratch {
    pub window: Option<Window>,
    pub samples: Option<EdgeSamples>,
    pub lanes: Option<LaneHalves>,
    /// Road vertices that strip ends were snapped onto.
    pub anchors: Vec<Point3>,
}

/// Scratch storage keyed by endpoint.
pub type ScratchMap = SecondaryMap<EndpointId, ConstructionScratch>;

/// Returns the scratch of `endpoint`, creating it on first use.
pub(crate) fn scratch_entry(scratch: &mut ScratchMap, endpoint: EndpointId) -> &mut ConstructionScratch {
    if !scratch.contains_key(endpoint) {
        scratch.insert(endpoint, ConstructionScratch::default());
    }
    &mut scratch[endpoint]
}

/// The sampled edges of `endpoint`, if it has reached the sampling stage.
#[must_use]
pub fn samples_of(scratch: &ScratchMap, endpoint: EndpointId) -> Readiness<&EdgeSamples> {
    Readiness::from_option(scratch.get(endpoint).and_then(|s| s.samples.as_ref()))
}
