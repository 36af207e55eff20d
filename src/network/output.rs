use std::collections::BTreeMap;

use crate::math::Point3;

use super::endpoint::EndpointId;
use super::intersection::IntersectionId;

/// Quad-strip vertices for one lane of one half of an endpoint window.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneStrip {
    pub intersection: IntersectionId,
    pub endpoint: EndpointId,
    pub lane: usize,
    /// Set for the middle turn lane.
    pub middle: bool,
    /// Interleaved `L, L, R, R` vertices, four per sample.
    pub points: Vec<Point3>,
}

/// Everything the mesh builder needs for one endpoint of an intersection.
///
/// Both halves run away from the junction center. A half is `None` when the
/// road does not continue on that side (a T-junction stem or a curve end).
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStrips {
    pub endpoint: EndpointId,
    pub front: Option<BTreeMap<usize, LaneStrip>>,
    pub back: Option<BTreeMap<usize, LaneStrip>>,
    pub front_plate: Option<Vec<Point3>>,
    pub back_plate: Option<Vec<Point3>>,
}

/// Output buffer of a finalized intersection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionOutput {
    pub endpoints: Vec<EndpointStrips>,
}

impl IntersectionOutput {
    /// Strips registered for `endpoint`.
    #[must_use]
    pub fn for_endpoint(&self, endpoint: EndpointId) -> Option<&EndpointStrips> {
        self.endpoints.iter().find(|e| e.endpoint == endpoint)
    }
}
