use std::collections::BTreeMap;

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::network::{EndpointId, EndpointStrips, IntersectionId, LaneStrip, RoadNetwork};

use super::lane_strip::{interleave, reconcile};
use super::scratch::{LaneEdges, ScratchMap};

/// Registers the mesh-ready strips and plates of both endpoints of an intersection.
///
/// A half is left out when its lane 0 collected no vertices or the endpoint
/// sits on that end of its curve. Front strips are reversed so both halves run
/// away from the junction center. Once registered, the endpoints are marked
/// processed, keep their window for later neighbors, and lose their scratch.
#[derive(Debug)]
pub struct FinalizeIntersection {
    intersection: IntersectionId,
    end_epsilon: f64,
}

impl FinalizeIntersection {
    /// Creates a new finalization; `end_epsilon` is the parameter distance
    /// under which an endpoint counts as sitting on a curve end.
    #[must_use]
    pub fn new(intersection: IntersectionId, end_epsilon: f64) -> Self {
        Self {
            intersection,
            end_epsilon,
        }
    }

    /// Executes the finalization. Does nothing on a finalized intersection.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is unknown or an endpoint has no lanes built.
    pub fn execute(&self, network: &mut RoadNetwork, scratch: &mut ScratchMap) -> Result<()> {
        let data = network.intersection(self.intersection)?;
        if data.is_finalized() {
            return Ok(());
        }
        let endpoints = [data.first, data.second];

        let mut strips = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            strips.push(self.organize(network, scratch, endpoint)?);
        }

        network.intersection_mut(self.intersection)?.output.endpoints = strips;
        for endpoint in endpoints {
            let window = scratch.remove(endpoint).and_then(|s| s.window);
            let data = network.endpoint_mut(endpoint)?;
            data.processed = true;
            data.window = window.or(data.window);
        }
        Ok(())
    }

    fn organize(&self, network: &RoadNetwork, scratch: &ScratchMap, endpoint: EndpointId) -> Result<EndpointStrips> {
        let lanes = scratch
            .get(endpoint)
            .and_then(|s| s.lanes.as_ref())
            .ok_or(OperationError::MissingStage {
                stage: "finalize",
                requirement: "built lane strips",
            })?;
        let t = network.endpoint(endpoint)?.t;

        let front_absent = lane_zero_empty(&lanes.front) || t <= self.end_epsilon;
        let back_absent = lane_zero_empty(&lanes.back) || t >= 1.0 - self.end_epsilon;

        let (front, front_plate) = if front_absent {
            (None, None)
        } else {
            let reversed: BTreeMap<usize, LaneEdges> = lanes
                .front
                .iter()
                .map(|(k, e)| {
                    let mut e = e.clone();
                    e.left.reverse();
                    e.right.reverse();
                    (*k, e)
                })
                .collect();
            (
                Some(self.strips(&reversed, endpoint)),
                Some(plate(&reversed)),
            )
        };
        let (back, back_plate) = if back_absent {
            (None, None)
        } else {
            (Some(self.strips(&lanes.back, endpoint)), Some(plate(&lanes.back)))
        };

        Ok(EndpointStrips {
            endpoint,
            front,
            back,
            front_plate,
            back_plate,
        })
    }

    fn strips(&self, lanes: &BTreeMap<usize, LaneEdges>, endpoint: EndpointId) -> BTreeMap<usize, LaneStrip> {
        lanes
            .iter()
            .map(|(k, e)| {
                let strip = LaneStrip {
                    intersection: self.intersection,
                    endpoint,
                    lane: *k,
                    middle: e.middle,
                    points: interleave(&e.left, &e.right),
                };
                (*k, strip)
            })
            .collect()
    }
}

fn lane_zero_empty(lanes: &BTreeMap<usize, LaneEdges>) -> bool {
    lanes.get(&0).is_none_or(|e| e.right.is_empty())
}

/// The widest drivable surface: the outermost left boundary against lane 0's right boundary.
fn plate(lanes: &BTreeMap<usize, LaneEdges>) -> Vec<Point3> {
    let mut right = lanes.get(&0).map(|e| e.right.clone()).unwrap_or_default();
    let mut left = lanes
        .last_key_value()
        .map(|(_, e)| e.left.clone())
        .unwrap_or_default();
    reconcile(&mut left, &mut right);
    interleave(&left, &right)
}
