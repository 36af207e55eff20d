pub mod curve;
pub mod endpoint;
pub mod intersection;
pub mod output;

pub use curve::{CenterSide, CurveData, CurveId, LaneLayout, RoadProfile};
pub use endpoint::{EndpointData, EndpointId, Window};
pub use intersection::{
    Classification, CornerSlot, Corners, IntersectionData, IntersectionId, IntersectionKind,
    IntersectionOutline, LaneBoundaries, RoadType, SpecialFlags, StopType, TurnLanes,
};
pub use output::{EndpointStrips, IntersectionOutput, LaneStrip};

use crate::error::{NetworkError, Result};
use crate::geometry::CurveSample;
use slotmap::SlotMap;

/// Central arena that owns the curves, endpoints and intersections of a road network.
///
/// Entities reference each other via typed IDs (generational indices), so an
/// intersection never borrows its endpoints or curves.
#[derive(Debug, Default)]
pub struct RoadNetwork {
    curves: SlotMap<CurveId, CurveData>,
    endpoints: SlotMap<EndpointId, EndpointData>,
    intersections: SlotMap<IntersectionId, IntersectionData>,
}

impl RoadNetwork {
    /// Creates a new, empty road network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Curve operations ---

    /// Inserts a curve and returns its ID.
    pub fn add_curve(&mut self, data: CurveData) -> CurveId {
        self.curves.insert(data)
    }

    /// Returns a reference to the curve data.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is not in the network.
    pub fn curve(&self, id: CurveId) -> Result<&CurveData, NetworkError> {
        self.curves
            .get(id)
            .ok_or(NetworkError::EntityNotFound("curve"))
    }

    /// Returns a mutable reference to the curve data.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is not in the network.
    pub fn curve_mut(&mut self, id: CurveId) -> Result<&mut CurveData, NetworkError> {
        self.curves
            .get_mut(id)
            .ok_or(NetworkError::EntityNotFound("curve"))
    }

    // --- Endpoint operations ---

    /// Adds an endpoint at parameter `t` on `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is unknown or `t` lies outside `[0, 1]`.
    pub fn add_endpoint(&mut self, curve: CurveId, t: f64, name: impl Into<String>) -> Result<EndpointId> {
        self.curve(curve)?;
        crate::geometry::curve::check_parameter(t)?;
        Ok(self.endpoints.insert(EndpointData::new(curve, t, name)))
    }

    /// Returns a reference to the endpoint data.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not in the network.
    pub fn endpoint(&self, id: EndpointId) -> Result<&EndpointData, NetworkError> {
        self.endpoints
            .get(id)
            .ok_or(NetworkError::EntityNotFound("endpoint"))
    }

    /// Returns a mutable reference to the endpoint data.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not in the network.
    pub fn endpoint_mut(&mut self, id: EndpointId) -> Result<&mut EndpointData, NetworkError> {
        self.endpoints
            .get_mut(id)
            .ok_or(NetworkError::EntityNotFound("endpoint"))
    }

    /// Other endpoints on the same curve as `id`, sorted by parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not in the network.
    pub fn neighbors_on_curve(&self, id: EndpointId) -> Result<Vec<EndpointId>, NetworkError> {
        let curve = self.endpoint(id)?.curve;
        let mut neighbors: Vec<(EndpointId, f64)> = self
            .endpoints
            .iter()
            .filter(|(other, data)| *other != id && data.curve == curve)
            .map(|(other, data)| (other, data.t))
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(neighbors.into_iter().map(|(other, _)| other).collect())
    }

    /// Evaluates the endpoint's curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or curve is unknown or evaluation fails.
    pub fn sample_curve(&self, id: EndpointId, t: f64) -> Result<CurveSample> {
        let curve = self.curve(self.endpoint(id)?.curve)?;
        curve.centerline.evaluate(t)
    }

    // --- Intersection operations ---

    /// Pairs two endpoints into a new intersection and returns its ID.
    ///
    /// `data.first` and `data.second` select the endpoints; road A is the first.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is unknown, already paired, or
    /// both lie on the same curve.
    pub fn add_intersection(&mut self, data: IntersectionData) -> Result<IntersectionId> {
        let first = self.endpoint(data.first)?;
        let second = self.endpoint(data.second)?;
        if first.intersection.is_some() || second.intersection.is_some() {
            return Err(NetworkError::EndpointTaken.into());
        }
        if first.curve == second.curve {
            return Err(NetworkError::SameCurve.into());
        }
        let (a, b) = (data.first, data.second);
        let id = self.intersections.insert(data);
        self.endpoint_mut(a)?.intersection = Some(id);
        self.endpoint_mut(b)?.intersection = Some(id);
        Ok(id)
    }

    /// Returns a reference to the intersection data.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection is not in the network.
    pub fn intersection(&self, id: IntersectionId) -> Result<&IntersectionData, NetworkError> {
        self.intersections
            .get(id)
            .ok_or(NetworkError::EntityNotFound("intersection"))
    }

    /// Returns a mutable reference to the intersection data.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection is not in the network.
    pub fn intersection_mut(&mut self, id: IntersectionId) -> Result<&mut IntersectionData, NetworkError> {
        self.intersections
            .get_mut(id)
            .ok_or(NetworkError::EntityNotFound("intersection"))
    }

    /// The intersection an endpoint belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unknown or not paired.
    pub fn intersection_of(&self, id: EndpointId) -> Result<IntersectionId, NetworkError> {
        self.endpoint(id)?
            .intersection
            .ok_or(NetworkError::EntityNotFound("intersection of endpoint"))
    }

    /// Iterates over all intersections.
    pub fn intersections(&self) -> impl Iterator<Item = (IntersectionId, &IntersectionData)> {
        self.intersections.iter()
    }

    /// All intersection IDs, in insertion-slot order.
    #[must_use]
    pub fn intersection_ids(&self) -> Vec<IntersectionId> {
        self.intersections.keys().collect()
    }
}
