use super::curve::CurveId;
use super::intersection::IntersectionId;

slotmap::new_key_type! {
    /// Unique identifier for an intersection endpoint.
    pub struct EndpointId;
}

/// Parameter range sampled around an endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    /// Whether `t` lies inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        (self.start..=self.end).contains(&t)
    }

    /// Parameter length of the window.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// A point on a curve that takes part in an intersection.
#[derive(Debug, Clone)]
pub struct EndpointData {
    /// The curve this endpoint lies on.
    pub curve: CurveId,
    /// Curve parameter of the junction center.
    pub t: f64,
    /// Display name used in diagnostics.
    pub name: String,
    /// The intersection this endpoint belongs to, once paired.
    pub intersection: Option<IntersectionId>,
    /// Window kept from a finished build, for clamping later neighbors.
    pub window: Option<Window>,
    /// Set by the finalizer once the endpoint's strips are registered.
    pub processed: bool,
}

impl EndpointData {
    /// Creates an unpaired endpoint.
    #[must_use]
    pub fn new(curve: CurveId, t: f64, name: impl Into<String>) -> Self {
        Self {
            curve,
            t,
            name: name.into(),
            intersection: None,
            window: None,
            processed: false,
        }
    }
}
