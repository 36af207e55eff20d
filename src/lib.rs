pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod network;
pub mod operations;
pub mod pipeline;
pub mod strength;

pub use config::{CornerStrategy, IntersectionConfig};
pub use diagnostics::Diagnostic;
pub use error::{CrosswayError, Result};
pub use network::RoadNetwork;
pub use pipeline::{BuildIntersections, BuildReport};
pub use strength::{IntersectionStrength, RadialFalloff};
