mod corners;
mod finalize;
mod lane_strip;
mod orient;
mod outline;
mod sample;
pub mod scratch;
mod window;

pub use corners::{CornerSolution, SolveCorners};
pub use finalize::FinalizeIntersection;
pub use lane_strip::{interleave, reconcile, BuildLaneStrips};
pub use orient::{classify, detect_flip, turn_lanes, Orientation, ResolveOrientation};
pub use outline::BuildOutline;
pub use sample::SampleEdges;
pub use scratch::{ConstructionScratch, EdgeSamples, LaneEdges, LaneHalves, Readiness, ScratchMap};
pub use window::ResolveWindow;
