pub mod curve;

pub use curve::{Centerline, CubicCenterline, CurveSample, StraightCenterline};
