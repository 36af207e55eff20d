mod bezier;
mod line;

pub use bezier::CubicCenterline;
pub use line::StraightCenterline;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};

/// Position and direction of a centerline at one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// World position on the centerline.
    pub position: Point3,
    /// Unit tangent in the direction of increasing parameter.
    pub tangent: Vector3,
}

/// A road centerline parameterized over `t ∈ [0, 1]`.
///
/// Curve evaluation belongs to the host application; the geometry stage only
/// consumes it through this trait.
pub trait Centerline: std::fmt::Debug {
    /// Evaluates the centerline at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn evaluate(&self, t: f64) -> Result<CurveSample>;

    /// Arc length of the whole curve, used to turn physical offsets into parameter deltas.
    fn distance(&self) -> f64;

    /// Whether the first control node is reserved by an adjacent construct.
    fn is_special_start(&self) -> bool {
        false
    }

    /// Whether the last control node is reserved by an adjacent construct.
    fn is_special_end(&self) -> bool {
        false
    }
}

/// Rejects parameters outside `[0, 1]`.
pub(crate) fn check_parameter(t: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&t) {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "t",
            value: t,
            min: 0.0,
            max: 1.0,
        }
        .into());
    }
    Ok(())
}
