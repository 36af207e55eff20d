use crate::error::{GeometryError, Result};
use crate::math::{lerp3, Point3, Vector3, TOLERANCE};

use super::{check_parameter, Centerline, CurveSample};

/// A straight centerline from `start` to `end`.
///
/// The parametric form is: `P(t) = start + t * (end - start)`.
#[derive(Debug, Clone)]
pub struct StraightCenterline {
    start: Point3,
    end: Point3,
    direction: Vector3,
    length: f64,
    special_start: bool,
    special_end: bool,
}

impl StraightCenterline {
    /// Creates a new straight centerline.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let d = end - start;
        let length = d.norm();
        if length < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            start,
            end,
            direction: d / length,
            length,
            special_start: false,
            special_end: false,
        })
    }

    /// Marks the start and/or end control node as special.
    #[must_use]
    pub fn with_special_nodes(mut self, start: bool, end: bool) -> Self {
        self.special_start = start;
        self.special_end = end;
        self
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }
}

impl Centerline for StraightCenterline {
    fn evaluate(&self, t: f64) -> Result<CurveSample> {
        check_parameter(t)?;
        Ok(CurveSample {
            position: lerp3(&self.start, &self.end, t),
            tangent: self.direction,
        })
    }

    fn distance(&self) -> f64 {
        self.length
    }

    fn is_special_start(&self) -> bool {
        self.special_start
    }

    fn is_special_end(&self) -> bool {
        self.special_end
    }
}
