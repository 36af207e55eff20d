use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_parameter, Centerline, CurveSample};

/// Chords used to approximate the arc length.
const LENGTH_CHORDS: u32 = 64;

/// A cubic Bezier centerline with precomputed arc length.
#[derive(Debug, Clone)]
pub struct CubicCenterline {
    controls: [Point3; 4],
    length: f64,
    special_start: bool,
    special_end: bool,
}

impl CubicCenterline {
    /// Creates a cubic centerline from its four control points.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve collapses to a point.
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Result<Self> {
        let controls = [p0, p1, p2, p3];
        let mut length = 0.0;
        let mut prev = p0;
        for i in 1..=LENGTH_CHORDS {
            let p = point_at(&controls, f64::from(i) / f64::from(LENGTH_CHORDS));
            length += nalgebra::distance(&prev, &p);
            prev = p;
        }
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate("cubic centerline has zero length".to_owned()).into());
        }
        Ok(Self {
            controls,
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
}

fn point_at(c: &[Point3; 4], t: f64) -> Point3 {
    let mt = 1.0 - t;
    let v = c[0].coords * (mt * mt * mt)
        + c[1].coords * (3.0 * mt * mt * t)
        + c[2].coords * (3.0 * mt * t * t)
        + c[3].coords * (t * t * t);
    Point3::from(v)
}

fn derivative_at(c: &[Point3; 4], t: f64) -> Vector3 {
    let mt = 1.0 - t;
    (c[1] - c[0]) * (3.0 * mt * mt) + (c[2] - c[1]) * (6.0 * mt * t) + (c[3] - c[2]) * (3.0 * t * t)
}

impl Centerline for CubicCenterline {
    fn evaluate(&self, t: f64) -> Result<CurveSample> {
        check_parameter(t)?;
        let mut d = derivative_at(&self.controls, t);
        if d.norm() < TOLERANCE {
            // Coincident handles: fall back to the chord direction.
            d = self.controls[3] - self.controls[0];
        }
        let tangent = d.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        Ok(CurveSample {
            position: point_at(&self.controls, t),
            tangent,
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
