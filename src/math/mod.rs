pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D (plan view) point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. `z` is height above the plan.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Drops the height of a 3D point.
#[must_use]
pub fn plan(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// Lifts a plan point to the given height.
#[must_use]
pub fn lift(p: &Point2, z: f64) -> Point3 {
    Point3::new(p.x, p.y, z)
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp3(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}
