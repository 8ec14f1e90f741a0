//! Curve traits and implementations.

mod nurbs;

use knotwork_math::{Point3, Vector3};

pub use nurbs::NurbsCurve;

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `u`.
    fn point_at(&self, u: f64) -> Point3;

    /// Unit tangent at parameter `u`, or the zero vector where the first
    /// derivative vanishes.
    fn tangent_at(&self, u: f64) -> Vector3 {
        self.derivatives_at(u, 1)[1].normalize_or_zero()
    }

    /// The curve point followed by derivative vectors up to `order`.
    fn derivatives_at(&self, u: f64, order: usize) -> Vec<Vector3>;

    /// Return the parameter domain `(u_min, u_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        false
    }
}
