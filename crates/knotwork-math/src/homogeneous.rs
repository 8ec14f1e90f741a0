//! Helpers for points expressed in homogeneous `(x, y, z, w)` form.
//!
//! Control points keep their Euclidean coordinates in `x, y, z` and carry the
//! weight in `w`. Evaluation results are weighted sums in projective space and
//! must be projected before they are used as positions.

use crate::{Point3, Point4};

pub trait Homogeneous: Copy {
    /// Build a control point from a Euclidean position and a weight.
    fn from_weighted(point: Point3, weight: f64) -> Self;

    /// The weight channel.
    fn weight(self) -> f64;

    /// The `x, y, z` channels, unmodified.
    fn xyz(self) -> Point3;

    /// Lift a control point into projective space: `(x*w, y*w, z*w, w)`.
    fn weighted(self) -> Self;

    /// Divide `x, y, z` by `w`.
    fn project(self) -> Point3;
}

impl Homogeneous for Point4 {
    #[inline]
    fn from_weighted(point: Point3, weight: f64) -> Self {
        point.extend(weight)
    }

    #[inline]
    fn weight(self) -> f64 {
        self.w
    }

    #[inline]
    fn xyz(self) -> Point3 {
        self.truncate()
    }

    #[inline]
    fn weighted(self) -> Self {
        (self.truncate() * self.w).extend(self.w)
    }

    #[inline]
    fn project(self) -> Point3 {
        self.truncate() / self.w
    }
}
