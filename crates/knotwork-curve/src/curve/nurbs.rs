//! NURBS curve built on the evaluation kernel in [`crate::nurbs`].

use knotwork_core::traits::{BoundingBox, Validate};
use knotwork_core::{KnotworkError, Result, Tolerance};
use knotwork_math::{Aabb3, Homogeneous, Point3, Point4, Transform, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::nurbs::{self, knot};

/// A NURBS (Non-Uniform Rational B-Spline) curve.
///
/// Control points are homogeneous `(x, y, z, w)` with the weight in `w`. A
/// plain B-spline is the special case where every weight is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Point4>,
}

impl NurbsCurve {
    /// Build a curve without validation. Invariants are only checked in
    /// debug builds; use [`NurbsCurve::try_new`] for untrusted data.
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<Point4>) -> Self {
        debug_assert!(
            knots.len() == control_points.len() + degree + 1,
            "Knot vector length must be n + p + 1, got {} knots for {} CPs with degree {}",
            knots.len(),
            control_points.len(),
            degree
        );
        debug_assert!(
            control_points.iter().all(|cp| cp.w > 0.0),
            "All weights must be positive"
        );
        Self {
            degree,
            knots,
            control_points,
        }
    }

    /// Build a curve, checking the knot vector and weights.
    pub fn try_new(degree: usize, knots: Vec<f64>, control_points: Vec<Point4>) -> Result<Self> {
        let curve = Self {
            degree,
            knots,
            control_points,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Build a rational curve from Euclidean points and separate weights.
    pub fn from_weighted(
        degree: usize,
        knots: Vec<f64>,
        points: &[Point3],
        weights: &[f64],
    ) -> Result<Self> {
        if points.len() != weights.len() {
            return Err(KnotworkError::Geometry(format!(
                "{} control points but {} weights",
                points.len(),
                weights.len()
            )));
        }
        let control_points = points
            .iter()
            .zip(weights)
            .map(|(&p, &w)| Point4::from_weighted(p, w))
            .collect();
        Self::try_new(degree, knots, control_points)
    }

    /// Build a plain (non-rational) B-spline curve.
    pub fn non_rational(degree: usize, knots: Vec<f64>, points: &[Point3]) -> Result<Self> {
        let control_points = points.iter().map(|&p| Point4::from_weighted(p, 1.0)).collect();
        Self::try_new(degree, knots, control_points)
    }

    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.control_points.iter().map(|cp| cp.weight())
    }

    /// Whether any weight differs from the others.
    pub fn is_rational(&self) -> bool {
        let mut weights = self.weights();
        match weights.next() {
            Some(first) => weights.any(|w| w != first),
            None => false,
        }
    }

    /// Unprojected homogeneous point at `u`.
    pub fn homogeneous_point_at(&self, u: f64) -> Point4 {
        nurbs::curve_point(self.degree, &self.knots, &self.control_points, u)
    }

    /// Derivatives of the weighted polynomial curve, orders `0..=order + 1`.
    pub fn homogeneous_derivatives_at(&self, u: f64, order: usize) -> Vec<Point4> {
        nurbs::curve_derivatives(self.degree, &self.knots, &self.control_points, u, order)
    }

    /// Evaluate at `u`, rejecting parameters outside the domain.
    pub fn checked_point_at(&self, u: f64, tolerance: Tolerance) -> Result<Point3> {
        let (min, max) = self.domain();
        if !(u >= min - tolerance.parametric && u <= max + tolerance.parametric) {
            log::debug!("parameter {} outside of [{}, {}]", u, min, max);
            return Err(KnotworkError::ParameterOutOfDomain { u, min, max });
        }
        Ok(self.point_at(u.clamp(min, max)))
    }

    /// Apply an affine transform to the control points, keeping the weights.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            degree: self.degree,
            knots: self.knots.clone(),
            control_points: self
                .control_points
                .iter()
                .map(|&cp| transform.transform_control_point(cp))
                .collect(),
        }
    }

    /// Bounding box of the control polygon. With positive weights the curve
    /// lies inside the convex hull of its control points, so inside this box.
    pub fn control_hull_aabb(&self) -> Option<Aabb3> {
        Aabb3::from_points(self.control_points.iter().map(|cp| cp.xyz()))
    }
}

impl Validate for NurbsCurve {
    fn validate(&self) -> Result<()> {
        knot::validate_knots(
            self.degree,
            &self.knots,
            self.control_points.len(),
            Tolerance::default(),
        )?;

        for (index, cp) in self.control_points.iter().enumerate() {
            if !(cp.w.is_finite() && cp.w > 0.0) {
                log::debug!("rejecting weight {} at control point {}", cp.w, index);
                return Err(KnotworkError::InvalidWeight {
                    index,
                    weight: cp.w,
                });
            }
            if !cp.xyz().is_finite() {
                return Err(KnotworkError::Geometry(format!(
                    "control point {} is not finite: {}",
                    index, cp
                )));
            }
        }

        Ok(())
    }
}

impl BoundingBox for NurbsCurve {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        self.control_hull_aabb()
            .map(|aabb| (aabb.min, aabb.max))
            .unwrap_or((Point3::ZERO, Point3::ZERO))
    }
}

impl Curve for NurbsCurve {
    fn point_at(&self, u: f64) -> Point3 {
        self.homogeneous_point_at(u).project()
    }

    fn derivatives_at(&self, u: f64, order: usize) -> Vec<Vector3> {
        nurbs::rational_curve_derivatives(self.degree, &self.knots, &self.control_points, u, order)
            .into_iter()
            .map(|ck| ck.xyz())
            .collect()
    }

    fn domain(&self) -> (f64, f64) {
        knot::knot_domain(self.degree, &self.knots)
    }

    fn is_closed(&self) -> bool {
        let (u_min, u_max) = self.domain();
        let gap = (self.point_at(u_max) - self.point_at(u_min)).length();
        Tolerance::default().is_zero(gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use knotwork_math::DVec3;

    fn unit_circle() -> NurbsCurve {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        NurbsCurve::from_weighted(
            2,
            vec![0.0, 0.0, 0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0, 1.0],
            &[
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(-1.0, 1.0, 0.0),
                DVec3::new(-1.0, 0.0, 0.0),
                DVec3::new(-1.0, -1.0, 0.0),
                DVec3::new(0.0, -1.0, 0.0),
                DVec3::new(1.0, -1.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
            ],
            &[1.0, w, 1.0, w, 1.0, w, 1.0, w, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_bspline_quadratic() {
        let curve = NurbsCurve::non_rational(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            &[
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(0.5, 1.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        assert!(!curve.is_rational());

        // Endpoints should interpolate
        assert!((curve.point_at(0.0) - DVec3::new(0.0, 0.0, 0.0)).length() < 1e-10);
        assert!((curve.point_at(1.0) - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-10);

        // 0.25*P0 + 0.5*P1 + 0.25*P2 = (0.5, 0.5, 0)
        let pm = curve.point_at(0.5);
        assert!((pm.x - 0.5).abs() < 1e-10);
        assert!((pm.y - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_domain() {
        let curve = NurbsCurve::non_rational(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0],
            &[DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::ONE],
        )
        .unwrap();
        assert_eq!(curve.domain(), (0.0, 3.0));
        assert_eq!(curve.control_point_count(), 5);
        assert!(!curve.is_closed());
    }

    #[test]
    fn test_nurbs_circle() {
        let curve = unit_circle();
        assert!(curve.is_rational());
        assert!(curve.is_closed());

        let (u_min, u_max) = curve.domain();
        for i in 0..=20 {
            let u = u_min + (u_max - u_min) * i as f64 / 20.0;
            let p = curve.point_at(u);
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(
                (r - 1.0).abs() < 1e-8,
                "NURBS circle point at u={} has radius {}, expected 1.0",
                u,
                r
            );
            assert!(p.z.abs() < 1e-10);
        }
    }

    #[test]
    fn test_circle_tangent_is_perpendicular_to_radius() {
        let curve = unit_circle();
        for i in 0..=16 {
            let u = i as f64 / 16.0;
            let p = curve.point_at(u);
            let t = curve.tangent_at(u);
            assert_relative_eq!(t.length(), 1.0, epsilon = 1e-12);
            assert!(p.dot(t).abs() < 1e-10, "tangent not perpendicular at u={}", u);
            // Counter-clockwise traversal
            assert!(p.cross(t).z > 0.0);
        }
    }

    #[test]
    fn test_checked_point_at() {
        let curve = unit_circle();
        let tol = Tolerance::default();
        assert!(curve.checked_point_at(0.5, tol).is_ok());
        assert!(curve.checked_point_at(1.0 + 1e-12, tol).is_ok());
        assert_eq!(
            curve.checked_point_at(1.5, tol),
            Err(KnotworkError::ParameterOutOfDomain {
                u: 1.5,
                min: 0.0,
                max: 1.0
            })
        );
        assert!(curve.checked_point_at(f64::NAN, tol).is_err());
    }

    #[test]
    fn test_rejects_bad_weights() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let points = [DVec3::ZERO, DVec3::X];
        assert_eq!(
            NurbsCurve::from_weighted(1, knots.clone(), &points, &[1.0, 0.0]),
            Err(KnotworkError::InvalidWeight {
                index: 1,
                weight: 0.0
            })
        );
        assert!(matches!(
            NurbsCurve::from_weighted(1, knots.clone(), &points, &[1.0]),
            Err(KnotworkError::Geometry(_))
        ));
        assert!(matches!(
            NurbsCurve::from_weighted(1, knots, &points, &[f64::INFINITY, 1.0]),
            Err(KnotworkError::InvalidWeight { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_point() {
        let result = NurbsCurve::non_rational(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            &[DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0)],
        );
        assert!(matches!(result, Err(KnotworkError::Geometry(_))));
    }

    #[test]
    fn test_transformed_curve() {
        let curve = unit_circle();
        let shift = Transform::from_translation(DVec3::new(2.0, -3.0, 1.0));
        let moved = curve.transformed(&shift);
        assert_eq!(moved.weights().collect::<Vec<_>>(), curve.weights().collect::<Vec<_>>());
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let expected = shift.transform_point(curve.point_at(u));
            assert!((moved.point_at(u) - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_homogeneous_derivatives_carry_weight() {
        let curve = unit_circle();
        let ders = curve.homogeneous_derivatives_at(0.1, 3);
        assert_eq!(ders.len(), 5);
        assert_relative_eq!(ders[0].w, curve.homogeneous_point_at(0.1).w, epsilon = 1e-14);
        // Quadratic pieces: nothing above second order
        assert_eq!(ders[3], Point4::ZERO);
        assert_eq!(ders[4], Point4::ZERO);
    }

    #[test]
    fn test_bounding_box() {
        let curve = unit_circle();
        let (min, max) = curve.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, DVec3::new(1.0, 1.0, 0.0));
    }
}
