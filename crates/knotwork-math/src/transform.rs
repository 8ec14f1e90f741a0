use crate::{DAffine3, Point3, Point4, Vector3};
use serde::{Deserialize, Serialize};

/// Affine transform applied to control points.
///
/// Rational curves are invariant under affine maps: transforming the
/// Euclidean part of every control point while keeping its weight yields the
/// transformed curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub affine: DAffine3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            affine: DAffine3::IDENTITY,
        }
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self {
            affine: DAffine3::from_translation(t),
        }
    }

    pub fn from_scale(s: Vector3) -> Self {
        Self {
            affine: DAffine3::from_scale(s),
        }
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn from_rotation_z(angle: f64) -> Self {
        Self {
            affine: DAffine3::from_rotation_z(angle),
        }
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.affine.transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.affine.transform_vector3(v)
    }

    /// Transform the Euclidean part of a control point, keeping its weight.
    pub fn transform_control_point(&self, p: Point4) -> Point4 {
        self.transform_point(p.truncate()).extend(p.w)
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Self {
            affine: other.affine * self.affine,
        }
    }

    pub fn inverse(&self) -> Option<Transform> {
        if self.affine.matrix3.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self {
                affine: self.affine.inverse(),
            })
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
