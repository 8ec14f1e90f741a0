pub mod aabb;
pub mod homogeneous;
pub mod transform;

pub use glam::{DAffine3, DVec3, DVec4};
pub use aabb::Aabb3;
pub use homogeneous::Homogeneous;
pub use transform::Transform;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
/// Homogeneous point `(x, y, z, w)`.
pub type Point4 = DVec4;
