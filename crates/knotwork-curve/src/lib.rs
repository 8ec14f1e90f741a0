//! Knotwork curves: B-spline and NURBS evaluation, curve types, and sampling.

pub mod curve;
pub mod nurbs;
pub mod sample;

pub use curve::{Curve, NurbsCurve};
pub use sample::{sample_frames, sample_parameters, sample_points, SamplingOptions};
