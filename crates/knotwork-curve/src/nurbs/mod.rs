//! NURBS core algorithms: knot vector utilities, basis functions, and curve evaluation.

pub mod deboor;
pub mod knot;

pub use deboor::{binomial, curve_derivatives, curve_point, rational_curve_derivatives};
pub use knot::{
    basis_function_derivatives, basis_functions, find_span, knot_domain, uniform_clamped_knots,
    validate_knots,
};
