//! B-spline and NURBS curve evaluation on homogeneous control points.
//!
//! Control points are `(x, y, z, w)` with Euclidean `x, y, z` and weight `w`.
//! Nothing here validates its input: these run once per sample, so callers
//! are expected to check curve data up front (see `validate_knots`).

use knotwork_math::{Homogeneous, Point4};
use smallvec::SmallVec;

use super::knot::{basis_function_derivatives, basis_functions, find_span};

/// Evaluate the homogeneous curve point at parameter `u`.
///
/// The result is the weighted sum `(sum w_i N_i P_i, sum w_i N_i)` and is not
/// projected; divide `x, y, z` by `w` to get the position on the curve.
pub fn curve_point(degree: usize, knots: &[f64], control_points: &[Point4], u: f64) -> Point4 {
    let span = find_span(degree, knots, u);
    let basis = basis_functions(degree, knots, span, u);

    let mut point = Point4::ZERO;
    for (j, &nj) in basis.iter().enumerate() {
        let cp = control_points[span - degree + j];
        let wn = cp.w * nj;
        point += (cp.xyz() * wn).extend(wn);
    }

    point
}

/// Derivatives of the weighted (non-rational) curve `A(u) = sum N_i w_i P_i`
/// at `u`, including the weight channel.
///
/// Returns `order + 2` homogeneous vectors. Entry `k` is the `k`-th derivative
/// for `k <= degree`; every entry above the degree is exactly zero.
pub fn curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Point4],
    u: f64,
    order: usize,
) -> Vec<Point4> {
    let du = order.min(degree);
    let span = find_span(degree, knots, u);
    let ders = basis_function_derivatives(degree, knots, span, u, du);

    let weighted: SmallVec<[Point4; 8]> = control_points[span - degree..=span]
        .iter()
        .map(|cp| cp.weighted())
        .collect();

    let mut ck = vec![Point4::ZERO; order + 2];
    for (k, row) in ders.iter().enumerate() {
        ck[k] = row
            .iter()
            .zip(&weighted)
            .fold(Point4::ZERO, |acc, (&n, &pw)| acc + pw * n);
    }

    ck
}

/// Binomial coefficient `k! / (i! (k - i)!)`.
///
/// The factorials are accumulated in `f64`, so large derivative orders lose
/// precision instead of overflowing.
pub fn binomial(k: usize, i: usize) -> f64 {
    debug_assert!(i <= k, "binomial({}, {}) is undefined", k, i);
    let factorial = |n: usize| (2..=n).fold(1.0, |acc, j| acc * j as f64);
    factorial(k) / (factorial(i) * factorial(k - i))
}

/// Derivatives of the rational curve at `u`, orders `0..=order`.
///
/// Entry 0 is the Euclidean curve point and entry `k` the `k`-th derivative
/// vector, all with `w` set to 1.
pub fn rational_curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Point4],
    u: f64,
    order: usize,
) -> Vec<Point4> {
    let aders = curve_derivatives(degree, knots, control_points, u, order);
    let wders: SmallVec<[f64; 8]> = aders[..=order].iter().map(|a| a.w).collect();

    let mut ck: Vec<Point4> = Vec::with_capacity(order + 1);
    for k in 0..=order {
        let mut v = aders[k];
        for i in 1..=k {
            v -= ck[k - i] * (binomial(k, i) * wders[i]);
        }
        ck.push(v / wders[0]);
    }

    // The weight channel only feeds the recurrence
    for c in &mut ck {
        c.w = 1.0;
    }

    ck
}
