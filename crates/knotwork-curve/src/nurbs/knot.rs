//! Knot vector utilities and B-spline basis function evaluation.

use knotwork_core::{KnotworkError, Result, Tolerance};
use smallvec::{smallvec, SmallVec};

/// Per-call scratch row. Degrees below 8 never touch the heap.
type Scratch = SmallVec<[f64; 8]>;

/// Find the knot span index for parameter `u` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= u < knots[i+1]`. Parameters at
/// or past the end of the domain map to the last non-empty span, parameters
/// at or before the start map to `degree`.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The clamped knot vector
/// * `u` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], u: f64) -> usize {
    // Number of control points
    let n = knots.len() - degree - 1;

    if u >= knots[n] {
        return n - 1;
    }
    if u <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n;
    let mut mid = (low + high) / 2;

    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Compute the non-vanishing basis functions at parameter `u`.
///
/// Returns the `degree + 1` values `N_{span-degree,degree}(u)` through
/// `N_{span,degree}(u)`. They are non-negative and sum to one.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `span` - The knot span index (from `find_span`)
/// * `u` - Parameter value
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, u: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left: Scratch = smallvec![0.0; degree + 1];
    let mut right: Scratch = smallvec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Compute the non-vanishing basis functions and their derivatives up to
/// `order` at parameter `u`.
///
/// Returns a table `ders` with `order + 1` rows of `degree + 1` entries, where
/// `ders[k][j]` is the `k`-th derivative of `N_{span-degree+j,degree}` at `u`.
/// Row 0 holds the plain basis values. `order` must not exceed `degree`.
#[allow(clippy::needless_range_loop)]
pub fn basis_function_derivatives(
    degree: usize,
    knots: &[f64],
    span: usize,
    u: f64,
    order: usize,
) -> Vec<Vec<f64>> {
    debug_assert!(
        order <= degree,
        "Derivative order {} exceeds degree {}",
        order,
        degree
    );
    let p = degree;

    // Upper triangle: basis functions of every degree; lower triangle: knot differences
    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left: Scratch = smallvec![0.0; p + 1];
    let mut right: Scratch = smallvec![0.0; p + 1];

    ndu[0][0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;

        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];

            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    let mut ders = vec![vec![0.0; p + 1]; order + 1];
    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    // Two coefficient rows, alternating between "previous" and "current"
    let mut a: [Scratch; 2] = [smallvec![0.0; p + 1], smallvec![0.0; p + 1]];
    let pi = p as isize;

    for r in 0..=p {
        let ri = r as isize;
        let mut s1 = 0usize;
        let mut s2 = 1usize;
        a[0].fill(0.0);
        a[1].fill(0.0);
        a[0][0] = 1.0;

        for k in 1..=order {
            let ki = k as isize;
            let rk = ri - ki;
            let pk = (pi - ki) as usize;
            let mut d = 0.0;

            if rk >= 0 {
                let rk = rk as usize;
                let coeff = a[s1][0] / ndu[pk + 1][rk];
                a[s2][0] = coeff;
                d = coeff * ndu[rk][pk];
            }

            let j1 = if rk >= -1 { 1 } else { -rk };
            let j2 = if ri - 1 <= pi - ki { ki - 1 } else { pi - ri };

            for j in j1..=j2 {
                let col = (rk + j) as usize;
                let j = j as usize;
                let coeff = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][col];
                a[s2][j] = coeff;
                d += coeff * ndu[col][pk];
            }

            if r <= pk {
                let coeff = -a[s1][k - 1] / ndu[pk + 1][r];
                a[s2][k] = coeff;
                d += coeff * ndu[r][pk];
            }

            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    // Multiply through by p! / (p - k)!
    let mut factor = p as f64;
    for k in 1..=order {
        for val in &mut ders[k] {
            *val *= factor;
        }
        factor *= p as f64 - k as f64;
    }

    ders
}

/// Parameter domain `(knots[degree], knots[m - degree - 1])` of a clamped curve.
pub fn knot_domain(degree: usize, knots: &[f64]) -> (f64, f64) {
    (knots[degree], knots[knots.len() - degree - 1])
}

/// Build a clamped knot vector on `[0, 1]` with uniformly spaced interior knots.
///
/// The result has `control_points + degree + 1` entries. With
/// `control_points == degree + 1` it is the Bezier knot vector.
pub fn uniform_clamped_knots(degree: usize, control_points: usize) -> Vec<f64> {
    debug_assert!(
        control_points > degree,
        "Need more than {} control points for degree {}",
        degree,
        degree
    );
    let segments = control_points - degree;
    let mut knots = Vec::with_capacity(control_points + degree + 1);

    knots.extend(std::iter::repeat(0.0).take(degree + 1));
    knots.extend((1..segments).map(|i| i as f64 / segments as f64));
    knots.extend(std::iter::repeat(1.0).take(degree + 1));

    knots
}

/// Check that `knots` is a valid clamped knot vector for a curve of the given
/// degree with `control_points` control points.
pub fn validate_knots(
    degree: usize,
    knots: &[f64],
    control_points: usize,
    tolerance: Tolerance,
) -> Result<()> {
    if control_points <= degree {
        return rejected(KnotworkError::InvalidDegree {
            degree,
            control_points,
        });
    }

    let expected = control_points + degree + 1;
    if knots.len() != expected {
        return rejected(KnotworkError::KnotCount {
            expected,
            found: knots.len(),
        });
    }

    for (index, pair) in knots.windows(2).enumerate() {
        // Negated so that NaN knots are rejected too
        if !(pair[1] >= pair[0]) {
            return rejected(KnotworkError::DecreasingKnots {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    let start = knots[0];
    if !knots[..=degree].iter().all(|&k| tolerance.parametric_eq(k, start)) {
        return rejected(KnotworkError::UnclampedKnots("start"));
    }
    let end = knots[knots.len() - 1];
    if !knots[knots.len() - degree - 1..]
        .iter()
        .all(|&k| tolerance.parametric_eq(k, end))
    {
        return rejected(KnotworkError::UnclampedKnots("end"));
    }

    let (u_min, u_max) = knot_domain(degree, knots);
    if tolerance.parametric_eq(u_min, u_max) {
        return rejected(KnotworkError::Geometry(format!(
            "empty parameter domain [{}, {}]",
            u_min, u_max
        )));
    }

    Ok(())
}

fn rejected(err: KnotworkError) -> Result<()> {
    log::debug!("rejecting knot vector: {}", err);
    Err(err)
}
