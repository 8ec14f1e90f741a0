//! Uniform sampling of curves into point lists.
//!
//! Every sample is an independent kernel evaluation, so large batches are
//! spread over the rayon thread pool when the `rayon` feature is enabled.

use knotwork_core::{KnotworkError, Result};
use knotwork_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;

/// Sampling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    /// Number of intervals; `divisions + 1` samples are produced.
    pub divisions: usize,
    /// Sample count from which evaluation runs in parallel.
    pub parallel_threshold: usize,
}

impl SamplingOptions {
    pub const DEFAULT_DIVISIONS: usize = 64;
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

    pub fn with_divisions(divisions: usize) -> Self {
        Self {
            divisions,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.divisions == 0 {
            log::debug!("rejecting sampling options {:?}", self);
            return Err(KnotworkError::InvalidSampling(
                "at least one division is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            divisions: Self::DEFAULT_DIVISIONS,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// `divisions + 1` uniformly spaced parameters covering `domain`, both ends
/// included exactly.
pub fn sample_parameters(domain: (f64, f64), divisions: usize) -> Vec<f64> {
    let (u_min, u_max) = domain;
    if divisions == 0 {
        return vec![u_min];
    }
    (0..=divisions)
        .map(|i| {
            if i == divisions {
                u_max
            } else {
                u_min + (u_max - u_min) * i as f64 / divisions as f64
            }
        })
        .collect()
}

/// Evaluate curve points at uniformly spaced parameters.
pub fn sample_points<C>(curve: &C, options: &SamplingOptions) -> Result<Vec<Point3>>
where
    C: Curve + ?Sized,
{
    options.check()?;
    let params = sample_parameters(curve.domain(), options.divisions);
    Ok(evaluate(&params, options, |u| curve.point_at(u)))
}

/// Evaluate curve points and unit tangents at uniformly spaced parameters.
pub fn sample_frames<C>(curve: &C, options: &SamplingOptions) -> Result<Vec<(Point3, Vector3)>>
where
    C: Curve + ?Sized,
{
    options.check()?;
    let params = sample_parameters(curve.domain(), options.divisions);
    Ok(evaluate(&params, options, |u| {
        let ders = curve.derivatives_at(u, 1);
        (ders[0], ders[1].normalize_or_zero())
    }))
}

fn evaluate<T, F>(params: &[f64], options: &SamplingOptions, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(f64) -> T + Sync,
{
    if runs_parallel(params.len(), options) {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;

            log::trace!("evaluating {} samples in parallel", params.len());
            return params.par_iter().map(|&u| f(u)).collect();
        }
    }

    log::trace!("evaluating {} samples", params.len());
    params.iter().map(|&u| f(u)).collect()
}

/// Whether a batch of `len` samples goes to the thread pool.
fn runs_parallel(len: usize, options: &SamplingOptions) -> bool {
    cfg!(feature = "rayon") && len >= options.parallel_threshold
}
