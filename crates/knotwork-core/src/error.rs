use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum KnotworkError {
    #[error("Invalid degree: degree {degree} needs more than {control_points} control points")]
    InvalidDegree { degree: usize, control_points: usize },

    #[error("Knot count mismatch: expected {expected} knots, found {found}")]
    KnotCount { expected: usize, found: usize },

    #[error("Knot vector decreases at index {index}: {previous} > {current}")]
    DecreasingKnots {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Knot vector is not clamped at the {0} end")]
    UnclampedKnots(&'static str),

    #[error("Invalid weight at control point {index}: {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("Parameter {u} outside of curve domain [{min}, {max}]")]
    ParameterOutOfDomain { u: f64, min: f64, max: f64 },

    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    #[error("Geometry error: {0}")]
    Geometry(String),
}

pub type Result<T> = std::result::Result<T, KnotworkError>;
