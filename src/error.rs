// src/error.rs

use thiserror::Error;

/// Physically ambiguous states the optimiser refuses to guess through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateKind {
    /// Effective field along the anisotropy axis and the moment on the axis too.
    FieldAndMomentAlongAxis,
    /// The extremum equation returned no real roots.
    NoStationaryPoints,
}

impl std::fmt::Display for DegenerateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldAndMomentAlongAxis => {
                write!(f, "effective field and moment both lie along the anisotropy axis")
            }
            Self::NoStationaryPoints => write!(f, "no stationary points of the in-plane energy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("non-finite quartic coefficients (a={a}, b={b}, c={c})")]
    NonFinite { a: f64, b: f64, c: f64 },

    #[error("root {root} does not satisfy the quartic (residual {residual:.3e})")]
    InvalidRoot { root: f64, residual: f64 },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("particle {particle}: degenerate configuration: {kind}")]
    Degenerate { particle: usize, kind: DegenerateKind },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("particle {particle}: root finder failed: {source}")]
    SolverFailure {
        particle: usize,
        #[source]
        source: SolverError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
