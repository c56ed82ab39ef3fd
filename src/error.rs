//! Error types for the simulation.
//!
//! Everything here is a configuration error: per-tick arithmetic never fails,
//! so the only way in is a bad parameter or a bad notification from the host.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("particle count must be positive")]
    NoParticles,

    #[error("canvas bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("radius parameters must be finite with a positive mean, got mean={mean} variance={variance}")]
    InvalidRadius { mean: f32, variance: f32 },

    #[error("base velocity must be positive and finite, got {0}")]
    InvalidVelocity(f32),

    #[error("spawn variance must be finite and non-negative, got {0}")]
    InvalidSpawnVariance(f32),

    #[error("sampling boundary must be finite, got {0}")]
    InvalidBoundary(f32),

    #[error("boundary fraction must lie in [0, 1], got {0}")]
    InvalidBoundaryFraction(f32),

    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f32),

    #[error("history length must be positive")]
    EmptyHistory,
}
