//! Fusion errors: weight-construction and fuse-time precondition failures.

use super::error_code::{self, CalibraErrorCode};

/// Errors raised while building `FusionWeights` or evaluating `fuse()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FusionError {
    #[error("score for key {key} is required by the weights but missing")]
    MissingKey { key: String },

    #[error("score for key {key} is {value}, expected a finite value in [0, 1]")]
    OutOfRange { key: String, value: f64 },

    #[error("weights sum to {observed}, expected 1.0 ± {tolerance}")]
    WeightSum { observed: f64, tolerance: f64 },

    #[error("weight for {key} is {value}, weights must be finite and non-negative")]
    NegativeWeight { key: String, value: f64 },

    #[error("interaction pair ({key}, {key}) pairs a key with itself")]
    SelfInteraction { key: String },

    #[error("interaction pair ({a}, {b}) is declared more than once")]
    DuplicateInteraction { a: String, b: String },

    #[error("interaction terms are not allowed here, found {count}")]
    UnexpectedInteraction { count: usize },

    #[error("weights declare no terms")]
    Empty,
}

impl CalibraErrorCode for FusionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } => error_code::MISSING_KEY,
            Self::OutOfRange { .. } => error_code::OUT_OF_RANGE,
            _ => error_code::INVALID_WEIGHTS,
        }
    }
}
