//! Level B aggregation pyramid errors.

use super::error_code::{self, CalibraErrorCode};
use super::FusionError;
use crate::types::NodeLevel;

/// Errors raised by the aggregation pyramid.
///
/// `Cardinality` is a structural bug signal and aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("{level} stage expected exactly {expected} nodes, observed {observed}")]
    Cardinality {
        level: NodeLevel,
        expected: usize,
        observed: usize,
    },

    #[error("micro-score {key} appears more than once")]
    DuplicateLeaf { key: String },

    #[error("node {node_id} is missing child {child}")]
    MissingChild { node_id: String, child: String },

    #[error("micro-score {key} is {value}, expected a finite value in [0, 1]")]
    OutOfRange { key: String, value: f64 },

    #[error("invalid micro-score key {key}: {message}")]
    InvalidKey { key: String, message: String },

    #[error("node {node_id}: fusion failed: {source}")]
    Fusion {
        node_id: String,
        #[source]
        source: FusionError,
    },
}

impl CalibraErrorCode for AggregationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cardinality { .. } => error_code::CARDINALITY_VIOLATION,
            Self::DuplicateLeaf { .. } => error_code::DUPLICATE_INPUT,
            Self::MissingChild { .. } => error_code::MISSING_INPUT,
            Self::OutOfRange { .. } => error_code::OUT_OF_RANGE,
            Self::InvalidKey { .. } => error_code::AGGREGATION_ERROR,
            Self::Fusion { source, .. } => source.error_code(),
        }
    }
}
