//! Level A calibration errors.

use super::error_code::{self, CalibraErrorCode};
use super::FusionError;
use crate::types::{LayerId, Role};

/// Fatal errors for one calibration. Siblings in a batch are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("method {method_id}: layer {layer} reported {value}, expected a finite value in [0, 1]")]
    LayerOutOfRange {
        method_id: String,
        layer: LayerId,
        value: f64,
    },

    #[error("method {method_id}: no fusion weights configured for role {role}")]
    MissingWeights { method_id: String, role: Role },

    #[error("method {method_id}: fusion failed: {source}")]
    Fusion {
        method_id: String,
        #[source]
        source: FusionError,
    },
}

impl CalibraErrorCode for CalibrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LayerOutOfRange { .. } => error_code::OUT_OF_RANGE,
            Self::MissingWeights { .. } => error_code::CONFIG_ERROR,
            Self::Fusion { source, .. } => source.error_code(),
        }
    }
}
