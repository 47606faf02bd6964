//! Layer provider errors.
//!
//! A provider failure never aborts a calibration: the scorer converts it into
//! a `LayerUnavailable` hard gate. The error is kept on the gate record.

use super::error_code::{self, CalibraErrorCode};
use crate::types::LayerId;

/// Errors a `LayerScoreProvider` can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("no provider registered for layer {layer}")]
    NotRegistered { layer: LayerId },

    #[error("layer {layer} needs {what} in the calibration context")]
    MissingContext { layer: LayerId, what: &'static str },

    #[error("layer {layer} has no score for method {method_id}")]
    UnknownMethod { layer: LayerId, method_id: String },

    #[error("layer {layer} provider failed: {message}")]
    Failed { layer: LayerId, message: String },
}

impl ProviderError {
    /// The layer whose provider failed.
    pub fn layer(&self) -> LayerId {
        match self {
            Self::NotRegistered { layer }
            | Self::MissingContext { layer, .. }
            | Self::UnknownMethod { layer, .. }
            | Self::Failed { layer, .. } => *layer,
        }
    }
}

impl CalibraErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        error_code::PROVIDER_ERROR
    }
}
