//! Configuration errors. All of them are fatal at load time.

use super::error_code::{self, CalibraErrorCode};
use super::FusionError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid weights for {scope}: {source}")]
    InvalidWeights {
        scope: String,
        #[source]
        source: FusionError,
    },
}

impl ConfigError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn weights(scope: impl Into<String>, source: FusionError) -> Self {
        Self::InvalidWeights {
            scope: scope.into(),
            source,
        }
    }
}

impl CalibraErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWeights { .. } => error_code::INVALID_WEIGHTS,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
