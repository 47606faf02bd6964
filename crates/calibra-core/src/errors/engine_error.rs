//! Top-level engine error aggregating the subsystem errors.

use super::error_code::CalibraErrorCode;
use super::{AggregationError, CalibrationError, ConfigError, FusionError, ProviderError};

/// Errors surfaced across crate boundaries.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fusion error: {0}")]
    Fusion(#[from] FusionError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),
}

impl CalibraErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Fusion(e) => e.error_code(),
            Self::Provider(e) => e.error_code(),
            Self::Calibration(e) => e.error_code(),
            Self::Aggregation(e) => e.error_code(),
        }
    }
}
