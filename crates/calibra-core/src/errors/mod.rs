//! Error handling for Calibra.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod aggregation_error;
pub mod calibration_error;
pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod fusion_error;
pub mod provider_error;

pub use aggregation_error::AggregationError;
pub use calibration_error::CalibrationError;
pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::CalibraErrorCode;
pub use fusion_error::FusionError;
pub use provider_error::ProviderError;
