//! CalibraErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code string next to its human-readable message.
pub trait CalibraErrorCode {
    /// Returns the error code string (e.g., "CARDINALITY_VIOLATION").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_WEIGHTS: &str = "INVALID_WEIGHTS";
pub const MISSING_KEY: &str = "MISSING_KEY";
pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
pub const MISSING_INPUT: &str = "MISSING_INPUT";
pub const CARDINALITY_VIOLATION: &str = "CARDINALITY_VIOLATION";
pub const DUPLICATE_INPUT: &str = "DUPLICATE_INPUT";
pub const AGGREGATION_ERROR: &str = "AGGREGATION_ERROR";
