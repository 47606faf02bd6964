//! Span definitions per operation: calibration, batch calibration, pyramid
//! runs and stages, unit evaluation, config loading.

/// Create a calibration span.
#[macro_export]
macro_rules! calibrate_span {
    ($method_id:expr, $role:expr) => {
        ::tracing::info_span!("calibra.calibrate", method_id = %$method_id, role = %$role)
    };
}

/// Create a batch calibration span.
#[macro_export]
macro_rules! calibrate_batch_span {
    ($batch_size:expr) => {
        ::tracing::info_span!("calibra.calibrate_batch", batch_size = $batch_size)
    };
}

/// Create a pyramid run span.
#[macro_export]
macro_rules! pyramid_span {
    ($leaf_count:expr) => {
        ::tracing::info_span!("calibra.pyramid", leaf_count = $leaf_count)
    };
}

/// Create a pyramid stage span.
#[macro_export]
macro_rules! pyramid_stage_span {
    ($level:expr, $node_count:expr) => {
        ::tracing::debug_span!("calibra.pyramid.stage", level = %$level, node_count = $node_count)
    };
}

/// Create a unit evaluation span.
#[macro_export]
macro_rules! unit_span {
    ($document_id:expr) => {
        ::tracing::info_span!("calibra.unit", document_id = %$document_id)
    };
}

/// Create a config loading span.
#[macro_export]
macro_rules! config_span {
    ($source:expr) => {
        ::tracing::info_span!("calibra.config", source = %$source)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CALIBRATE: &str = "calibra.calibrate";
    pub const CALIBRATE_BATCH: &str = "calibra.calibrate_batch";
    pub const PYRAMID: &str = "calibra.pyramid";
    pub const PYRAMID_STAGE: &str = "calibra.pyramid.stage";
    pub const UNIT: &str = "calibra.unit";
    pub const CONFIG: &str = "calibra.config";

    /// All span names.
    pub const ALL: &[&str] = &[CALIBRATE, CALIBRATE_BATCH, PYRAMID, PYRAMID_STAGE, UNIT, CONFIG];
}
