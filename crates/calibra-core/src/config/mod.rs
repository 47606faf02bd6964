//! Configuration system for Calibra.
//! TOML-based, 3-layer resolution: env > file > defaults. Validated once into
//! an immutable [`ResolvedConfig`] before any scoring.

pub mod aggregation_config;
pub mod calibration_config;
pub mod classification_config;
pub mod engine_config;
pub mod unit_config;

pub use aggregation_config::{
    AggregationConfig, ClusterMembership, ClusterStageConfig, ClusterStageSettings, PenaltyBand,
    PenaltyBands, ResolvedAggregation, StageConfig, StageSettings,
};
pub use calibration_config::{default_role_weights, CalibrationConfig, ResolvedCalibration};
pub use classification_config::{ClassificationConfig, ClassificationPolicy, ThresholdPreset};
pub use engine_config::{EngineConfig, ResolvedConfig};
pub use unit_config::{
    AggregationFunction, AntiGamingConfig, ComponentWeights, SectionRequirement, UnitConfig,
    UnitGateConfig,
};
