//! # calibra-core
//!
//! Foundation crate for the Calibra scoring engine.
//! Defines the shared types, the layer provider trait, errors, configuration,
//! tracing setup, and constants. `calibra-engine` builds on top of this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::{EngineConfig, ResolvedConfig};
pub use errors::EngineError;
pub use types::{
    CalibrationResult, FusionWeights, LayerId, LayerValue, NodeLevel, QualityBand, Role,
    ScoreNode,
};
