//! # calibra-engine
//!
//! Scoring engine built on `calibra-core`: Choquet fusion, the 8-layer method
//! calibrator, the unit/structural evaluator, and the four-stage aggregation
//! pyramid with its adaptive dispersion penalty.
//!
//! Everything here is pure computation over an immutable
//! [`ResolvedConfig`](calibra_core::ResolvedConfig). Parallel work runs on the
//! rayon global pool and always collects in input order.

pub mod calibration;
pub mod classifier;
pub mod fusion;
pub mod penalty;
pub mod providers;
pub mod pyramid;
pub mod unit;

pub use calibration::{CalibrationRequest, Calibrator};
pub use classifier::QualityClassifier;
pub use fusion::{fuse, fuse_breakdown};
pub use penalty::{AdaptivePenalty, PenaltyAssessment};
pub use providers::{ChainLayerProvider, ProviderRegistry, StaticLayerProvider, UnitLayerProvider};
pub use pyramid::{Pyramid, PyramidReport};
pub use unit::{UnitEvaluator, UnitReport};
