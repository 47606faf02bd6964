//! Trait seams between the engine and its external collaborators.

pub mod layer_provider;

pub use layer_provider::{CalibrationContext, LayerScoreProvider};
