//! Choquet-style fusion: the one aggregation operator shared by method
//! calibration and every pyramid stage.

pub mod choquet;

pub use choquet::{fuse, fuse_breakdown, validate_scores};
