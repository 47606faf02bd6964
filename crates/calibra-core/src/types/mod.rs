//! Shared data model for both aggregation levels.

pub mod band;
pub mod calibration;
pub mod identifiers;
pub mod layer;
pub mod node;
pub mod pdt;
pub mod role;
pub mod weights;

pub use band::{ClassificationThresholds, QualityBand};
pub use calibration::{
    CalibrationResult, FusionBreakdown, GateFailure, GateReason, TermContribution,
};
pub use identifiers::{ClusterId, Dimension, IdentifierError, MicroKey, PolicyArea, Slot};
pub use layer::{ChainChecks, LayerId, LayerScore, LayerValue};
pub use node::{NodeLevel, ScoreNode};
pub use pdt::{
    BlockKind, DetectedBlock, Header, IndicatorRow, InvestmentPlan, InvestmentRow, PdtStructure,
    PlanHorizon, Section,
};
pub use role::{Role, RoleTable};
pub use weights::{FusionWeights, InteractionSpec, InteractionTerm, WeightsSpec};

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

/// xxh3 digest of the canonical JSON form of `value`.
///
/// Maps are `BTreeMap`s throughout, so equal values always serialize to
/// equal bytes.
pub fn fingerprint_of<T: Serialize>(value: &T) -> u64 {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    xxh3_64(&bytes)
}
