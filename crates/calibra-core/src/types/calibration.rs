//! Level A artifacts: calibration results, gate records, fusion breakdowns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LayerId, LayerScore, QualityBand, Role};

/// Why a layer vetoed a calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    /// Continuous layer below its configured threshold.
    BelowThreshold,
    /// Zero-tolerance binary layer reported failure.
    BinaryFailed,
    /// Provider missing or failed; treated as a veto.
    LayerUnavailable,
}

/// One triggered hard gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateFailure {
    pub layer: LayerId,
    pub reason: GateReason,
    /// Observed value, absent when the layer was unavailable.
    pub value: Option<f64>,
    /// Threshold the value was compared against, when one applies.
    pub threshold: Option<f64>,
    /// Provider error message for unavailable layers.
    pub detail: Option<String>,
}

/// Contribution of one fusion term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    /// `@b` for linear terms, `@chain×@u` for interactions (pair keys sorted).
    pub term: String,
    pub weight: f64,
    /// Score (linear) or `min` of the pair (interaction).
    pub input: f64,
    pub contribution: f64,
}

/// Per-term breakdown of one `fuse()` evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionBreakdown {
    pub linear: Vec<TermContribution>,
    pub interaction: Vec<TermContribution>,
    pub total: f64,
}

impl FusionBreakdown {
    pub fn linear_total(&self) -> f64 {
        self.linear.iter().map(|t| t.contribution).sum()
    }

    pub fn interaction_total(&self) -> f64 {
        self.interaction.iter().map(|t| t.contribution).sum()
    }
}

/// Outcome of calibrating one method. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub method_id: String,
    pub role: Role,
    /// Normalized value of every required layer that produced one.
    pub layer_scores: BTreeMap<LayerId, f64>,
    pub fused_score: f64,
    pub hard_gate_failed: bool,
    pub quality_band: QualityBand,
    /// Triggered gates, in required-layer order.
    pub gate_failures: Vec<GateFailure>,
    /// Absent when a hard gate short-circuited fusion.
    pub breakdown: Option<FusionBreakdown>,
    pub config_version: String,
}

impl CalibrationResult {
    /// Stable 64-bit digest of the serialized result.
    pub fn fingerprint(&self) -> u64 {
        super::fingerprint_of(self)
    }

    pub fn passed_gates(&self) -> bool {
        !self.hard_gate_failed
    }

    /// Per-layer records, flagging the layers whose value triggered a gate.
    pub fn scores(&self) -> Vec<LayerScore> {
        self.layer_scores
            .iter()
            .map(|(axis, value)| LayerScore {
                axis: *axis,
                value: *value,
                is_hard_gate: self.gate_failures.iter().any(|g| g.layer == *axis),
            })
            .collect()
    }
}
