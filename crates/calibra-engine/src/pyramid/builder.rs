//! Builds one aggregated node from its children. Shared by every stage.

use std::collections::BTreeMap;

use calibra_core::errors::AggregationError;
use calibra_core::types::{FusionWeights, NodeLevel, QualityBand, ScoreNode};
use tracing::debug;

use crate::classifier::QualityClassifier;
use crate::fusion;
use crate::penalty::{coefficient_of_variation, AdaptivePenalty};

/// Stage parameters for [`build_node`].
#[derive(Clone, Copy)]
pub struct StageParams<'a> {
    pub level: NodeLevel,
    pub weights: &'a FusionWeights,
    pub hard_gate_min: Option<f64>,
    /// Present only at the cluster stage.
    pub penalty: Option<&'a AdaptivePenalty>,
    pub classifier: &'a QualityClassifier,
}

/// Fuse `children` into a node at `params.level`.
///
/// `keys[i]` is the fusion key of `children[i]` (`Q3`, `DIM02`, `PA07`,
/// `CL01`). A child below `hard_gate_min` gates the node: score 0.0,
/// `Deficient`, no fusion, no penalty.
pub fn build_node(
    id: String,
    children: Vec<ScoreNode>,
    keys: &[String],
    params: StageParams<'_>,
) -> Result<ScoreNode, AggregationError> {
    let child_scores: Vec<f64> = children.iter().map(|c| c.fused_score).collect();
    let dispersion = coefficient_of_variation(&child_scores);

    if let Some(min) = params.hard_gate_min {
        if let Some(low) = children.iter().find(|c| c.fused_score < min) {
            debug!(node_id = %id, child = %low.id, value = low.fused_score, min, "stage hard gate triggered");
            return Ok(ScoreNode {
                id,
                level: params.level,
                children,
                raw_score: 0.0,
                fused_score: 0.0,
                dispersion: Some(dispersion),
                penalty: None,
                hard_gate_failed: true,
                quality_band: QualityBand::Deficient,
            });
        }
    }

    let scores: BTreeMap<String, f64> = keys.iter().cloned().zip(child_scores.iter().copied()).collect();
    let raw_score = fusion::fuse(&scores, params.weights).map_err(|source| AggregationError::Fusion {
        node_id: id.clone(),
        source,
    })?;

    let (fused_score, penalty) = match params.penalty {
        Some(p) => {
            let factor = p.factor_for(dispersion);
            if factor < 1.0 {
                debug!(node_id = %id, dispersion, penalty = factor, "adaptive penalty applied");
            }
            ((raw_score * factor).clamp(0.0, 1.0), Some(factor))
        }
        None => (raw_score, None),
    };

    Ok(ScoreNode {
        quality_band: params.classifier.classify_at(params.level, fused_score),
        id,
        level: params.level,
        children,
        raw_score,
        fused_score,
        dispersion: Some(dispersion),
        penalty,
        hard_gate_failed: false,
    })
}
