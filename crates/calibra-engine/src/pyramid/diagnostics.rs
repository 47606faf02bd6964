//! Macro-level diagnostics computed alongside the holistic score.

use serde::{Deserialize, Serialize};

use calibra_core::types::{QualityBand, ScoreNode};

use crate::penalty::coefficient_of_variation;

/// A policy area classified `Deficient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemicGap {
    pub area: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroDiagnostics {
    /// `1 − CV` of the cluster scores, clamped to [0, 1].
    pub cross_cutting_coherence: f64,
    /// Deficient areas, sorted by id.
    pub systemic_gaps: Vec<SystemicGap>,
    /// Share of areas at or above the `good` threshold.
    pub strategic_alignment: f64,
}

pub fn compute(clusters: &[&ScoreNode], areas: &[&ScoreNode], good_threshold: f64) -> MacroDiagnostics {
    let cluster_scores: Vec<f64> = clusters.iter().map(|c| c.fused_score).collect();
    let cross_cutting_coherence = (1.0 - coefficient_of_variation(&cluster_scores)).clamp(0.0, 1.0);

    let mut systemic_gaps: Vec<SystemicGap> = areas
        .iter()
        .filter(|a| a.quality_band == QualityBand::Deficient)
        .map(|a| SystemicGap {
            area: a.id.clone(),
            score: a.fused_score,
        })
        .collect();
    systemic_gaps.sort_by(|l, r| l.area.cmp(&r.area));

    let strategic_alignment = if areas.is_empty() {
        0.0
    } else {
        let aligned = areas.iter().filter(|a| a.fused_score >= good_threshold).count();
        aligned as f64 / areas.len() as f64
    };

    MacroDiagnostics {
        cross_cutting_coherence,
        systemic_gaps,
        strategic_alignment,
    }
}
