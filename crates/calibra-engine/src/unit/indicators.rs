//! `I`: indicator table completeness, cross-references, temporal logic.

use serde::{Deserialize, Serialize};

use calibra_core::config::UnitConfig;
use calibra_core::types::{IndicatorRow, PdtStructure};

/// Required fields per indicator row.
pub const REQUIRED_FIELDS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub indicator_count: usize,
    /// Present share minus the weighted placeholder share, clamped.
    pub field_completeness: f64,
    /// Placeholder fields over all required fields.
    pub placeholder_ratio: f64,
    pub cross_reference_validity: f64,
    pub temporal_consistency: f64,
    /// `0.4·completeness + 0.3·cross_reference + 0.3·temporal`
    pub score: f64,
}

impl IndicatorScore {
    fn empty() -> Self {
        Self {
            indicator_count: 0,
            field_completeness: 0.0,
            placeholder_ratio: 0.0,
            cross_reference_validity: 0.0,
            temporal_consistency: 0.0,
            score: 0.0,
        }
    }
}

pub fn score(doc: &PdtStructure, config: &UnitConfig) -> IndicatorScore {
    let rows = &doc.indicators;
    if rows.is_empty() {
        return IndicatorScore::empty();
    }

    let mut present = 0usize;
    let mut placeholders = 0usize;
    for row in rows {
        let (p, ph) = field_counts(row, config);
        present += p;
        placeholders += ph;
    }
    let total_fields = (rows.len() * REQUIRED_FIELDS) as f64;
    let present_share = present as f64 / total_fields;
    let placeholder_ratio = placeholders as f64 / total_fields;
    let field_completeness =
        (present_share - config.placeholder_penalty_weight * placeholder_ratio).clamp(0.0, 1.0);

    let n = rows.len() as f64;
    let cross_referenced = rows
        .iter()
        .filter(|row| references_declared_program(row, doc))
        .count();
    let cross_reference_validity = cross_referenced as f64 / n;

    let consistent = rows.iter().filter(|row| temporally_consistent(row, doc)).count();
    let temporal_consistency = consistent as f64 / n;

    IndicatorScore {
        indicator_count: rows.len(),
        field_completeness,
        placeholder_ratio,
        cross_reference_validity,
        temporal_consistency,
        score: 0.4 * field_completeness + 0.3 * cross_reference_validity + 0.3 * temporal_consistency,
    }
}

/// `(present, placeholder)` counts over the seven required fields.
fn field_counts(row: &IndicatorRow, config: &UnitConfig) -> (usize, usize) {
    let mut present = 0;
    let mut placeholders = 0;
    for text in [&row.name, &row.baseline, &row.target, &row.unit, &row.source] {
        if let Some(value) = text.as_deref().filter(|v| !v.trim().is_empty()) {
            present += 1;
            if config.is_placeholder(value) {
                placeholders += 1;
            }
        }
    }
    present += usize::from(row.baseline_year.is_some());
    present += usize::from(row.target_year.is_some());
    (present, placeholders)
}

fn references_declared_program(row: &IndicatorRow, doc: &PdtStructure) -> bool {
    match (row.program.as_deref(), doc.investment_plan.as_ref()) {
        (Some(program), Some(plan)) if !program.trim().is_empty() => plan.has_program(program),
        _ => false,
    }
}

/// Both years present, baseline not after target, target inside the horizon
/// when one is declared.
fn temporally_consistent(row: &IndicatorRow, doc: &PdtStructure) -> bool {
    match (row.baseline_year, row.target_year) {
        (Some(baseline), Some(target)) if baseline <= target => {
            doc.horizon.map_or(true, |h| h.contains(target))
        }
        _ => false,
    }
}
