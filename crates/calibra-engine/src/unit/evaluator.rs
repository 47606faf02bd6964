//! Unit evaluator: runs the four components, the hard gates, and the
//! anti-gaming detectors over one document.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use calibra_core::config::{AggregationFunction, ResolvedConfig, UnitConfig};
use calibra_core::types::{ClassificationThresholds, PdtStructure, QualityBand};

use super::aggregate::aggregate;
use super::anti_gaming::{self, AntiGamingReport};
use super::indicators::{self, IndicatorScore};
use super::investment::{self, InvestmentScore};
use super::sections::{self, SectionsScore};
use super::structure::{self, StructureScore};

/// A unit hard gate that fired. Any gate forces the unit score to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum UnitGate {
    StructureBelowMinimum { value: f64, threshold: f64 },
    IndicatorsIncomplete { value: f64, threshold: f64 },
    InvestmentPlanAbsent,
    InvestmentRowsEmpty { value: f64, threshold: f64 },
}

/// Every intermediate value behind one unit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    pub document_id: String,
    pub structure: StructureScore,
    pub sections: SectionsScore,
    pub indicators: IndicatorScore,
    pub investment: InvestmentScore,
    pub aggregation_function: AggregationFunction,
    /// Component aggregate before the anti-gaming deduction.
    pub aggregate: f64,
    pub anti_gaming: AntiGamingReport,
    /// All triggered gates, not only the first.
    pub gates: Vec<UnitGate>,
    pub final_score: f64,
    pub quality_band: QualityBand,
}

impl UnitReport {
    pub fn s(&self) -> f64 {
        self.structure.score
    }

    pub fn m(&self) -> f64 {
        self.sections.score
    }

    pub fn i(&self) -> f64 {
        self.indicators.score
    }

    pub fn p(&self) -> f64 {
        self.investment.score
    }

    pub fn hard_gate_failed(&self) -> bool {
        !self.gates.is_empty()
    }
}

/// Scores the structural quality of a development plan.
#[derive(Debug, Clone)]
pub struct UnitEvaluator {
    config: UnitConfig,
    thresholds: ClassificationThresholds,
}

impl UnitEvaluator {
    pub fn new(config: UnitConfig, thresholds: ClassificationThresholds) -> Self {
        Self { config, thresholds }
    }

    /// Evaluator using the resolved unit settings and default thresholds.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.unit.clone(), config.classification.default)
    }

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Full evaluation of one document.
    pub fn evaluate(&self, doc: &PdtStructure) -> UnitReport {
        let _span = calibra_core::unit_span!(doc.document_id).entered();

        let structure = structure::score(doc);
        let sections = sections::score(doc, &self.config.sections);
        let indicators = indicators::score(doc, &self.config);
        let investment =
            investment::score(doc.investment_plan.as_ref(), self.config.budget_tolerance);

        let gates = self.gates(&structure, &indicators, &investment);
        let anti_gaming =
            anti_gaming::assess(doc, indicators.placeholder_ratio, &self.config.anti_gaming);

        let aggregate = aggregate(
            [structure.score, sections.score, indicators.score, investment.score],
            &self.config.component_weights,
            self.config.aggregation_function,
        );

        let final_score = if gates.is_empty() {
            (aggregate - anti_gaming.penalty).clamp(0.0, 1.0)
        } else {
            for gate in &gates {
                debug!(document_id = %doc.document_id, ?gate, "unit hard gate triggered");
            }
            0.0
        };
        let quality_band = if gates.is_empty() {
            self.thresholds.band_for(final_score)
        } else {
            QualityBand::Deficient
        };

        debug!(
            document_id = %doc.document_id,
            s = structure.score,
            m = sections.score,
            i = indicators.score,
            p = investment.score,
            penalty = anti_gaming.penalty,
            final_score,
            "unit evaluated"
        );

        UnitReport {
            document_id: doc.document_id.clone(),
            structure,
            sections,
            indicators,
            investment,
            aggregation_function: self.config.aggregation_function,
            aggregate,
            anti_gaming,
            gates,
            final_score,
            quality_band,
        }
    }

    /// Final unit score only.
    pub fn score(&self, doc: &PdtStructure) -> f64 {
        self.evaluate(doc).final_score
    }

    /// Evaluate independent documents in parallel, preserving input order.
    pub fn evaluate_many(&self, docs: &[PdtStructure]) -> Vec<UnitReport> {
        docs.par_iter().map(|doc| self.evaluate(doc)).collect()
    }

    fn gates(
        &self,
        structure: &StructureScore,
        indicators: &IndicatorScore,
        investment: &InvestmentScore,
    ) -> Vec<UnitGate> {
        let limits = &self.config.gates;
        let mut gates = Vec::new();
        if structure.score < limits.min_structure {
            gates.push(UnitGate::StructureBelowMinimum {
                value: structure.score,
                threshold: limits.min_structure,
            });
        }
        if indicators.field_completeness < limits.min_indicator_completeness {
            gates.push(UnitGate::IndicatorsIncomplete {
                value: indicators.field_completeness,
                threshold: limits.min_indicator_completeness,
            });
        }
        if !investment.present {
            gates.push(UnitGate::InvestmentPlanAbsent);
        } else if investment.nonzero_row_fraction < limits.min_nonzero_rows {
            gates.push(UnitGate::InvestmentRowsEmpty {
                value: investment.nonzero_row_fraction,
                threshold: limits.min_nonzero_rows,
            });
        }
        gates
    }
}

impl Default for UnitEvaluator {
    fn default() -> Self {
        Self::new(UnitConfig::default(), ClassificationThresholds::standard())
    }
}
