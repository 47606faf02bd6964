//! Unit/structural evaluator configuration.

use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::errors::ConfigError;

/// How the four unit components are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationFunction {
    #[default]
    GeometricMean,
    HarmonicMean,
    WeightedAverage,
}

impl AggregationFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::GeometricMean => "geometric_mean",
            Self::HarmonicMean => "harmonic_mean",
            Self::WeightedAverage => "weighted_average",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "geometric_mean" => Some(Self::GeometricMean),
            "harmonic_mean" => Some(Self::HarmonicMean),
            "weighted_average" => Some(Self::WeightedAverage),
            _ => None,
        }
    }
}

/// Weights of the S / M / I / P components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub structure: f64,
    pub sections: f64,
    pub indicators: f64,
    pub investment: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            structure: 0.25,
            sections: 0.25,
            indicators: 0.25,
            investment: 0.25,
        }
    }
}

impl ComponentWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [self.structure, self.sections, self.indicators, self.investment]
    }
}

/// A section the plan must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequirement {
    pub name: String,
    /// Token count at which the section counts as complete.
    pub min_tokens: usize,
    /// Critical sections weigh twice as much as regular ones.
    #[serde(default)]
    pub critical: bool,
}

impl SectionRequirement {
    pub fn new(name: &str, min_tokens: usize, critical: bool) -> Self {
        Self {
            name: name.to_string(),
            min_tokens,
            critical,
        }
    }
}

/// Thresholds of the four unit hard gates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitGateConfig {
    /// `S` below this zeroes the unit score.
    pub min_structure: f64,
    /// Indicator field completeness below this zeroes the unit score.
    pub min_indicator_completeness: f64,
    /// Nonzero investment-row fraction below this zeroes the unit score.
    pub min_nonzero_rows: f64,
}

impl Default for UnitGateConfig {
    fn default() -> Self {
        Self {
            min_structure: 0.5,
            min_indicator_completeness: 0.7,
            min_nonzero_rows: 0.7,
        }
    }
}

/// Anti-gaming detector thresholds and deductions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntiGamingConfig {
    /// Placeholder-value ratio above this triggers a deduction.
    pub max_placeholder_ratio: f64,
    /// Unique-paragraph ratio below this triggers a deduction.
    pub min_unique_ratio: f64,
    /// Numeric-token density below this triggers a deduction.
    pub min_numeric_density: f64,
    /// Deduction per triggered detector.
    pub deduction: f64,
    /// Maximum total deduction.
    pub cap: f64,
}

impl Default for AntiGamingConfig {
    fn default() -> Self {
        Self {
            max_placeholder_ratio: 0.10,
            min_unique_ratio: 0.50,
            min_numeric_density: 0.02,
            deduction: 0.15,
            cap: 0.30,
        }
    }
}

/// Configuration for the unit/structural evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub aggregation_function: AggregationFunction,
    pub component_weights: ComponentWeights,
    pub sections: Vec<SectionRequirement>,
    /// Cell values treated as placeholders (case-insensitive, trimmed).
    pub placeholders: Vec<String>,
    /// Multiplier on the placeholder share subtracted from field completeness.
    pub placeholder_penalty_weight: f64,
    /// Relative tolerance when reconciling budget sub-totals.
    pub budget_tolerance: f64,
    pub gates: UnitGateConfig,
    pub anti_gaming: AntiGamingConfig,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            aggregation_function: AggregationFunction::default(),
            component_weights: ComponentWeights::default(),
            sections: default_sections(),
            placeholders: default_placeholders(),
            placeholder_penalty_weight: 0.5,
            budget_tolerance: 0.01,
            gates: UnitGateConfig::default(),
            anti_gaming: AntiGamingConfig::default(),
        }
    }
}

fn default_sections() -> Vec<SectionRequirement> {
    vec![
        SectionRequirement::new("diagnostico", 500, true),
        SectionRequirement::new("vision", 50, false),
        SectionRequirement::new("objetivos_estrategicos", 200, true),
        SectionRequirement::new("programas", 300, true),
        SectionRequirement::new("financiamiento", 150, false),
        SectionRequirement::new("seguimiento_evaluacion", 150, false),
    ]
}

fn default_placeholders() -> Vec<String> {
    [
        "n/a", "na", "n.a.", "tbd", "por definir", "pendiente", "xxx", "s/d", "sin dato", "-",
        "?", "0000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl UnitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.component_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::validation(
                "unit.component_weights",
                "weights must be finite and non-negative",
            ));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::validation(
                "unit.component_weights",
                format!("weights sum to {total}, expected 1.0"),
            ));
        }
        if self.sections.is_empty() {
            return Err(ConfigError::validation(
                "unit.sections",
                "at least one mandatory section is required",
            ));
        }
        if let Some(bad) = self.sections.iter().find(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::validation(
                "unit.sections",
                format!("section with min_tokens {} has an empty name", bad.min_tokens),
            ));
        }
        let unit_interval = [
            ("unit.gates.min_structure", self.gates.min_structure),
            (
                "unit.gates.min_indicator_completeness",
                self.gates.min_indicator_completeness,
            ),
            ("unit.gates.min_nonzero_rows", self.gates.min_nonzero_rows),
            ("unit.anti_gaming.max_placeholder_ratio", self.anti_gaming.max_placeholder_ratio),
            ("unit.anti_gaming.min_unique_ratio", self.anti_gaming.min_unique_ratio),
            ("unit.anti_gaming.min_numeric_density", self.anti_gaming.min_numeric_density),
            ("unit.anti_gaming.deduction", self.anti_gaming.deduction),
            ("unit.anti_gaming.cap", self.anti_gaming.cap),
            ("unit.budget_tolerance", self.budget_tolerance),
        ];
        for (field, value) in unit_interval {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::validation(field, "must be between 0.0 and 1.0"));
            }
        }
        if !self.placeholder_penalty_weight.is_finite() || self.placeholder_penalty_weight < 0.0 {
            return Err(ConfigError::validation(
                "unit.placeholder_penalty_weight",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Whether a raw cell value is a placeholder.
    pub fn is_placeholder(&self, value: &str) -> bool {
        let v = value.trim();
        self.placeholders.iter().any(|p| p.trim().eq_ignore_ascii_case(v))
    }
}
