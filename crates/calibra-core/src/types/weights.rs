//! Fusion weights: linear terms plus pairwise interaction terms.
//!
//! A constructed `FusionWeights` always satisfies the normalization
//! invariant, so `fuse()` never has to re-check it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::errors::FusionError;

/// One pairwise interaction term, stored with `a < b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTerm {
    pub a: String,
    pub b: String,
    pub weight: f64,
}

/// Raw, unvalidated weight table as it appears in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsSpec {
    pub linear: BTreeMap<String, f64>,
    pub interaction: Vec<InteractionSpec>,
}

/// Raw interaction entry: `{ pair = ["@u", "@chain"], weight = 0.13 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSpec {
    pub pair: [String; 2],
    pub weight: f64,
}

impl WeightsSpec {
    pub fn linear<K: Into<String>>(entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            linear: entries.into_iter().map(|(k, w)| (k.into(), w)).collect(),
            interaction: Vec::new(),
        }
    }

    pub fn with_interaction(mut self, a: impl Into<String>, b: impl Into<String>, weight: f64) -> Self {
        self.interaction.push(InteractionSpec {
            pair: [a.into(), b.into()],
            weight,
        });
        self
    }
}

/// Validated, immutable fusion weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightsSpec", into = "WeightsSpec")]
pub struct FusionWeights {
    linear: BTreeMap<String, f64>,
    interaction: Vec<InteractionTerm>,
}

impl FusionWeights {
    /// Validate a raw table.
    ///
    /// Rejects negative or non-finite weights, self-pairs, repeated pairs,
    /// empty tables, and totals outside `1.0 ± WEIGHT_SUM_TOLERANCE`.
    pub fn new(spec: WeightsSpec) -> Result<Self, FusionError> {
        if spec.linear.is_empty() && spec.interaction.is_empty() {
            return Err(FusionError::Empty);
        }

        for (key, &w) in &spec.linear {
            if !w.is_finite() || w < 0.0 {
                return Err(FusionError::NegativeWeight {
                    key: key.clone(),
                    value: w,
                });
            }
        }

        let mut interaction: Vec<InteractionTerm> = Vec::with_capacity(spec.interaction.len());
        for InteractionSpec { pair: [x, y], weight } in spec.interaction {
            if x == y {
                return Err(FusionError::SelfInteraction { key: x });
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(FusionError::NegativeWeight {
                    key: format!("({x}, {y})"),
                    value: weight,
                });
            }
            let (a, b) = if x < y { (x, y) } else { (y, x) };
            if interaction.iter().any(|t| t.a == a && t.b == b) {
                return Err(FusionError::DuplicateInteraction { a, b });
            }
            interaction.push(InteractionTerm { a, b, weight });
        }
        interaction.sort_by(|l, r| (&l.a, &l.b).cmp(&(&r.a, &r.b)));

        let total: f64 =
            spec.linear.values().sum::<f64>() + interaction.iter().map(|t| t.weight).sum::<f64>();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(FusionError::WeightSum {
                observed: total,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(Self {
            linear: spec.linear,
            interaction,
        })
    }

    /// Validate a table that must be a plain weighted mean.
    pub fn new_linear_only(spec: WeightsSpec) -> Result<Self, FusionError> {
        if !spec.interaction.is_empty() {
            return Err(FusionError::UnexpectedInteraction {
                count: spec.interaction.len(),
            });
        }
        Self::new(spec)
    }

    /// Equal linear weights over `keys`, no interactions.
    pub fn equal<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Result<Self, FusionError> {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(FusionError::Empty);
        }
        let w = 1.0 / keys.len() as f64;
        Self::new(WeightsSpec::linear(keys.into_iter().map(|k| (k, w))))
    }

    /// Linear terms in key order.
    pub fn linear(&self) -> &BTreeMap<String, f64> {
        &self.linear
    }

    /// Interaction terms sorted by pair.
    pub fn interaction(&self) -> &[InteractionTerm] {
        &self.interaction
    }

    pub fn has_interactions(&self) -> bool {
        !self.interaction.is_empty()
    }

    /// `Σlinear + Σinteraction`.
    pub fn total(&self) -> f64 {
        self.linear.values().sum::<f64>() + self.interaction.iter().map(|t| t.weight).sum::<f64>()
    }

    /// Every key any term refers to, sorted and deduplicated.
    pub fn referenced_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .linear
            .keys()
            .map(String::as_str)
            .chain(self.interaction.iter().flat_map(|t| [t.a.as_str(), t.b.as_str()]))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

impl TryFrom<WeightsSpec> for FusionWeights {
    type Error = FusionError;

    fn try_from(spec: WeightsSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<FusionWeights> for WeightsSpec {
    fn from(weights: FusionWeights) -> Self {
        Self {
            linear: weights.linear,
            interaction: weights
                .interaction
                .into_iter()
                .map(|t| InteractionSpec {
                    pair: [t.a, t.b],
                    weight: t.weight,
                })
                .collect(),
        }
    }
}
