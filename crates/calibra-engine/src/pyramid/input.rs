//! Micro-score validation. Runs to completion before any node is scored.

use std::collections::BTreeMap;

use calibra_core::errors::AggregationError;
use calibra_core::types::{MicroKey, NodeLevel};

/// Exactly the 300 micro-scores, unique, in range, keyed canonically.
#[derive(Debug, Clone, PartialEq)]
pub struct MicroScores(BTreeMap<MicroKey, f64>);

impl MicroScores {
    /// Validate raw `(key, score)` pairs.
    ///
    /// Checks, in order: leaf count, key syntax, score range, duplicates.
    pub fn parse<K: AsRef<str>>(leaves: &[(K, f64)]) -> Result<Self, AggregationError> {
        let expected = NodeLevel::Micro.expected_count();
        if leaves.len() != expected {
            return Err(AggregationError::Cardinality {
                level: NodeLevel::Micro,
                expected,
                observed: leaves.len(),
            });
        }

        let mut scores = BTreeMap::new();
        for (raw_key, score) in leaves {
            let raw_key = raw_key.as_ref();
            let key: MicroKey = raw_key.parse().map_err(|e| AggregationError::InvalidKey {
                key: raw_key.to_string(),
                message: format!("{e}"),
            })?;
            if !score.is_finite() || !(0.0..=1.0).contains(score) {
                return Err(AggregationError::OutOfRange {
                    key: key.to_string(),
                    value: *score,
                });
            }
            if scores.insert(key, *score).is_some() {
                return Err(AggregationError::DuplicateLeaf {
                    key: key.to_string(),
                });
            }
        }
        Ok(Self(scores))
    }

    /// Validate an already-keyed map. Only count and range can fail.
    pub fn from_map(scores: BTreeMap<MicroKey, f64>) -> Result<Self, AggregationError> {
        let leaves: Vec<(String, f64)> = scores.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Self::parse(&leaves)
    }

    pub fn get(&self, key: &MicroKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Leaves in canonical (area, dimension, slot) order.
    pub fn iter(&self) -> impl Iterator<Item = (&MicroKey, &f64)> {
        self.0.iter()
    }
}
