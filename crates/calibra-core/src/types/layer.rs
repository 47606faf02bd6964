//! Quality layers (axes) and the values providers report for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identifiers::IdentifierError;

/// One independently scored quality axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// Intrinsic quality of the method itself.
    #[serde(rename = "@b")]
    Base,
    /// Data-flow integrity. Strictly binary.
    #[serde(rename = "@chain")]
    Chain,
    /// Fit to the question being answered.
    #[serde(rename = "@q")]
    Question,
    /// Fit to the analytical dimension.
    #[serde(rename = "@d")]
    Dimension,
    /// Fit to the policy area.
    #[serde(rename = "@p")]
    Policy,
    /// Contract compliance.
    #[serde(rename = "@C")]
    Contract,
    /// Unit / document structural quality.
    #[serde(rename = "@u")]
    Unit,
    /// Governance / meta maturity.
    #[serde(rename = "@m")]
    Meta,
}

impl LayerId {
    pub const ALL: [LayerId; 8] = [
        Self::Base,
        Self::Chain,
        Self::Question,
        Self::Dimension,
        Self::Policy,
        Self::Contract,
        Self::Unit,
        Self::Meta,
    ];

    /// Stable key used in weight tables and artifacts.
    pub fn key(self) -> &'static str {
        match self {
            Self::Base => "@b",
            Self::Chain => "@chain",
            Self::Question => "@q",
            Self::Dimension => "@d",
            Self::Policy => "@p",
            Self::Contract => "@C",
            Self::Unit => "@u",
            Self::Meta => "@m",
        }
    }

    /// Zero-tolerance layers: any value other than 1.0 is a veto.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::Chain)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LayerId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|layer| layer.key() == s.trim())
            .ok_or_else(|| IdentifierError {
                input: s.to_string(),
                expected: "one of @b, @chain, @q, @d, @p, @C, @u, @m",
            })
    }
}

/// What a provider reports for one layer.
///
/// Continuous layers report a value in [0, 1]; binary layers report pass/fail
/// with no partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LayerValue {
    Continuous(f64),
    Binary(bool),
}

impl LayerValue {
    /// Normalized value entering the Fusion Core.
    pub fn score(self) -> f64 {
        match self {
            Self::Continuous(v) => v,
            Self::Binary(true) => 1.0,
            Self::Binary(false) => 0.0,
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// A layer value after gating. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerScore {
    pub axis: LayerId,
    pub value: f64,
    pub is_hard_gate: bool,
}

/// The five independent checks behind the `@chain` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainChecks {
    pub dependency_resolution: bool,
    pub schema_validation: bool,
    pub provenance_chain: bool,
    pub information_preservation: bool,
    pub temporal_ordering: bool,
}

impl ChainChecks {
    /// Every check passing.
    pub fn all_passed() -> Self {
        Self {
            dependency_resolution: true,
            schema_validation: true,
            provenance_chain: true,
            information_preservation: true,
            temporal_ordering: true,
        }
    }

    /// Conjunction of the five checks.
    pub fn passed(&self) -> bool {
        self.dependency_resolution
            && self.schema_validation
            && self.provenance_chain
            && self.information_preservation
            && self.temporal_ordering
    }

    /// Names of the checks that failed, in declaration order.
    pub fn failures(&self) -> Vec<&'static str> {
        [
            ("dependency_resolution", self.dependency_resolution),
            ("schema_validation", self.schema_validation),
            ("provenance_chain", self.provenance_chain),
            ("information_preservation", self.information_preservation),
            ("temporal_ordering", self.temporal_ordering),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}
