//! Method roles and the static role → required-layers table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identifiers::IdentifierError;
use super::LayerId;
use crate::constants::ALLOWED_LAYER_SET_SIZES;
use crate::errors::ConfigError;

/// Declared role of an analytical method. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Utility,
    Ingest,
    Structure,
    Extract,
    Processor,
    Analyzer,
    Score,
    Orchestrator,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Self::Utility,
        Self::Ingest,
        Self::Structure,
        Self::Extract,
        Self::Processor,
        Self::Analyzer,
        Self::Score,
        Self::Orchestrator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Utility => "utility",
            Self::Ingest => "ingest",
            Self::Structure => "structure",
            Self::Extract => "extract",
            Self::Processor => "processor",
            Self::Analyzer => "analyzer",
            Self::Score => "score",
            Self::Orchestrator => "orchestrator",
        }
    }

    /// Compiled-in required layers for this role.
    pub fn default_layers(self) -> Vec<LayerId> {
        use LayerId::*;
        match self {
            Self::Utility => vec![Base, Chain, Meta],
            Self::Ingest | Self::Structure | Self::Extract => vec![Base, Chain, Unit, Meta],
            Self::Processor => vec![Base, Chain, Unit, Contract, Question, Meta],
            Self::Analyzer | Self::Score | Self::Orchestrator => LayerId::ALL.to_vec(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.name() == needle)
            .ok_or_else(|| IdentifierError {
                input: s.to_string(),
                expected: "a known method role",
            })
    }
}

/// Validated role → ordered required-layer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleTable {
    layers: BTreeMap<Role, Vec<LayerId>>,
}

impl RoleTable {
    /// Build from compiled defaults plus per-role overrides.
    pub fn with_overrides(overrides: &BTreeMap<Role, Vec<LayerId>>) -> Result<Self, ConfigError> {
        let mut layers = BTreeMap::new();
        for role in Role::ALL {
            let set = overrides
                .get(&role)
                .cloned()
                .unwrap_or_else(|| role.default_layers());
            Self::validate_set(role, &set)?;
            layers.insert(role, set);
        }
        Ok(Self { layers })
    }

    fn validate_set(role: Role, set: &[LayerId]) -> Result<(), ConfigError> {
        let field = format!("calibration.layers.{role}");
        if !ALLOWED_LAYER_SET_SIZES.contains(&set.len()) {
            return Err(ConfigError::validation(
                field,
                format!("layer set has {} layers, allowed sizes are 3, 4, 6, 8", set.len()),
            ));
        }
        for (i, layer) in set.iter().enumerate() {
            if set[..i].contains(layer) {
                return Err(ConfigError::validation(field, format!("layer {layer} listed twice")));
            }
        }
        for required in [LayerId::Base, LayerId::Chain] {
            if !set.contains(&required) {
                return Err(ConfigError::validation(
                    field,
                    format!("layer {required} is mandatory for every role"),
                ));
            }
        }
        Ok(())
    }

    /// Required layers for `role`, in configured order.
    pub fn layers(&self, role: Role) -> &[LayerId] {
        self.layers.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self {
            layers: Role::ALL.iter().map(|r| (*r, r.default_layers())).collect(),
        }
    }
}
