//! Level A (method calibration) configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_LAYER_GATE, DEFAULT_CONTRACT_LAYER_GATE};
use crate::errors::ConfigError;
use crate::types::{FusionWeights, LayerId, Role, RoleTable, WeightsSpec};

/// Role layer sets, per-role fusion weights, and per-layer gate thresholds.
///
/// Maps are keyed by the string forms (`"analyzer"`, `"@b"`) so they read
/// naturally as TOML tables. Roles absent from `layers`/`weights` keep their
/// compiled defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub layers: BTreeMap<String, Vec<String>>,
    pub weights: BTreeMap<String, WeightsSpec>,
    /// Continuous layers vetoing the calibration when below the value.
    /// Entries are merged over the compiled `@b`/`@C` gates, so a gate is
    /// relaxed by setting it to 0.0, never by leaving it out.
    pub hard_gates: BTreeMap<String, f64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        let mut hard_gates = BTreeMap::new();
        hard_gates.insert(LayerId::Base.key().to_string(), DEFAULT_BASE_LAYER_GATE);
        hard_gates.insert(LayerId::Contract.key().to_string(), DEFAULT_CONTRACT_LAYER_GATE);
        Self {
            layers: BTreeMap::new(),
            weights: BTreeMap::new(),
            hard_gates,
        }
    }
}

/// Validated Level A settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCalibration {
    pub roles: RoleTable,
    pub weights: BTreeMap<Role, FusionWeights>,
    pub hard_gates: BTreeMap<LayerId, f64>,
}

impl CalibrationConfig {
    pub(crate) fn resolve(&self) -> Result<ResolvedCalibration, ConfigError> {
        let mut layer_overrides = BTreeMap::new();
        for (role_key, layers) in &self.layers {
            let role = parse_role("calibration.layers", role_key)?;
            let parsed = layers
                .iter()
                .map(|l| {
                    l.parse::<LayerId>().map_err(|e| {
                        ConfigError::validation(format!("calibration.layers.{role}"), e.to_string())
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer_overrides.insert(role, parsed);
        }
        let roles = RoleTable::with_overrides(&layer_overrides)?;

        let mut weight_overrides = BTreeMap::new();
        for (role_key, spec) in &self.weights {
            let role = parse_role("calibration.weights", role_key)?;
            weight_overrides.insert(role, spec.clone());
        }

        let mut weights = BTreeMap::new();
        for role in Role::ALL {
            let scope = format!("calibration.weights.{role}");
            let spec = weight_overrides
                .remove(&role)
                .unwrap_or_else(|| default_role_weights(role));
            let fw = FusionWeights::new(spec).map_err(|e| ConfigError::weights(&scope, e))?;
            let allowed = roles.layers(role);
            for key in fw.referenced_keys() {
                let in_set = key
                    .parse::<LayerId>()
                    .map(|layer| allowed.contains(&layer))
                    .unwrap_or(false);
                if !in_set {
                    return Err(ConfigError::validation(
                        scope,
                        format!("weight key {key} is not a required layer of role {role}"),
                    ));
                }
            }
            weights.insert(role, fw);
        }

        let mut hard_gates = default_hard_gates();
        for (layer_key, &threshold) in &self.hard_gates {
            let field = format!("calibration.hard_gates.{layer_key}");
            let layer = layer_key
                .parse::<LayerId>()
                .map_err(|e| ConfigError::validation(&field, e.to_string()))?;
            if layer.is_binary() {
                return Err(ConfigError::validation(
                    field,
                    "binary layers always gate at failure, a threshold does not apply",
                ));
            }
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::validation(field, "threshold must lie in [0, 1]"));
            }
            hard_gates.insert(layer, threshold);
        }

        Ok(ResolvedCalibration {
            roles,
            weights,
            hard_gates,
        })
    }
}

/// Gates applied whatever the file says.
fn default_hard_gates() -> BTreeMap<LayerId, f64> {
    BTreeMap::from([
        (LayerId::Base, DEFAULT_BASE_LAYER_GATE),
        (LayerId::Contract, DEFAULT_CONTRACT_LAYER_GATE),
    ])
}

fn parse_role(section: &str, key: &str) -> Result<Role, ConfigError> {
    key.parse::<Role>()
        .map_err(|e| ConfigError::validation(format!("{section}.{key}"), e.to_string()))
}

/// Compiled-in fusion weights for a role's default layer set.
pub fn default_role_weights(role: Role) -> WeightsSpec {
    match role {
        Role::Analyzer | Role::Score | Role::Orchestrator => WeightsSpec::linear([
            ("@b", 0.17),
            ("@chain", 0.13),
            ("@q", 0.08),
            ("@d", 0.07),
            ("@p", 0.06),
            ("@C", 0.08),
            ("@u", 0.04),
            ("@m", 0.04),
        ])
        .with_interaction("@u", "@chain", 0.13)
        .with_interaction("@chain", "@C", 0.10)
        .with_interaction("@q", "@d", 0.10),
        Role::Processor => WeightsSpec::linear([
            ("@b", 0.22),
            ("@chain", 0.16),
            ("@u", 0.10),
            ("@C", 0.12),
            ("@q", 0.10),
            ("@m", 0.08),
        ])
        .with_interaction("@u", "@chain", 0.12)
        .with_interaction("@chain", "@C", 0.10),
        Role::Ingest | Role::Structure | Role::Extract => {
            WeightsSpec::linear([("@b", 0.30), ("@chain", 0.20), ("@u", 0.20), ("@m", 0.10)])
                .with_interaction("@u", "@chain", 0.20)
        }
        Role::Utility => WeightsSpec::linear([("@b", 0.45), ("@chain", 0.25), ("@m", 0.15)])
            .with_interaction("@b", "@chain", 0.15),
    }
}
