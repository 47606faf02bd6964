//! Quality-band threshold configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{ClassificationThresholds, NodeLevel, Role};

/// Named threshold preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    /// `0.85 / 0.70 / 0.30`
    #[default]
    Standard,
    /// `0.70 / 0.55 / 0.30`
    Lenient,
}

impl ThresholdPreset {
    pub fn thresholds(self) -> ClassificationThresholds {
        match self {
            Self::Standard => ClassificationThresholds::standard(),
            Self::Lenient => ClassificationThresholds::lenient(),
        }
    }
}

/// Classification thresholds. Explicit values win over the preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub preset: ThresholdPreset,
    pub excellent: Option<f64>,
    pub good: Option<f64>,
    pub acceptable: Option<f64>,
    /// Per-role overrides for Level A results, keyed by role name.
    pub roles: BTreeMap<String, ClassificationThresholds>,
    /// Per-stage overrides for pyramid nodes, keyed by level name.
    pub stages: BTreeMap<String, ClassificationThresholds>,
}

/// Validated thresholds with their override tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationPolicy {
    pub default: ClassificationThresholds,
    pub roles: BTreeMap<Role, ClassificationThresholds>,
    pub stages: BTreeMap<NodeLevel, ClassificationThresholds>,
}

impl ClassificationPolicy {
    pub fn for_role(&self, role: Role) -> &ClassificationThresholds {
        self.roles.get(&role).unwrap_or(&self.default)
    }

    pub fn for_stage(&self, level: NodeLevel) -> &ClassificationThresholds {
        self.stages.get(&level).unwrap_or(&self.default)
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            default: ClassificationThresholds::standard(),
            roles: BTreeMap::new(),
            stages: BTreeMap::new(),
        }
    }
}

impl ClassificationConfig {
    /// Preset values with any explicit threshold applied on top.
    pub fn effective_default(&self) -> ClassificationThresholds {
        let mut t = self.preset.thresholds();
        if let Some(v) = self.excellent {
            t.excellent = v;
        }
        if let Some(v) = self.good {
            t.good = v;
        }
        if let Some(v) = self.acceptable {
            t.acceptable = v;
        }
        t
    }

    pub(crate) fn resolve(&self) -> Result<ClassificationPolicy, ConfigError> {
        let default = self.effective_default();
        default.validate("classification")?;

        let mut roles = BTreeMap::new();
        for (key, thresholds) in &self.roles {
            let field = format!("classification.roles.{key}");
            let role = key
                .parse::<Role>()
                .map_err(|e| ConfigError::validation(&field, e.to_string()))?;
            thresholds.validate(&field)?;
            roles.insert(role, *thresholds);
        }

        let mut stages = BTreeMap::new();
        for (key, thresholds) in &self.stages {
            let field = format!("classification.stages.{key}");
            let level = NodeLevel::ALL
                .iter()
                .copied()
                .find(|l| l.name() == key.trim().to_ascii_lowercase())
                .ok_or_else(|| ConfigError::validation(&field, "unknown pyramid level"))?;
            thresholds.validate(&field)?;
            stages.insert(level, *thresholds);
        }

        Ok(ClassificationPolicy {
            default,
            roles,
            stages,
        })
    }
}
