//! Top-level engine configuration with file and environment resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::aggregation_config::ResolvedAggregation;
use super::calibration_config::ResolvedCalibration;
use super::classification_config::ClassificationPolicy;
use super::{
    AggregationConfig, AggregationFunction, CalibrationConfig, ClassificationConfig, UnitConfig,
};
use crate::constants::{CONFIG_FILE_NAME, DEFAULT_CONFIG_VERSION};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CALIBRA_*`)
/// 2. Config file (`calibra.toml`)
/// 3. Compiled defaults
///
/// Every section is `#[serde(default)]`, so a file only needs to name what
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version tag recorded on every produced artifact.
    pub version: String,
    pub calibration: CalibrationConfig,
    pub classification: ClassificationConfig,
    pub aggregation: AggregationConfig,
    pub unit: UnitConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            calibration: CalibrationConfig::default(),
            classification: ClassificationConfig::default(),
            aggregation: AggregationConfig::default(),
            unit: UnitConfig::default(),
        }
    }
}

/// Immutable runtime configuration. Only obtainable through validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub version: String,
    pub calibration: ResolvedCalibration,
    pub classification: ClassificationPolicy,
    pub aggregation: ResolvedAggregation,
    pub unit: UnitConfig,
}

impl EngineConfig {
    /// Load a config file, apply environment overrides, validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let _span = crate::config_span!(path.display()).entered();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: EngineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(version = %config.version, "configuration loaded");
        Ok(config)
    }

    /// Load `calibra.toml` from `root` when present, otherwise compiled
    /// defaults. Environment overrides and validation apply either way.
    pub fn load_from_dir(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Self::load(&path);
        }
        tracing::debug!(root = %root.display(), "no {CONFIG_FILE_NAME}, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string. Does not validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env_f64("CALIBRA_CLASSIFY_EXCELLENT") {
            self.classification.excellent = Some(v);
        }
        if let Some(v) = env_f64("CALIBRA_CLASSIFY_GOOD") {
            self.classification.good = Some(v);
        }
        if let Some(v) = env_f64("CALIBRA_CLASSIFY_ACCEPTABLE") {
            self.classification.acceptable = Some(v);
        }
        if let Ok(v) = std::env::var("CALIBRA_CONFIG_VERSION") {
            if !v.trim().is_empty() {
                self.version = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("CALIBRA_UNIT_AGGREGATION") {
            if let Some(f) = AggregationFunction::parse(&v) {
                self.unit.aggregation_function = f;
            }
        }
    }

    /// Check every section without keeping the result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve().map(|_| ())
    }

    /// Validate and build the immutable runtime configuration.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::validation("version", "must not be empty"));
        }
        let calibration = self.calibration.resolve()?;
        let classification = self.classification.resolve()?;
        let aggregation = self.aggregation.resolve()?;
        self.unit.validate()?;
        Ok(ResolvedConfig {
            version: self.version.clone(),
            calibration,
            classification,
            aggregation,
            unit: self.unit.clone(),
        })
    }
}

impl ResolvedConfig {
    /// Load, override, and resolve in one step.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        EngineConfig::load(path)?.resolve()
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<f64>().ok())
}
