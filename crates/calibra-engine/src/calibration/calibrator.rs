use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use calibra_core::config::ResolvedConfig;
use calibra_core::errors::CalibrationError;
use calibra_core::traits::CalibrationContext;
use calibra_core::types::{CalibrationResult, LayerId, LayerValue, QualityBand, Role};

use super::gates;
use super::request::CalibrationRequest;
use crate::classifier::QualityClassifier;
use crate::fusion;
use crate::providers::ProviderRegistry;

/// 8-layer method calibrator.
///
/// For each method: collect the role's required layers from the registry,
/// enforce hard gates, fuse what survives, classify. Holds only immutable
/// state, so one instance serves any number of threads.
#[derive(Debug, Clone)]
pub struct Calibrator {
    config: Arc<ResolvedConfig>,
    registry: ProviderRegistry,
    classifier: QualityClassifier,
}

impl Calibrator {
    pub fn new(config: Arc<ResolvedConfig>, registry: ProviderRegistry) -> Self {
        let classifier = QualityClassifier::new(config.classification.clone());
        Self {
            config,
            registry,
            classifier,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Calibrate one method.
    ///
    /// Hard gates are not errors: a gated method gets `fused_score = 0.0` and
    /// `Deficient`. Errors are reserved for precondition violations (a
    /// provider value outside [0, 1], missing weights).
    pub fn calibrate(
        &self,
        method_id: &str,
        role: Role,
        context: &CalibrationContext<'_>,
    ) -> Result<CalibrationResult, CalibrationError> {
        let _span = calibra_core::calibrate_span!(method_id, role).entered();

        let required = self.config.calibration.roles.layers(role);
        let weights = self.config.calibration.weights.get(&role).ok_or_else(|| {
            CalibrationError::MissingWeights {
                method_id: method_id.to_string(),
                role,
            }
        })?;

        let mut layer_scores: BTreeMap<LayerId, f64> = BTreeMap::new();
        let mut gate_failures = Vec::new();

        for &layer in required {
            match self.registry.provide(layer, method_id, context) {
                Ok(value) => {
                    let score = checked_score(method_id, layer, value)?;
                    layer_scores.insert(layer, score);
                    if let Some(gate) =
                        gates::check(layer, value, &self.config.calibration.hard_gates)
                    {
                        debug!(method_id, gate_layer = %layer, value = score, "hard gate triggered");
                        gate_failures.push(gate);
                    }
                }
                Err(error) => {
                    warn!(method_id, gate_layer = %layer, %error, "layer provider failed");
                    gate_failures.push(gates::unavailable(&error));
                }
            }
        }

        let result = if gate_failures.is_empty() {
            let scores: BTreeMap<String, f64> = layer_scores
                .iter()
                .map(|(layer, score)| (layer.key().to_string(), *score))
                .collect();
            let breakdown = fusion::fuse_breakdown(&scores, weights).map_err(|source| {
                CalibrationError::Fusion {
                    method_id: method_id.to_string(),
                    source,
                }
            })?;
            CalibrationResult {
                method_id: method_id.to_string(),
                role,
                layer_scores,
                fused_score: breakdown.total,
                hard_gate_failed: false,
                quality_band: self.classifier.classify_for_role(role, breakdown.total),
                gate_failures,
                breakdown: Some(breakdown),
                config_version: self.config.version.clone(),
            }
        } else {
            CalibrationResult {
                method_id: method_id.to_string(),
                role,
                layer_scores,
                fused_score: 0.0,
                hard_gate_failed: true,
                quality_band: QualityBand::Deficient,
                gate_failures,
                breakdown: None,
                config_version: self.config.version.clone(),
            }
        };

        info!(
            method_id,
            role = %role,
            fused_score = result.fused_score,
            band = %result.quality_band,
            gated = result.hard_gate_failed,
            "calibration complete"
        );
        Ok(result)
    }

    /// Calibrate independent methods in parallel.
    ///
    /// Output order matches input order; each element succeeds or fails on
    /// its own.
    pub fn calibrate_batch(
        &self,
        requests: &[CalibrationRequest<'_>],
    ) -> Vec<Result<CalibrationResult, CalibrationError>> {
        let _span = calibra_core::calibrate_batch_span!(requests.len()).entered();
        requests
            .par_iter()
            .map(|req| self.calibrate(&req.method_id, req.role, &req.context))
            .collect()
    }
}

/// Continuous values must be finite and in [0, 1].
fn checked_score(method_id: &str, layer: LayerId, value: LayerValue) -> Result<f64, CalibrationError> {
    let score = value.score();
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(CalibrationError::LayerOutOfRange {
            method_id: method_id.to_string(),
            layer,
            value: score,
        })
    }
}
