//! Layer hard gates, evaluated before fusion.

use std::collections::BTreeMap;

use calibra_core::errors::ProviderError;
use calibra_core::types::{GateFailure, GateReason, LayerId, LayerValue};

/// Check one reported layer value against its gate, if any.
///
/// Binary layers pass only at exactly 1.0. Continuous layers fail when
/// strictly below their configured threshold.
pub fn check(layer: LayerId, value: LayerValue, thresholds: &BTreeMap<LayerId, f64>) -> Option<GateFailure> {
    let score = value.score();
    if layer.is_binary() || value.is_binary() {
        if score == 1.0 {
            return None;
        }
        return Some(GateFailure {
            layer,
            reason: GateReason::BinaryFailed,
            value: Some(score),
            threshold: None,
            detail: None,
        });
    }
    let threshold = *thresholds.get(&layer)?;
    (score < threshold).then(|| GateFailure {
        layer,
        reason: GateReason::BelowThreshold,
        value: Some(score),
        threshold: Some(threshold),
        detail: None,
    })
}

/// Gate record for a layer whose provider could not answer.
pub fn unavailable(error: &ProviderError) -> GateFailure {
    GateFailure {
        layer: error.layer(),
        reason: GateReason::LayerUnavailable,
        value: None,
        threshold: None,
        detail: Some(error.to_string()),
    }
}
