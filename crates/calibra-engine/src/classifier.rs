//! Quality classifier: score → band, shared by both aggregation levels.

use calibra_core::config::ClassificationPolicy;
use calibra_core::types::{ClassificationThresholds, NodeLevel, QualityBand, Role};

/// Maps scores to quality bands using the configured thresholds, with
/// optional role and stage overrides.
#[derive(Debug, Clone, Default)]
pub struct QualityClassifier {
    policy: ClassificationPolicy,
}

impl QualityClassifier {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    /// Classifier that applies one set of thresholds everywhere.
    pub fn uniform(thresholds: ClassificationThresholds) -> Self {
        Self {
            policy: ClassificationPolicy {
                default: thresholds,
                ..Default::default()
            },
        }
    }

    /// Classify with the default thresholds.
    pub fn classify(&self, score: f64) -> QualityBand {
        self.policy.default.band_for(score)
    }

    /// Classify a Level A result for `role`.
    pub fn classify_for_role(&self, role: Role, score: f64) -> QualityBand {
        self.policy.for_role(role).band_for(score)
    }

    /// Classify a pyramid node at `level`.
    pub fn classify_at(&self, level: NodeLevel, score: f64) -> QualityBand {
        self.policy.for_stage(level).band_for(score)
    }

    pub fn thresholds_at(&self, level: NodeLevel) -> &ClassificationThresholds {
        self.policy.for_stage(level)
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }
}
