//! Four-band qualitative labels and the thresholds that produce them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACCEPTABLE_THRESHOLD, DEFAULT_EXCELLENT_THRESHOLD, DEFAULT_GOOD_THRESHOLD,
};
use crate::errors::ConfigError;

/// Ordered quality label. Derived from a score, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityBand {
    #[serde(alias = "INSUFICIENTE")]
    Deficient,
    #[serde(alias = "ACEPTABLE")]
    Acceptable,
    #[serde(alias = "BUENO")]
    Good,
    #[serde(alias = "EXCELENTE")]
    Excellent,
}

impl QualityBand {
    pub fn name(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Acceptable => "ACCEPTABLE",
            Self::Deficient => "DEFICIENT",
        }
    }

    /// Label used by the Spanish-language reports.
    pub fn spanish_label(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELENTE",
            Self::Good => "BUENO",
            Self::Acceptable => "ACEPTABLE",
            Self::Deficient => "INSUFICIENTE",
        }
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower bounds of the three upper bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
}

impl ClassificationThresholds {
    /// `0.85 / 0.70 / 0.30`.
    pub fn standard() -> Self {
        Self {
            excellent: DEFAULT_EXCELLENT_THRESHOLD,
            good: DEFAULT_GOOD_THRESHOLD,
            acceptable: DEFAULT_ACCEPTABLE_THRESHOLD,
        }
    }

    /// `0.70 / 0.55 / 0.30`, used where excellence starts at 0.70.
    pub fn lenient() -> Self {
        Self {
            excellent: 0.70,
            good: 0.55,
            acceptable: 0.30,
        }
    }

    /// Require `0 ≤ acceptable ≤ good ≤ excellent ≤ 1`.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let all = [self.acceptable, self.good, self.excellent];
        if all.iter().any(|t| !t.is_finite() || !(0.0..=1.0).contains(t)) {
            return Err(ConfigError::validation(field, "thresholds must lie in [0, 1]"));
        }
        if !(self.acceptable <= self.good && self.good <= self.excellent) {
            return Err(ConfigError::validation(
                field,
                format!(
                    "thresholds must be ordered acceptable ≤ good ≤ excellent, got {} / {} / {}",
                    self.acceptable, self.good, self.excellent
                ),
            ));
        }
        Ok(())
    }

    /// Map a score onto its band. NaN is `Deficient`.
    pub fn band_for(&self, score: f64) -> QualityBand {
        if score >= self.excellent {
            QualityBand::Excellent
        } else if score >= self.good {
            QualityBand::Good
        } else if score >= self.acceptable {
            QualityBand::Acceptable
        } else {
            QualityBand::Deficient
        }
    }
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_bands_at_edges() {
        let t = ClassificationThresholds::standard();
        assert_eq!(t.band_for(0.85), QualityBand::Excellent);
        assert_eq!(t.band_for(0.8499), QualityBand::Good);
        assert_eq!(t.band_for(0.70), QualityBand::Good);
        assert_eq!(t.band_for(0.30), QualityBand::Acceptable);
        assert_eq!(t.band_for(0.2999), QualityBand::Deficient);
        assert_eq!(t.band_for(f64::NAN), QualityBand::Deficient);
    }

    #[test]
    fn test_band_ordering() {
        assert!(QualityBand::Excellent > QualityBand::Good);
        assert!(QualityBand::Acceptable > QualityBand::Deficient);
    }

    #[test]
    fn test_spanish_alias_deserializes() {
        let band: QualityBand = serde_json::from_str("\"EXCELENTE\"").unwrap();
        assert_eq!(band, QualityBand::Excellent);
        assert_eq!(QualityBand::Deficient.spanish_label(), "INSUFICIENTE");
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let t = ClassificationThresholds {
            excellent: 0.6,
            good: 0.7,
            acceptable: 0.3,
        };
        assert!(t.validate("classification").is_err());
    }
}
