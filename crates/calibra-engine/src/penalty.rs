//! Adaptive dispersion penalty for cluster nodes.
//!
//! Areas of a cluster that disagree strongly make the cluster score less
//! trustworthy. The coefficient of variation of the children selects a
//! multiplicative factor from the configured bands.

use calibra_core::config::PenaltyBands;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Dispersion and the factor it selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyAssessment {
    pub cv: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AdaptivePenalty {
    bands: PenaltyBands,
}

impl AdaptivePenalty {
    pub fn new(bands: PenaltyBands) -> Self {
        Self { bands }
    }

    /// Factor of the first band whose exclusive `cv_max` exceeds `cv`.
    pub fn factor_for(&self, cv: f64) -> f64 {
        self.bands
            .bands()
            .iter()
            .find(|band| band.cv_max.map_or(true, |max| cv < max))
            .map_or(1.0, |band| band.factor)
    }

    /// Measure the dispersion of `children` and pick the factor.
    pub fn assess(&self, children: &[f64]) -> PenaltyAssessment {
        let cv = coefficient_of_variation(children);
        PenaltyAssessment {
            cv,
            factor: self.factor_for(cv),
        }
    }
}

/// Population standard deviation over the mean.
///
/// Zero for empty input and whenever the mean is not positive, so a cluster
/// of all-zero children carries no dispersion penalty on top of its zero.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().mean();
    if mean.is_nan() || mean <= 0.0 {
        return 0.0;
    }
    let sd = values.iter().population_std_dev();
    if sd.is_finite() {
        sd / mean
    } else {
        0.0
    }
}
