//! Combination of the four unit components.

use calibra_core::config::{AggregationFunction, ComponentWeights};

/// Combine `[S, M, I, P]` with `function`, weighting by `weights`.
///
/// Components with zero weight are ignored. A zero component drives the
/// geometric and harmonic means to zero.
pub fn aggregate(values: [f64; 4], weights: &ComponentWeights, function: AggregationFunction) -> f64 {
    let pairs: Vec<(f64, f64)> = values
        .into_iter()
        .zip(weights.as_array())
        .filter(|(_, w)| *w > 0.0)
        .map(|(v, w)| (v.clamp(0.0, 1.0), w))
        .collect();
    let weight_sum: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || weight_sum <= 0.0 {
        return 0.0;
    }

    let result = match function {
        AggregationFunction::WeightedAverage => {
            pairs.iter().map(|(v, w)| v * w).sum::<f64>() / weight_sum
        }
        AggregationFunction::GeometricMean => {
            if pairs.iter().any(|(v, _)| *v <= 0.0) {
                0.0
            } else {
                (pairs.iter().map(|(v, w)| w * v.ln()).sum::<f64>() / weight_sum).exp()
            }
        }
        AggregationFunction::HarmonicMean => {
            if pairs.iter().any(|(v, _)| *v <= 0.0) {
                0.0
            } else {
                weight_sum / pairs.iter().map(|(v, w)| w / v).sum::<f64>()
            }
        }
    };
    result.clamp(0.0, 1.0)
}
