use std::collections::BTreeMap;

use calibra_core::errors::FusionError;
use calibra_core::types::{FusionBreakdown, FusionWeights, TermContribution};

/// Two-additive Choquet fusion.
///
/// ```text
/// result = Σ linear[k] · scores[k]
///        + Σ interaction[(i, j)] · min(scores[i], scores[j])
/// ```
///
/// Every key the weights reference must be present and every score must be a
/// finite value in [0, 1]. Terms are summed in key order, so repeated calls
/// are bit-identical. The result is clamped to [0, 1] to absorb the weight
/// tolerance and float rounding.
pub fn fuse(scores: &BTreeMap<String, f64>, weights: &FusionWeights) -> Result<f64, FusionError> {
    validate_scores(scores, weights)?;

    let mut total = 0.0;
    for (key, w) in weights.linear() {
        total += w * score(scores, key)?;
    }
    for term in weights.interaction() {
        total += term.weight * score(scores, &term.a)?.min(score(scores, &term.b)?);
    }
    Ok(total.clamp(0.0, 1.0))
}

/// Same as [`fuse`], with each term's contribution recorded.
pub fn fuse_breakdown(
    scores: &BTreeMap<String, f64>,
    weights: &FusionWeights,
) -> Result<FusionBreakdown, FusionError> {
    validate_scores(scores, weights)?;

    let mut linear = Vec::with_capacity(weights.linear().len());
    for (key, &w) in weights.linear() {
        let input = score(scores, key)?;
        linear.push(TermContribution {
            term: key.clone(),
            weight: w,
            input,
            contribution: w * input,
        });
    }

    let mut interaction = Vec::with_capacity(weights.interaction().len());
    for term in weights.interaction() {
        let input = score(scores, &term.a)?.min(score(scores, &term.b)?);
        interaction.push(TermContribution {
            term: format!("{}×{}", term.a, term.b),
            weight: term.weight,
            input,
            contribution: term.weight * input,
        });
    }

    let raw: f64 = linear
        .iter()
        .chain(interaction.iter())
        .map(|t| t.contribution)
        .sum();

    Ok(FusionBreakdown {
        linear,
        interaction,
        total: raw.clamp(0.0, 1.0),
    })
}

/// Check the fuse preconditions without computing anything.
pub fn validate_scores(
    scores: &BTreeMap<String, f64>,
    weights: &FusionWeights,
) -> Result<(), FusionError> {
    for (key, &value) in scores {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(FusionError::OutOfRange {
                key: key.clone(),
                value,
            });
        }
    }
    for key in weights.referenced_keys() {
        if !scores.contains_key(key) {
            return Err(FusionError::MissingKey {
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn score(scores: &BTreeMap<String, f64>, key: &str) -> Result<f64, FusionError> {
    scores
        .get(key)
        .copied()
        .ok_or_else(|| FusionError::MissingKey {
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibra_core::types::WeightsSpec;

    fn scores(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_linear_only_is_weighted_mean() {
        let w = FusionWeights::new(WeightsSpec::linear([("a", 0.25), ("b", 0.75)])).unwrap();
        let r = fuse(&scores(&[("a", 0.4), ("b", 0.8)]), &w).unwrap();
        assert!((r - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_uses_min() {
        let w = FusionWeights::new(WeightsSpec::linear([("a", 0.5)]).with_interaction("a", "b", 0.5))
            .unwrap();
        let r = fuse(&scores(&[("a", 1.0), ("b", 0.2)]), &w).unwrap();
        assert!((r - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_key_rejected() {
        let w = FusionWeights::new(WeightsSpec::linear([("a", 0.5), ("b", 0.5)])).unwrap();
        assert_eq!(
            fuse(&scores(&[("a", 0.5)]), &w),
            Err(FusionError::MissingKey { key: "b".into() })
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let w = FusionWeights::new(WeightsSpec::linear([("a", 1.0)])).unwrap();
        assert!(matches!(
            fuse(&scores(&[("a", 1.2)]), &w),
            Err(FusionError::OutOfRange { .. })
        ));
        assert!(matches!(
            fuse(&scores(&[("a", f64::NAN)]), &w),
            Err(FusionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_tolerance_overshoot_is_clamped() {
        let w = FusionWeights::new(WeightsSpec::linear([("a", 0.5005), ("b", 0.5)])).unwrap();
        let r = fuse(&scores(&[("a", 1.0), ("b", 1.0)]), &w).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_breakdown_matches_fuse() {
        let w = FusionWeights::new(
            WeightsSpec::linear([("a", 0.3), ("b", 0.3)]).with_interaction("a", "b", 0.4),
        )
        .unwrap();
        let s = scores(&[("a", 0.9), ("b", 0.5)]);
        let b = fuse_breakdown(&s, &w).unwrap();
        assert_eq!(b.total, fuse(&s, &w).unwrap());
        assert_eq!(b.interaction.len(), 1);
        assert!((b.interaction_total() - 0.2).abs() < 1e-12);
        assert!((b.linear_total() - 0.42).abs() < 1e-12);
    }
}
