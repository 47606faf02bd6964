use calibra_core::errors::FusionError;
use calibra_core::types::{FusionWeights, WeightsSpec};
use proptest::prelude::*;

fn normalized(raw: &[f64]) -> Vec<(String, f64)> {
    let total: f64 = raw.iter().sum();
    raw.iter()
        .enumerate()
        .map(|(i, w)| (format!("k{i}"), w / total))
        .collect()
}

proptest! {
    #[test]
    fn normalized_tables_always_construct(raw in prop::collection::vec(0.01f64..10.0, 1..12)) {
        let weights = FusionWeights::new(WeightsSpec::linear(normalized(&raw)));
        prop_assert!(weights.is_ok());
        let total = weights.unwrap().total();
        prop_assert!((total - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn tables_off_by_more_than_tolerance_are_rejected(
        raw in prop::collection::vec(0.01f64..10.0, 1..12),
        scale in prop_oneof![0.5f64..0.998, 1.002f64..2.0],
    ) {
        let scaled: Vec<(String, f64)> = normalized(&raw)
            .into_iter()
            .map(|(k, w)| (k, w * scale))
            .collect();
        let result = FusionWeights::new(WeightsSpec::linear(scaled));
        let is_weight_sum = matches!(result, Err(FusionError::WeightSum { .. }));
        prop_assert!(is_weight_sum);
    }

    #[test]
    fn interaction_pair_order_does_not_matter(w in 0.0f64..0.5) {
        let forward = FusionWeights::new(
            WeightsSpec::linear([("a", 0.5 - w), ("b", 0.5)]).with_interaction("a", "b", w),
        );
        let backward = FusionWeights::new(
            WeightsSpec::linear([("a", 0.5 - w), ("b", 0.5)]).with_interaction("b", "a", w),
        );
        prop_assert_eq!(forward.ok(), backward.ok());
    }
}
