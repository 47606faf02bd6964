use std::collections::BTreeMap;

use calibra_core::config::{default_role_weights, PenaltyBands};
use calibra_core::types::{ClassificationThresholds, FusionWeights, QualityBand, Role, WeightsSpec};
use calibra_engine::fusion::fuse;
use calibra_engine::penalty::AdaptivePenalty;
use proptest::prelude::*;

const ANALYZER_KEYS: [&str; 8] = ["@b", "@chain", "@q", "@d", "@p", "@C", "@u", "@m"];

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn arb_scores() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::array::uniform8(0.0f64..=1.0).prop_map(|values| {
        ANALYZER_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

fn arb_weight() -> impl Strategy<Value = f64> {
    prop_oneof![1 => Just(0.0), 4 => 0.0f64..1.0]
}

fn arb_score() -> impl Strategy<Value = f64> {
    prop_oneof![1 => Just(0.0), 1 => Just(1.0), 6 => 0.0f64..=1.0]
}

/// A random key set with non-negative linear weights and a random subset of
/// distinct interaction pairs, normalized to a total anywhere inside
/// `1.0 ± 0.0009`.
fn arb_table() -> impl Strategy<Value = (Vec<String>, WeightsSpec)> {
    (2usize..=8)
        .prop_flat_map(|n| {
            let pairs: Vec<(usize, usize)> =
                (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).collect();
            let max = pairs.len();
            (
                prop::collection::vec(arb_weight(), n),
                prop::sample::subsequence(pairs, 0..=max),
                prop::collection::vec(arb_weight(), max),
                0.9991f64..=1.0009,
                any::<bool>(),
            )
        })
        .prop_map(|(mut linear_raw, pairs, pair_raw, target, swap)| {
            // Keeps the raw total positive.
            linear_raw[0] += 1e-3;
            let used = &pair_raw[..pairs.len()];
            let raw_total: f64 = linear_raw.iter().sum::<f64>() + used.iter().sum::<f64>();
            let scale = target / raw_total;

            let keys: Vec<String> = (0..linear_raw.len()).map(|i| format!("@k{i}")).collect();
            let mut spec = WeightsSpec::linear(
                keys.iter().cloned().zip(linear_raw.iter().map(|w| w * scale)),
            );
            for (&(i, j), w) in pairs.iter().zip(used) {
                let (a, b) = if swap { (j, i) } else { (i, j) };
                spec = spec.with_interaction(keys[a].clone(), keys[b].clone(), w * scale);
            }
            (keys, spec)
        })
}

fn arb_table_and_scores() -> impl Strategy<Value = (Vec<String>, WeightsSpec, Vec<f64>)> {
    arb_table().prop_flat_map(|(keys, spec)| {
        let n = keys.len();
        (Just(keys), Just(spec), prop::collection::vec(arb_score(), n))
    })
}

fn score_map(keys: &[String], values: &[f64]) -> BTreeMap<String, f64> {
    keys.iter().cloned().zip(values.iter().copied()).collect()
}

fn band_rank(band: QualityBand) -> u8 {
    match band {
        QualityBand::Deficient => 0,
        QualityBand::Acceptable => 1,
        QualityBand::Good => 2,
        QualityBand::Excellent => 3,
    }
}

// ── Boundedness ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn fused_score_stays_in_unit_interval(role in arb_role(), scores in arb_scores()) {
        let weights = FusionWeights::new(default_role_weights(role)).unwrap();
        let total = fuse(&scores, &weights).unwrap();
        prop_assert!((0.0..=1.0).contains(&total), "{role}: {total}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn fused_score_stays_in_unit_interval_for_any_normalized_table(
        (keys, spec, values) in arb_table_and_scores(),
    ) {
        let weights = FusionWeights::new(spec).unwrap();
        let total = fuse(&score_map(&keys, &values), &weights).unwrap();
        prop_assert!((0.0..=1.0).contains(&total), "{total}");
    }
}

// ── Monotonicity ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn raising_one_input_never_lowers_the_score_for_any_normalized_table(
        (keys, spec, values) in arb_table_and_scores(),
        index in any::<prop::sample::Index>(),
        bump in 0.0f64..=1.0,
    ) {
        let weights = FusionWeights::new(spec).unwrap();
        let scores = score_map(&keys, &values);
        let before = fuse(&scores, &weights).unwrap();

        let mut raised = scores.clone();
        let key = keys[index.index(keys.len())].clone();
        let current = raised[&key];
        raised.insert(key, (current + bump).min(1.0));
        let after = fuse(&raised, &weights).unwrap();

        prop_assert!(after + 1e-12 >= before, "{before} -> {after}");
    }
}

proptest! {
    #[test]
    fn raising_one_layer_never_lowers_the_score(
        role in arb_role(),
        scores in arb_scores(),
        index in 0usize..8,
        bump in 0.0f64..=1.0,
    ) {
        let weights = FusionWeights::new(default_role_weights(role)).unwrap();
        let before = fuse(&scores, &weights).unwrap();

        let mut raised = scores.clone();
        let key = ANALYZER_KEYS[index].to_string();
        let current = raised[&key];
        raised.insert(key, (current + bump).min(1.0));
        let after = fuse(&raised, &weights).unwrap();

        prop_assert!(after + 1e-12 >= before, "{before} -> {after}");
    }

    #[test]
    fn classification_is_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let thresholds = ClassificationThresholds::standard();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(band_rank(thresholds.band_for(lo)) <= band_rank(thresholds.band_for(hi)));
    }
}

// ── Penalty ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn penalty_factor_is_a_known_band(children in prop::collection::vec(0.0f64..=1.0, 2..=3)) {
        let penalty = AdaptivePenalty::new(PenaltyBands::default());
        let assessment = penalty.assess(&children);
        prop_assert!(assessment.cv >= 0.0);
        prop_assert!([1.0, 0.95, 0.85, 0.70].contains(&assessment.factor));
    }

    #[test]
    fn larger_dispersion_never_earns_a_larger_factor(a in 0.0f64..3.0, b in 0.0f64..3.0) {
        let penalty = AdaptivePenalty::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(penalty.factor_for(hi) <= penalty.factor_for(lo));
    }
}
