//! Four-stage aggregation pyramid over the 300 micro-scores.

use std::sync::Arc;

use calibra_core::config::{EngineConfig, ResolvedConfig};
use calibra_core::errors::AggregationError;
use calibra_core::types::{ClusterId, Dimension, MicroKey, NodeLevel, PolicyArea, QualityBand};
use calibra_engine::pyramid::{MicroScores, Pyramid, MACRO_NODE_ID};

fn config() -> Arc<ResolvedConfig> {
    Arc::new(EngineConfig::default().resolve().unwrap())
}

fn leaves(score: impl Fn(&MicroKey) -> f64) -> Vec<(String, f64)> {
    MicroKey::all().map(|k| (k.to_string(), score(&k))).collect()
}

fn area(n: u8) -> PolicyArea {
    PolicyArea::new(n).unwrap()
}

fn cluster(n: u8) -> ClusterId {
    ClusterId::new(n).unwrap()
}

/// PA04 perfect, PA08 weak, everything else 0.8. Both sit in CL03.
fn dispersed_leaves() -> Vec<(String, f64)> {
    leaves(|k| {
        if k.area == area(4) {
            1.0
        } else if k.area == area(8) {
            0.2
        } else {
            0.8
        }
    })
}

#[test]
fn test_full_run_counts_every_level() {
    let report = Pyramid::new(config()).run(&leaves(|_| 0.8)).unwrap();
    let counts: Vec<usize> = NodeLevel::ALL.iter().map(|l| report.level_counts[l]).collect();
    assert_eq!(counts, vec![300, 60, 10, 4, 1]);
    for level in NodeLevel::ALL {
        assert_eq!(report.nodes_at(level).len(), level.expected_count());
    }
    assert_eq!(report.macro_node.id, MACRO_NODE_ID);
    assert_eq!(report.config_version, "2024.1");
}

#[test]
fn test_uniform_scores_flow_through_unchanged() {
    let report = Pyramid::new(config()).run(&leaves(|_| 0.8)).unwrap();
    assert!((report.score() - 0.8).abs() < 1e-9);
    assert_eq!(report.macro_node.quality_band, QualityBand::Good);
    for c in report.nodes_at(NodeLevel::Cluster) {
        assert_eq!(c.penalty, Some(1.0));
        assert!(c.dispersion.unwrap_or(1.0) < 1e-9);
    }
    assert!((report.diagnostics.cross_cutting_coherence - 1.0).abs() < 1e-9);
    assert!(report.diagnostics.systemic_gaps.is_empty());
    assert_eq!(report.diagnostics.strategic_alignment, 1.0);
}

#[test]
fn test_node_ids_follow_the_hierarchy() {
    let report = Pyramid::new(config()).run(&leaves(|_| 0.5)).unwrap();
    let dim = report.dimension(area(3), Dimension::new(2).unwrap()).unwrap();
    assert_eq!(dim.id, "PA03-DIM02");
    assert_eq!(dim.children.len(), 5);
    assert_eq!(dim.children[3].id, "PA03-DIM02-Q4");
    assert_eq!(report.area(area(10)).unwrap().children.len(), 6);
    let cl01: Vec<&str> = report
        .cluster(cluster(1))
        .unwrap()
        .children
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(cl01, vec!["PA02", "PA03", "PA07"]);
}

#[test]
fn test_missing_leaf_is_cardinality_error() {
    let mut input = leaves(|_| 0.5);
    input.pop();
    match Pyramid::new(config()).run(&input) {
        Err(AggregationError::Cardinality {
            level,
            expected,
            observed,
        }) => {
            assert_eq!(level, NodeLevel::Micro);
            assert_eq!(expected, 300);
            assert_eq!(observed, 299);
        }
        other => panic!("Expected Cardinality, got: {other:?}"),
    }
}

#[test]
fn test_extra_leaf_is_cardinality_error() {
    let mut input = leaves(|_| 0.5);
    input.push(input[0].clone());
    assert!(matches!(
        Pyramid::new(config()).run(&input),
        Err(AggregationError::Cardinality { observed: 301, .. })
    ));
}

#[test]
fn test_duplicate_leaf_rejected_before_scoring() {
    let mut input = leaves(|_| 0.5);
    input[42].0 = input[7].0.clone();
    assert!(matches!(
        Pyramid::new(config()).run(&input),
        Err(AggregationError::DuplicateLeaf { .. })
    ));
}

#[test]
fn test_malformed_key_rejected() {
    let mut input = leaves(|_| 0.5);
    input[0].0 = "PA01-DIM07-Q1".to_string();
    assert!(matches!(
        Pyramid::new(config()).run(&input),
        Err(AggregationError::InvalidKey { .. })
    ));
}

#[test]
fn test_out_of_range_leaf_rejected() {
    let mut input = leaves(|_| 0.5);
    input[100].1 = f64::NAN;
    assert!(matches!(
        Pyramid::new(config()).run(&input),
        Err(AggregationError::OutOfRange { .. })
    ));
}

#[test]
fn test_dispersed_cluster_is_penalized() {
    let report = Pyramid::new(config()).run(&dispersed_leaves()).unwrap();

    // CL03 = {PA04, PA08}: scores 1.0 and 0.2, CV = 0.4 / 0.6 ≈ 0.67.
    let cl03 = report.cluster(cluster(3)).unwrap();
    assert!((cl03.dispersion.unwrap() - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!(cl03.penalty, Some(0.70));
    assert!((cl03.raw_score - 0.6).abs() < 1e-9);
    assert!((cl03.fused_score - 0.42).abs() < 1e-9);

    let cl01 = report.cluster(cluster(1)).unwrap();
    assert_eq!(cl01.penalty, Some(1.0));

    // Penalty is only applied at the cluster stage.
    assert!(report.nodes_at(NodeLevel::Area).iter().all(|a| a.penalty.is_none()));
    assert!(report.macro_node.penalty.is_none());

    assert!((report.score() - 0.705).abs() < 1e-9);
}

#[test]
fn test_macro_diagnostics() {
    let report = Pyramid::new(config()).run(&dispersed_leaves()).unwrap();
    let d = &report.diagnostics;

    assert_eq!(d.systemic_gaps.len(), 1);
    assert_eq!(d.systemic_gaps[0].area, "PA08");
    assert!((d.systemic_gaps[0].score - 0.2).abs() < 1e-9);
    assert!((d.strategic_alignment - 0.9).abs() < 1e-12);
    // Cluster scores 0.8, 0.8, 0.42, 0.8.
    assert!((d.cross_cutting_coherence - 0.7666).abs() < 1e-3);
}

#[test]
fn test_stage_hard_gate_zeroes_the_node() {
    let mut engine = EngineConfig::default();
    engine.aggregation.area.hard_gate_min = Some(0.3);
    let pyramid = Pyramid::new(Arc::new(engine.resolve().unwrap()));

    let weak_cell = Dimension::new(3).unwrap();
    let report = pyramid
        .run(&leaves(|k| {
            if k.area == area(8) && k.dimension == weak_cell {
                0.1
            } else {
                0.8
            }
        }))
        .unwrap();

    let pa08 = report.area(area(8)).unwrap();
    assert!(pa08.hard_gate_failed);
    assert_eq!(pa08.fused_score, 0.0);
    assert_eq!(pa08.raw_score, 0.0);
    assert_eq!(pa08.quality_band, QualityBand::Deficient);
    assert!(pa08.penalty.is_none());

    // The parent still fuses, with the gated child at 0.0.
    let cl03 = report.cluster(cluster(3)).unwrap();
    assert!(!cl03.hard_gate_failed);
    assert!((cl03.raw_score - 0.4).abs() < 1e-9);

    let untouched = report.area(area(1)).unwrap();
    assert!(!untouched.hard_gate_failed);
}

#[test]
fn test_custom_macro_weights() {
    let engine = EngineConfig::from_toml(
        r#"
[aggregation.macro.weights]
linear = { CL01 = 0.7, CL02 = 0.1, CL03 = 0.1, CL04 = 0.1 }
"#,
    )
    .unwrap();
    let pyramid = Pyramid::new(Arc::new(engine.resolve().unwrap()));
    let report = pyramid
        .run(&leaves(|k| if k.area == area(2) || k.area == area(3) || k.area == area(7) { 1.0 } else { 0.0 }))
        .unwrap();
    assert!((report.score() - 0.7).abs() < 1e-9);
}

#[test]
fn test_runs_are_bit_identical() {
    let pyramid = Pyramid::new(config());
    let input = dispersed_leaves();
    let first = pyramid.run(&input).unwrap();
    let second = pyramid.run(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());

    let validated = MicroScores::parse(&input).unwrap();
    assert_eq!(pyramid.run_validated(&validated).unwrap(), first);
}

#[test]
fn test_input_order_does_not_matter() {
    let pyramid = Pyramid::new(config());
    let input = dispersed_leaves();
    let mut reversed = input.clone();
    reversed.reverse();
    assert_eq!(pyramid.run(&input).unwrap(), pyramid.run(&reversed).unwrap());
}
