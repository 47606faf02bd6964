//! Unit/structural evaluation of whole plan documents.

use std::collections::BTreeMap;

use calibra_core::config::{AggregationFunction, UnitConfig};
use calibra_core::traits::{CalibrationContext, LayerScoreProvider};
use calibra_core::types::{
    BlockKind, ClassificationThresholds, DetectedBlock, Header, IndicatorRow, InvestmentPlan,
    InvestmentRow, LayerValue, PdtStructure, PlanHorizon, QualityBand, Section,
};
use calibra_engine::providers::UnitLayerProvider;
use calibra_engine::unit::{GamingSignal, UnitEvaluator, UnitGate};

fn indicator(i: usize) -> IndicatorRow {
    IndicatorRow {
        name: Some(format!("Cobertura educativa {i}")),
        baseline: Some("45%".into()),
        target: Some("60%".into()),
        unit: Some("porcentaje".into()),
        source: Some("DANE".into()),
        baseline_year: Some(2023),
        target_year: Some(2027),
        program: Some(format!("Programa {i}")),
    }
}

fn investment_row(i: usize, amount: f64) -> InvestmentRow {
    InvestmentRow {
        program: format!("Programa {i}"),
        annual: vec![amount; 4],
        sources: [("SGP".to_string(), amount * 2.5), ("propios".to_string(), amount * 1.5)]
            .into_iter()
            .collect(),
    }
}

/// A plan that satisfies every structural check.
fn complete_plan(id: &str) -> PdtStructure {
    let blocks = BlockKind::CANONICAL_ORDER
        .iter()
        .enumerate()
        .map(|(i, kind)| DetectedBlock {
            kind: *kind,
            position: i * 100,
            tokens: 800,
        })
        .collect();
    let headers = [1, 2, 2, 1, 2]
        .iter()
        .map(|level| Header {
            level: *level,
            text: format!("Capítulo nivel {level}"),
        })
        .collect();
    let sections = UnitConfig::default()
        .sections
        .iter()
        .map(|req| Section {
            name: req.name.clone(),
            tokens: 1_000,
        })
        .collect();
    PdtStructure {
        document_id: id.to_string(),
        blocks,
        headers,
        sections,
        indicators: (1..=5).map(indicator).collect(),
        investment_plan: Some(InvestmentPlan {
            rows: (1..=5).map(|i| investment_row(i, 100.0)).collect(),
            declared_total: Some(2_000.0),
        }),
        horizon: Some(PlanHorizon {
            start_year: 2024,
            end_year: 2027,
        }),
        paragraphs: (1..=8)
            .map(|i| format!("El programa {i} atiende 1200 hogares con inversión de 400 millones en 2027."))
            .collect(),
    }
}

#[test]
fn test_complete_plan_scores_excellent() {
    let report = UnitEvaluator::default().evaluate(&complete_plan("pdt-001"));
    assert!(!report.hard_gate_failed());
    assert_eq!(report.s(), 1.0);
    assert_eq!(report.m(), 1.0);
    assert!((report.i() - 1.0).abs() < 1e-9);
    assert!((report.p() - 1.0).abs() < 1e-9);
    assert!(report.anti_gaming.signals.is_empty());
    assert_eq!(report.anti_gaming.penalty, 0.0);
    assert!(report.final_score > 0.99);
    assert_eq!(report.quality_band, QualityBand::Excellent);
    assert_eq!(report.aggregation_function, AggregationFunction::GeometricMean);
}

#[test]
fn test_weak_structure_is_gated() {
    let mut doc = complete_plan("pdt-002");
    // Two blocks, one inversion, no headers: 0.5·0.5 + 0 + 0.25·0.5
    doc.blocks = vec![
        DetectedBlock {
            kind: BlockKind::Strategic,
            position: 0,
            tokens: 500,
        },
        DetectedBlock {
            kind: BlockKind::Diagnostic,
            position: 100,
            tokens: 500,
        },
    ];
    doc.headers.clear();

    let report = UnitEvaluator::default().evaluate(&doc);
    assert!((report.s() - 0.375).abs() < 1e-12);
    assert_eq!(report.final_score, 0.0);
    assert_eq!(report.quality_band, QualityBand::Deficient);
    assert!(matches!(
        report.gates.as_slice(),
        [UnitGate::StructureBelowMinimum { threshold, .. }] if *threshold == 0.5
    ));
}

#[test]
fn test_incomplete_indicators_gate_an_otherwise_perfect_plan() {
    let mut doc = complete_plan("pdt-003");
    doc.indicators = (1..=10)
        .map(|i| {
            let mut row = indicator(i);
            row.unit = None;
            row.source = None;
            if i > 7 {
                row.name = None;
            }
            row
        })
        .collect();

    let report = UnitEvaluator::default().evaluate(&doc);
    // 47 of 70 fields present.
    assert!((report.indicators.field_completeness - 47.0 / 70.0).abs() < 1e-12);
    assert_eq!(report.s(), 1.0);
    assert_eq!(report.m(), 1.0);
    assert_eq!(report.final_score, 0.0);
    assert_eq!(report.quality_band, QualityBand::Deficient);
    assert_eq!(report.gates.len(), 1);
    assert!(matches!(report.gates[0], UnitGate::IndicatorsIncomplete { .. }));
}

#[test]
fn test_missing_investment_plan_is_gated() {
    let mut doc = complete_plan("pdt-004");
    doc.investment_plan = None;
    let report = UnitEvaluator::default().evaluate(&doc);
    assert!(report.gates.contains(&UnitGate::InvestmentPlanAbsent));
    assert_eq!(report.final_score, 0.0);
}

#[test]
fn test_empty_investment_rows_are_gated() {
    let mut doc = complete_plan("pdt-005");
    doc.investment_plan = Some(InvestmentPlan {
        rows: (1..=5).map(|i| investment_row(i, if i == 1 { 100.0 } else { 0.0 })).collect(),
        declared_total: Some(400.0),
    });
    let report = UnitEvaluator::default().evaluate(&doc);
    assert!((report.investment.nonzero_row_fraction - 0.2).abs() < 1e-12);
    assert!(matches!(report.gates[0], UnitGate::InvestmentRowsEmpty { .. }));
}

fn boilerplate_paragraphs() -> Vec<String> {
    std::iter::repeat("El municipio promoverá el desarrollo integral de la comunidad.")
        .take(19)
        .chain(std::iter::once("Se fortalecerá la gestión institucional."))
        .map(String::from)
        .collect()
}

#[test]
fn test_boilerplate_without_numbers_reaches_the_cap() {
    let mut doc = complete_plan("pdt-007");
    doc.paragraphs = boilerplate_paragraphs();

    let report = UnitEvaluator::default().evaluate(&doc);
    let ag = &report.anti_gaming;
    assert_eq!(
        ag.signals,
        vec![GamingSignal::DuplicatedParagraphs, GamingSignal::LowNumericDensity]
    );
    assert_eq!(ag.placeholder_ratio, 0.0);
    assert!((ag.unique_paragraph_ratio.unwrap() - 0.1).abs() < 1e-12);
    assert_eq!(ag.numeric_density, Some(0.0));
    // 0.15 + 0.15
    assert!((ag.penalty - 0.3).abs() < 1e-12);
    assert!(!report.hard_gate_failed());
    assert!((report.final_score - (report.aggregate - 0.3)).abs() < 1e-12);
}

#[test]
fn test_three_signals_are_capped() {
    let mut doc = complete_plan("pdt-006");
    doc.paragraphs = boilerplate_paragraphs();
    for row in &mut doc.indicators {
        row.source = Some("N/A".into());
    }

    let report = UnitEvaluator::default().evaluate(&doc);
    let ag = &report.anti_gaming;
    assert_eq!(
        ag.signals,
        vec![
            GamingSignal::PlaceholderStuffing,
            GamingSignal::DuplicatedParagraphs,
            GamingSignal::LowNumericDensity,
        ]
    );
    assert!((ag.unique_paragraph_ratio.unwrap() - 0.1).abs() < 1e-12);
    assert_eq!(ag.numeric_density, Some(0.0));
    assert_eq!(ag.penalty, 0.3);
    assert!(!report.hard_gate_failed());
    assert!((report.final_score - (report.aggregate - 0.3)).abs() < 1e-12);
}

#[test]
fn test_empty_body_fires_no_text_signals() {
    let mut doc = complete_plan("pdt-007");
    doc.paragraphs.clear();
    let report = UnitEvaluator::default().evaluate(&doc);
    assert!(report.anti_gaming.unique_paragraph_ratio.is_none());
    assert!(report.anti_gaming.numeric_density.is_none());
    assert!(report.anti_gaming.signals.is_empty());
}

#[test]
fn test_aggregation_function_is_configurable() {
    let mut doc = complete_plan("pdt-008");
    doc.sections.retain(|s| s.name != "vision" && s.name != "financiamiento");

    let thresholds = ClassificationThresholds::standard();
    let mut config = UnitConfig::default();
    let geometric = UnitEvaluator::new(config.clone(), thresholds).evaluate(&doc);
    config.aggregation_function = AggregationFunction::WeightedAverage;
    let average = UnitEvaluator::new(config.clone(), thresholds).evaluate(&doc);
    config.aggregation_function = AggregationFunction::HarmonicMean;
    let harmonic = UnitEvaluator::new(config, thresholds).evaluate(&doc);

    // M = 7/9 while S, I, P are 1.0.
    assert!((average.aggregate - (3.0 + 7.0 / 9.0) / 4.0).abs() < 1e-9);
    assert!(harmonic.aggregate < geometric.aggregate);
    assert!(geometric.aggregate < average.aggregate);
}

#[test]
fn test_evaluate_many_preserves_order() {
    let mut gated = complete_plan("b");
    gated.investment_plan = None;
    let docs = vec![complete_plan("a"), gated, complete_plan("c")];

    let reports = UnitEvaluator::default().evaluate_many(&docs);
    let ids: Vec<&str> = reports.iter().map(|r| r.document_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(reports[1].hard_gate_failed());
    assert_eq!(reports[0].final_score, reports[2].final_score);
}

#[test]
fn test_unit_layer_provider_reads_document_from_context() {
    let doc = complete_plan("pdt-009");
    let provider = UnitLayerProvider::default();
    let ctx = CalibrationContext::new().with_document(&doc);
    match provider.provide("m", &ctx).unwrap() {
        LayerValue::Continuous(v) => assert!(v > 0.99),
        other => panic!("Expected continuous value, got: {other:?}"),
    }
    assert!(provider.provide("m", &CalibrationContext::new()).is_err());
}

#[test]
fn test_report_serializes() {
    let report = UnitEvaluator::default().evaluate(&complete_plan("pdt-010"));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["document_id"], "pdt-010");
    assert!(json["structure"]["score"].is_number());
    let _: BTreeMap<String, serde_json::Value> = serde_json::from_value(json).unwrap();
}
