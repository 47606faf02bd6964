use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use calibra_core::config::ResolvedConfig;
use calibra_core::errors::AggregationError;
use calibra_core::types::{
    ClusterId, Dimension, FusionWeights, MicroKey, NodeLevel, PolicyArea, ScoreNode, Slot,
};

use super::builder::{build_node, StageParams};
use super::diagnostics;
use super::input::MicroScores;
use super::report::PyramidReport;
use crate::classifier::QualityClassifier;
use crate::penalty::AdaptivePenalty;

/// Id of the single root node.
pub const MACRO_NODE_ID: &str = "MACRO";

/// Four-stage aggregation pyramid: 300 micro-scores → 60 dimensions →
/// 10 areas → 4 clusters → 1 macro score.
///
/// Stages run strictly in sequence; nodes within a stage run in parallel.
/// Every stage's output count is checked before the next stage starts.
#[derive(Debug, Clone)]
pub struct Pyramid {
    config: Arc<ResolvedConfig>,
    classifier: QualityClassifier,
    penalty: AdaptivePenalty,
}

impl Pyramid {
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        let classifier = QualityClassifier::new(config.classification.clone());
        let penalty = AdaptivePenalty::new(config.aggregation.penalty_bands.clone());
        Self {
            config,
            classifier,
            penalty,
        }
    }

    /// Validate raw `(key, score)` leaves and run every stage.
    pub fn run<K: AsRef<str>>(&self, leaves: &[(K, f64)]) -> Result<PyramidReport, AggregationError> {
        let _span = calibra_core::pyramid_span!(leaves.len()).entered();
        let scores = MicroScores::parse(leaves)?;
        self.run_validated(&scores)
    }

    /// Run every stage over already validated micro-scores.
    pub fn run_validated(&self, scores: &MicroScores) -> Result<PyramidReport, AggregationError> {
        let mut level_counts = BTreeMap::new();
        level_counts.insert(NodeLevel::Micro, scores.len());

        let dimensions = self.dimension_stage(scores)?;
        level_counts.insert(NodeLevel::Dimension, check_count(NodeLevel::Dimension, &dimensions)?);

        let areas = self.area_stage(dimensions)?;
        level_counts.insert(NodeLevel::Area, check_count(NodeLevel::Area, &areas)?);

        let clusters = self.cluster_stage(areas)?;
        level_counts.insert(NodeLevel::Cluster, check_count(NodeLevel::Cluster, &clusters)?);

        let macro_node = self.macro_stage(clusters)?;
        level_counts.insert(NodeLevel::Macro, 1);

        let diagnostics = {
            let cluster_nodes: Vec<&ScoreNode> = macro_node.children.iter().collect();
            let area_nodes = macro_node.nodes_at(NodeLevel::Area);
            let good = self.classifier.thresholds_at(NodeLevel::Area).good;
            diagnostics::compute(&cluster_nodes, &area_nodes, good)
        };

        info!(
            fused_score = macro_node.fused_score,
            band = %macro_node.quality_band,
            coherence = diagnostics.cross_cutting_coherence,
            gaps = diagnostics.systemic_gaps.len(),
            "pyramid run complete"
        );

        Ok(PyramidReport {
            macro_node,
            level_counts,
            diagnostics,
            config_version: self.config.version.clone(),
        })
    }

    /// Stage 1: five slot scores of each (area, dimension) cell.
    fn dimension_stage(&self, scores: &MicroScores) -> Result<Vec<ScoreNode>, AggregationError> {
        let stage = &self.config.aggregation.dimension;
        let params = self.params(NodeLevel::Dimension, &stage.weights, stage.hard_gate_min, None);
        let cells: Vec<(PolicyArea, Dimension)> = PolicyArea::all()
            .flat_map(|a| Dimension::all().map(move |d| (a, d)))
            .collect();
        let _span = calibra_core::pyramid_stage_span!(NodeLevel::Dimension, cells.len()).entered();

        cells
            .par_iter()
            .map(|&(area, dimension)| {
                let mut children = Vec::with_capacity(5);
                let mut keys = Vec::with_capacity(5);
                for slot in Slot::all() {
                    let key = MicroKey::new(area, dimension, slot);
                    let score = scores.get(&key).ok_or_else(|| AggregationError::MissingChild {
                        node_id: key.cell_id(),
                        child: key.to_string(),
                    })?;
                    let band = self.classifier.classify_at(NodeLevel::Micro, score);
                    children.push(ScoreNode::leaf(key.to_string(), score, band));
                    keys.push(slot.to_string());
                }
                build_node(format!("{area}-{dimension}"), children, &keys, params)
            })
            .collect()
    }

    /// Stage 2: six dimensions of each area, linear weights only.
    fn area_stage(&self, dimensions: Vec<ScoreNode>) -> Result<Vec<ScoreNode>, AggregationError> {
        let stage = &self.config.aggregation.area;
        let params = self.params(NodeLevel::Area, &stage.weights, stage.hard_gate_min, None);
        let _span = calibra_core::pyramid_stage_span!(NodeLevel::Area, PolicyArea::all().count()).entered();

        let mut by_area: BTreeMap<PolicyArea, Vec<ScoreNode>> = BTreeMap::new();
        for node in dimensions {
            let area = parse_prefix::<PolicyArea>(&node.id)?;
            by_area.entry(area).or_default().push(node);
        }

        let groups: Vec<(PolicyArea, Vec<ScoreNode>)> = PolicyArea::all()
            .map(|area| (area, by_area.remove(&area).unwrap_or_default()))
            .collect();

        groups
            .into_par_iter()
            .map(|(area, children)| {
                let keys = children
                    .iter()
                    .map(|c| c.id.rsplit('-').next().unwrap_or_default().to_string())
                    .collect::<Vec<_>>();
                for dimension in Dimension::all() {
                    let want = dimension.to_string();
                    if !keys.contains(&want) {
                        return Err(AggregationError::MissingChild {
                            node_id: area.to_string(),
                            child: format!("{area}-{want}"),
                        });
                    }
                }
                build_node(area.to_string(), children, &keys, params)
            })
            .collect()
    }

    /// Stage 3: member areas of each cluster, then the adaptive penalty.
    fn cluster_stage(&self, areas: Vec<ScoreNode>) -> Result<Vec<ScoreNode>, AggregationError> {
        let stage = &self.config.aggregation.cluster;
        let _span = calibra_core::pyramid_stage_span!(NodeLevel::Cluster, stage.weights.len()).entered();

        let mut by_id: BTreeMap<String, ScoreNode> =
            areas.into_iter().map(|n| (n.id.clone(), n)).collect();

        let mut groups: Vec<(ClusterId, Vec<ScoreNode>)> = Vec::new();
        for (cluster, members) in stage.membership.iter() {
            let mut children = Vec::with_capacity(members.len());
            for area in members {
                let node = by_id.remove(&area.to_string()).ok_or_else(|| {
                    AggregationError::MissingChild {
                        node_id: cluster.to_string(),
                        child: area.to_string(),
                    }
                })?;
                children.push(node);
            }
            groups.push((cluster, children));
        }

        groups
            .into_par_iter()
            .map(|(cluster, children)| {
                let weights = stage.weights.get(&cluster).ok_or_else(|| {
                    AggregationError::MissingChild {
                        node_id: MACRO_NODE_ID.to_string(),
                        child: cluster.to_string(),
                    }
                })?;
                let params = self.params(
                    NodeLevel::Cluster,
                    weights,
                    stage.hard_gate_min,
                    Some(&self.penalty),
                );
                let keys: Vec<String> = children.iter().map(|c| c.id.clone()).collect();
                build_node(cluster.to_string(), children, &keys, params)
            })
            .collect()
    }

    /// Stage 4: holistic synthesis over the four clusters.
    fn macro_stage(&self, clusters: Vec<ScoreNode>) -> Result<ScoreNode, AggregationError> {
        let stage = &self.config.aggregation.synthesis;
        let params = self.params(NodeLevel::Macro, &stage.weights, stage.hard_gate_min, None);
        let _span = calibra_core::pyramid_stage_span!(NodeLevel::Macro, 1usize).entered();
        let keys: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
        build_node(MACRO_NODE_ID.to_string(), clusters, &keys, params)
    }

    fn params<'a>(
        &'a self,
        level: NodeLevel,
        weights: &'a FusionWeights,
        hard_gate_min: Option<f64>,
        penalty: Option<&'a AdaptivePenalty>,
    ) -> StageParams<'a> {
        StageParams {
            level,
            weights,
            hard_gate_min,
            penalty,
            classifier: &self.classifier,
        }
    }
}

fn check_count(level: NodeLevel, nodes: &[ScoreNode]) -> Result<usize, AggregationError> {
    let expected = level.expected_count();
    if nodes.len() == expected {
        Ok(expected)
    } else {
        Err(AggregationError::Cardinality {
            level,
            expected,
            observed: nodes.len(),
        })
    }
}

/// Parse the leading `PAxx` segment of a node id.
fn parse_prefix<T: std::str::FromStr>(id: &str) -> Result<T, AggregationError>
where
    T::Err: std::fmt::Display,
{
    let head = id.split('-').next().unwrap_or_default();
    head.parse::<T>().map_err(|e| AggregationError::InvalidKey {
        key: id.to_string(),
        message: e.to_string(),
    })
}
