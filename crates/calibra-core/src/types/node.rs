//! Aggregation tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::QualityBand;
use crate::constants::{
    AREA_NODE_COUNT, CLUSTER_NODE_COUNT, DIMENSION_NODE_COUNT, MACRO_NODE_COUNT,
    MICRO_NODE_COUNT,
};

/// Level of a node in the aggregation pyramid, leaf-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Micro,
    Dimension,
    Area,
    Cluster,
    Macro,
}

impl NodeLevel {
    pub const ALL: [NodeLevel; 5] = [
        Self::Micro,
        Self::Dimension,
        Self::Area,
        Self::Cluster,
        Self::Macro,
    ];

    /// Constitutional node count at this level.
    pub fn expected_count(self) -> usize {
        match self {
            Self::Micro => MICRO_NODE_COUNT,
            Self::Dimension => DIMENSION_NODE_COUNT,
            Self::Area => AREA_NODE_COUNT,
            Self::Cluster => CLUSTER_NODE_COUNT,
            Self::Macro => MACRO_NODE_COUNT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Dimension => "dimension",
            Self::Area => "area",
            Self::Cluster => "cluster",
            Self::Macro => "macro",
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of the aggregation tree. Built bottom-up once per run.
///
/// `raw_score` is the fusion result before any stage correction; `fused_score`
/// is what the parent consumes (after the adaptive penalty or a hard gate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreNode {
    pub id: String,
    pub level: NodeLevel,
    pub children: Vec<ScoreNode>,
    pub raw_score: f64,
    pub fused_score: f64,
    pub dispersion: Option<f64>,
    pub penalty: Option<f64>,
    pub hard_gate_failed: bool,
    pub quality_band: QualityBand,
}

impl ScoreNode {
    /// A micro-score leaf.
    pub fn leaf(id: impl Into<String>, score: f64, quality_band: QualityBand) -> Self {
        Self {
            id: id.into(),
            level: NodeLevel::Micro,
            children: Vec::new(),
            raw_score: score,
            fused_score: score,
            dispersion: None,
            penalty: None,
            hard_gate_failed: false,
            quality_band,
        }
    }

    /// Number of nodes at `level` in this subtree, including `self`.
    pub fn count_at(&self, level: NodeLevel) -> usize {
        if self.level == level {
            return 1;
        }
        if self.level < level {
            return 0;
        }
        self.children.iter().map(|c| c.count_at(level)).sum()
    }

    /// Nodes at `level` in this subtree, depth-first in child order.
    pub fn nodes_at(&self, level: NodeLevel) -> Vec<&ScoreNode> {
        let mut out = Vec::new();
        self.collect_at(level, &mut out);
        out
    }

    fn collect_at<'a>(&'a self, level: NodeLevel, out: &mut Vec<&'a ScoreNode>) {
        if self.level == level {
            out.push(self);
        } else if self.level > level {
            for child in &self.children {
                child.collect_at(level, out);
            }
        }
    }

    /// Find a node by id anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&ScoreNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, level: NodeLevel, children: Vec<ScoreNode>) -> ScoreNode {
        ScoreNode {
            id: id.to_string(),
            level,
            children,
            raw_score: 0.5,
            fused_score: 0.5,
            dispersion: None,
            penalty: None,
            hard_gate_failed: false,
            quality_band: QualityBand::Acceptable,
        }
    }

    #[test]
    fn test_count_and_find() {
        let leaves = vec![
            ScoreNode::leaf("a", 0.1, QualityBand::Deficient),
            ScoreNode::leaf("b", 0.9, QualityBand::Excellent),
        ];
        let dim = node("d", NodeLevel::Dimension, leaves);
        let area = node("x", NodeLevel::Area, vec![dim]);
        assert_eq!(area.count_at(NodeLevel::Micro), 2);
        assert_eq!(area.count_at(NodeLevel::Dimension), 1);
        assert_eq!(area.count_at(NodeLevel::Cluster), 0);
        assert_eq!(area.find("b").map(|n| n.fused_score), Some(0.9));
        assert_eq!(area.nodes_at(NodeLevel::Micro).len(), 2);
    }

    #[test]
    fn test_expected_counts() {
        let counts: Vec<usize> = NodeLevel::ALL.iter().map(|l| l.expected_count()).collect();
        assert_eq!(counts, vec![300, 60, 10, 4, 1]);
    }
}
