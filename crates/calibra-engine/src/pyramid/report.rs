use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use calibra_core::types::{fingerprint_of, ClusterId, Dimension, NodeLevel, PolicyArea, ScoreNode};

use super::diagnostics::MacroDiagnostics;

/// Outcome of one pyramid run: the full tree plus macro diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidReport {
    pub macro_node: ScoreNode,
    /// Node count per level, as verified during the run.
    pub level_counts: BTreeMap<NodeLevel, usize>,
    pub diagnostics: MacroDiagnostics,
    pub config_version: String,
}

impl PyramidReport {
    pub fn score(&self) -> f64 {
        self.macro_node.fused_score
    }

    pub fn nodes_at(&self, level: NodeLevel) -> Vec<&ScoreNode> {
        self.macro_node.nodes_at(level)
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ScoreNode> {
        let id = id.to_string();
        self.macro_node.children.iter().find(|c| c.id == id)
    }

    pub fn area(&self, id: PolicyArea) -> Option<&ScoreNode> {
        self.find_at(NodeLevel::Area, &id.to_string())
    }

    pub fn dimension(&self, area: PolicyArea, dimension: Dimension) -> Option<&ScoreNode> {
        self.find_at(NodeLevel::Dimension, &format!("{area}-{dimension}"))
    }

    /// Stable 64-bit digest of the serialized report.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_of(self)
    }

    fn find_at(&self, level: NodeLevel, id: &str) -> Option<&ScoreNode> {
        self.macro_node.nodes_at(level).into_iter().find(|n| n.id == id)
    }
}
