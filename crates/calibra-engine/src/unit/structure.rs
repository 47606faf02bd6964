//! `S`: block coverage, header hierarchy, and block order.

use serde::{Deserialize, Serialize};

use calibra_core::types::{BlockKind, Header, PdtStructure};

/// Breakdown of the structural component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureScore {
    /// Fraction of the four mandatory blocks present.
    pub block_coverage: f64,
    pub hierarchy_quality: f64,
    pub order_penalty: f64,
    /// `0.5·coverage + 0.25·hierarchy + 0.25·order`
    pub score: f64,
}

pub fn score(doc: &PdtStructure) -> StructureScore {
    let present = BlockKind::CANONICAL_ORDER
        .iter()
        .filter(|kind| doc.has_block(**kind))
        .count();
    let block_coverage = present as f64 / BlockKind::CANONICAL_ORDER.len() as f64;
    let hierarchy_quality = hierarchy_quality(&doc.headers);
    let order_penalty = order_penalty(doc);

    StructureScore {
        block_coverage,
        hierarchy_quality,
        order_penalty,
        score: 0.5 * block_coverage + 0.25 * hierarchy_quality + 0.25 * order_penalty,
    }
}

/// Share of header transitions that never skip a level, bucketed.
fn hierarchy_quality(headers: &[Header]) -> f64 {
    if headers.is_empty() {
        return 0.0;
    }
    if headers.len() == 1 {
        return 1.0;
    }
    let transitions = headers.len() - 1;
    let valid = headers
        .windows(2)
        .filter(|w| w[1].level <= w[0].level.saturating_add(1))
        .count();
    let share = valid as f64 / transitions as f64;
    if share >= 0.8 {
        1.0
    } else if share >= 0.5 {
        0.5
    } else {
        0.0
    }
}

/// 1.0 in canonical order, 0.5 with one adjacent inversion, else 0.0.
fn order_penalty(doc: &PdtStructure) -> f64 {
    let mut blocks: Vec<_> = doc.blocks.iter().collect();
    match blocks.len() {
        0 => return 0.0,
        1 => return 1.0,
        _ => {}
    }
    blocks.sort_by_key(|b| b.position);
    let ranks: Vec<usize> = blocks
        .iter()
        .filter_map(|b| BlockKind::CANONICAL_ORDER.iter().position(|k| *k == b.kind))
        .collect();
    let inversions = ranks.windows(2).filter(|w| w[0] > w[1]).count();
    match inversions {
        0 => 1.0,
        1 => 0.5,
        _ => 0.0,
    }
}
