//! Read-only document view consumed by the unit/structural evaluator.
//!
//! Produced by the ingestion collaborator; this crate never builds one from
//! raw text. Everything here is plain data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four mandatory blocks of a development plan, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Diagnostic,
    Strategic,
    InvestmentPlan,
    Monitoring,
}

impl BlockKind {
    pub const CANONICAL_ORDER: [BlockKind; 4] = [
        Self::Diagnostic,
        Self::Strategic,
        Self::InvestmentPlan,
        Self::Monitoring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Diagnostic => "diagnostic",
            Self::Strategic => "strategic",
            Self::InvestmentPlan => "investment_plan",
            Self::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A block detected in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBlock {
    pub kind: BlockKind,
    /// Offset of the block start (any monotone unit: token, char, page).
    pub position: usize,
    pub tokens: usize,
}

/// A heading; `level` 1 is top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub level: u8,
    pub text: String,
}

/// A named section with its token count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub tokens: usize,
}

/// One row of the indicator table. Text fields are raw cell values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorRow {
    pub name: Option<String>,
    pub baseline: Option<String>,
    pub target: Option<String>,
    pub unit: Option<String>,
    pub source: Option<String>,
    pub baseline_year: Option<i32>,
    pub target_year: Option<i32>,
    /// Program this indicator belongs to.
    pub program: Option<String>,
}

/// One row of the investment plan table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentRow {
    pub program: String,
    /// Amount per plan year.
    pub annual: Vec<f64>,
    /// Amount per funding source.
    pub sources: BTreeMap<String, f64>,
}

impl InvestmentRow {
    /// Row total: annual amounts, or funding sources when no annual split exists.
    pub fn total(&self) -> f64 {
        if self.annual.is_empty() {
            self.sources.values().sum()
        } else {
            self.annual.iter().sum()
        }
    }
}

/// The multi-year investment plan table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentPlan {
    pub rows: Vec<InvestmentRow>,
    /// Grand total as declared by the document.
    pub declared_total: Option<f64>,
}

impl InvestmentPlan {
    pub fn annual_subtotal(&self) -> f64 {
        self.rows.iter().flat_map(|r| r.annual.iter()).sum()
    }

    pub fn source_subtotal(&self) -> f64 {
        self.rows.iter().flat_map(|r| r.sources.values()).sum()
    }

    pub fn has_program(&self, program: &str) -> bool {
        let needle = program.trim();
        self.rows
            .iter()
            .any(|r| r.program.trim().eq_ignore_ascii_case(needle))
    }
}

/// Plan validity window, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHorizon {
    pub start_year: i32,
    pub end_year: i32,
}

impl PlanHorizon {
    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

/// Abstract structure of one territorial development plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdtStructure {
    pub document_id: String,
    /// Detected blocks in document order.
    pub blocks: Vec<DetectedBlock>,
    pub headers: Vec<Header>,
    pub sections: Vec<Section>,
    pub indicators: Vec<IndicatorRow>,
    pub investment_plan: Option<InvestmentPlan>,
    pub horizon: Option<PlanHorizon>,
    /// Body paragraphs, used only by the anti-gaming checks.
    pub paragraphs: Vec<String>,
}

impl PdtStructure {
    pub fn has_block(&self, kind: BlockKind) -> bool {
        self.blocks.iter().any(|b| b.kind == kind)
    }

    /// Token count of the first section whose name matches, case-insensitively.
    pub fn section_tokens(&self, name: &str) -> Option<usize> {
        let needle = name.trim();
        self.sections
            .iter()
            .find(|s| s.name.trim().eq_ignore_ascii_case(needle))
            .map(|s| s.tokens)
    }
}
