//! Level B: the aggregation pyramid from micro-scores to one macro score.

pub mod builder;
pub mod diagnostics;
pub mod engine;
pub mod input;
pub mod report;

pub use diagnostics::{MacroDiagnostics, SystemicGap};
pub use engine::{Pyramid, MACRO_NODE_ID};
pub use input::MicroScores;
pub use report::PyramidReport;
