//! Unit/structural sub-evaluator for territorial development plans.
//!
//! Four components (structure `S`, mandatory sections `M`, indicators `I`,
//! investment plan `P`) are aggregated, hard-gated, and reduced by an
//! anti-gaming penalty. The result feeds the `@u` layer.

pub mod aggregate;
pub mod anti_gaming;
pub mod evaluator;
pub mod indicators;
pub mod investment;
pub mod sections;
pub mod structure;

pub use anti_gaming::{AntiGamingReport, GamingSignal};
pub use evaluator::{UnitEvaluator, UnitGate, UnitReport};
pub use indicators::IndicatorScore;
pub use investment::InvestmentScore;
pub use sections::{SectionCompleteness, SectionsScore};
pub use structure::StructureScore;
