//! Anti-gaming detectors: placeholder stuffing, copy-paste boilerplate, and
//! number-free prose.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use calibra_core::config::AntiGamingConfig;
use calibra_core::types::PdtStructure;

/// `12`, `-3.5`, `1.200.000`, `45%`, `$300,5`
static NUMERIC_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-+$]?\d+(?:[.,]\d+)*%?$").ok());

/// A detector that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamingSignal {
    PlaceholderStuffing,
    DuplicatedParagraphs,
    LowNumericDensity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiGamingReport {
    pub placeholder_ratio: f64,
    /// `None` when the body has no paragraphs.
    pub unique_paragraph_ratio: Option<f64>,
    /// `None` when the body has no tokens.
    pub numeric_density: Option<f64>,
    pub signals: Vec<GamingSignal>,
    /// Total deduction, capped.
    pub penalty: f64,
}

/// Run every detector. `placeholder_ratio` comes from the indicator scan.
pub fn assess(doc: &PdtStructure, placeholder_ratio: f64, config: &AntiGamingConfig) -> AntiGamingReport {
    let unique_paragraph_ratio = unique_paragraph_ratio(&doc.paragraphs);
    let numeric_density = numeric_density(&doc.paragraphs);

    let mut signals = Vec::new();
    if placeholder_ratio > config.max_placeholder_ratio {
        signals.push(GamingSignal::PlaceholderStuffing);
    }
    if unique_paragraph_ratio.is_some_and(|r| r < config.min_unique_ratio) {
        signals.push(GamingSignal::DuplicatedParagraphs);
    }
    if numeric_density.is_some_and(|d| d < config.min_numeric_density) {
        signals.push(GamingSignal::LowNumericDensity);
    }

    let penalty = (signals.len() as f64 * config.deduction).min(config.cap);

    AntiGamingReport {
        placeholder_ratio,
        unique_paragraph_ratio,
        numeric_density,
        signals,
        penalty,
    }
}

/// Distinct paragraphs over all non-blank paragraphs, ignoring case and
/// whitespace differences.
fn unique_paragraph_ratio(paragraphs: &[String]) -> Option<f64> {
    let normalized: Vec<String> = paragraphs
        .iter()
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty())
        .collect();
    if normalized.is_empty() {
        return None;
    }
    let unique: FxHashSet<&str> = normalized.iter().map(String::as_str).collect();
    Some(unique.len() as f64 / normalized.len() as f64)
}

fn normalize(paragraph: &str) -> String {
    paragraph
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric tokens over all whitespace-separated tokens of the body.
fn numeric_density(paragraphs: &[String]) -> Option<f64> {
    let mut total = 0usize;
    let mut numeric = 0usize;
    for token in paragraphs.iter().flat_map(|p| p.split_whitespace()) {
        total += 1;
        if is_numeric(token) {
            numeric += 1;
        }
    }
    (total > 0).then(|| numeric as f64 / total as f64)
}

fn is_numeric(token: &str) -> bool {
    let trimmed = token.trim_matches(|c: char| matches!(c, '(' | ')' | ',' | ';' | ':' | '.'));
    match NUMERIC_TOKEN.as_ref() {
        Some(re) => re.is_match(trimmed),
        None => trimmed.chars().any(|c| c.is_ascii_digit()),
    }
}
