//! `M`: completeness of the mandatory sections.

use serde::{Deserialize, Serialize};

use calibra_core::config::SectionRequirement;
use calibra_core::types::PdtStructure;

/// Completeness of one mandatory section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCompleteness {
    pub name: String,
    pub tokens: Option<usize>,
    /// 1.0 complete, 0.5 present but short, 0.0 absent.
    pub completeness: f64,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionsScore {
    pub sections: Vec<SectionCompleteness>,
    pub score: f64,
}

/// Weighted average of section completeness; critical sections weigh 2×.
pub fn score(doc: &PdtStructure, requirements: &[SectionRequirement]) -> SectionsScore {
    let sections: Vec<SectionCompleteness> = requirements
        .iter()
        .map(|req| {
            let tokens = doc.section_tokens(&req.name);
            let completeness = match tokens {
                Some(t) if t >= req.min_tokens => 1.0,
                Some(_) => 0.5,
                None => 0.0,
            };
            SectionCompleteness {
                name: req.name.clone(),
                tokens,
                completeness,
                critical: req.critical,
            }
        })
        .collect();

    let (weighted, total_weight) = sections.iter().fold((0.0, 0.0), |(acc, tw), s| {
        let w = if s.critical { 2.0 } else { 1.0 };
        (acc + w * s.completeness, tw + w)
    });
    let score = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    };

    SectionsScore { sections, score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibra_core::types::Section;

    #[test]
    fn test_critical_sections_weigh_double() {
        let reqs = vec![
            SectionRequirement::new("diagnostico", 100, true),
            SectionRequirement::new("vision", 10, false),
        ];
        let doc = PdtStructure {
            sections: vec![Section {
                name: "Diagnostico".into(),
                tokens: 40,
            }],
            ..Default::default()
        };
        let m = score(&doc, &reqs);
        // (2·0.5 + 1·0.0) / 3
        assert!((m.score - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.sections[1].tokens, None);
    }
}
