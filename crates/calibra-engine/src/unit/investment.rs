//! `P`: investment plan presence, populated rows, budget reconciliation.

use serde::{Deserialize, Serialize};

use calibra_core::types::InvestmentPlan;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentScore {
    pub present: bool,
    pub nonzero_row_fraction: f64,
    /// 0.5 per sub-total (annual, by source) matching the declared total.
    pub budget_consistency: f64,
    /// `0.2·presence + 0.4·nonzero_rows + 0.4·consistency`
    pub score: f64,
}

pub fn score(plan: Option<&InvestmentPlan>, tolerance: f64) -> InvestmentScore {
    let Some(plan) = plan else {
        return InvestmentScore {
            present: false,
            nonzero_row_fraction: 0.0,
            budget_consistency: 0.0,
            score: 0.0,
        };
    };

    let nonzero_row_fraction = if plan.rows.is_empty() {
        0.0
    } else {
        let nonzero = plan.rows.iter().filter(|r| r.total() > 0.0).count();
        nonzero as f64 / plan.rows.len() as f64
    };

    let budget_consistency = match plan.declared_total {
        Some(declared) if declared.is_finite() => {
            let mut c = 0.0;
            if reconciles(plan.annual_subtotal(), declared, tolerance) {
                c += 0.5;
            }
            if reconciles(plan.source_subtotal(), declared, tolerance) {
                c += 0.5;
            }
            c
        }
        _ => 0.0,
    };

    InvestmentScore {
        present: true,
        nonzero_row_fraction,
        budget_consistency,
        score: 0.2 + 0.4 * nonzero_row_fraction + 0.4 * budget_consistency,
    }
}

/// Relative match within `tolerance` of the declared total.
fn reconciles(subtotal: f64, declared: f64, tolerance: f64) -> bool {
    (subtotal - declared).abs() <= tolerance * declared.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibra_core::types::InvestmentRow;
    use std::collections::BTreeMap;

    fn row(program: &str, annual: &[f64], sources: &[(&str, f64)]) -> InvestmentRow {
        InvestmentRow {
            program: program.into(),
            annual: annual.to_vec(),
            sources: sources
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_fully_reconciled_plan() {
        let plan = InvestmentPlan {
            rows: vec![
                row("A", &[50.0, 50.0], &[("SGP", 100.0)]),
                row("B", &[100.0], &[("Propios", 60.0), ("Regalías", 40.0)]),
            ],
            declared_total: Some(200.5),
        };
        let p = score(Some(&plan), 0.01);
        assert_eq!(p.nonzero_row_fraction, 1.0);
        assert_eq!(p.budget_consistency, 1.0);
        assert!((p.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_annual_reconciles() {
        let plan = InvestmentPlan {
            rows: vec![row("A", &[100.0], &[("SGP", 70.0)]), row("B", &[], &[])],
            declared_total: Some(100.0),
        };
        let p = score(Some(&plan), 0.01);
        assert_eq!(p.nonzero_row_fraction, 0.5);
        assert_eq!(p.budget_consistency, 0.5);
    }

    #[test]
    fn test_absent_plan() {
        let p = score(None, 0.01);
        assert!(!p.present);
        assert_eq!(p.score, 0.0);
    }
}
