use crate::model::{BalanceRow, ReconSummary, SubstitutionRow};
use crate::substitution::deficient_materials;

/// Compute summary statistics for one run.
pub fn compute_summary(
    demand_rows: usize,
    supply_rows: usize,
    balances: &[BalanceRow],
    substitutions: &[SubstitutionRow],
) -> ReconSummary {
    let mut deficit_rows = 0;
    let mut total_shortfall = 0.0;

    for r in balances {
        if r.is_deficit() {
            deficit_rows += 1;
            total_shortfall -= r.balance;
        }
    }

    ReconSummary {
        demand_rows,
        supply_rows,
        deficit_rows,
        sufficient_rows: balances.len() - deficit_rows,
        deficient_materials: deficient_materials(balances).len(),
        substitution_rows: substitutions.len(),
        total_shortfall,
        all_clear: deficit_rows == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(material: &str, batch: &str, ordered: f64, stock: f64) -> BalanceRow {
        BalanceRow {
            material: material.into(),
            product_name: None,
            batch: batch.into(),
            total_ordered: ordered,
            stock_onhand: stock,
            balance: stock - ordered,
            shipment_list: String::new(),
        }
    }

    #[test]
    fn summary_counts() {
        let balances = vec![
            balance("M1", "B1", 150.0, 120.0),
            balance("M1", "B2", 10.0, 0.0),
            balance("M2", "B2", 80.0, 0.0),
            balance("M3", "B1", 5.0, 5.0),
        ];
        let summary = compute_summary(4, 2, &balances, &[]);
        assert_eq!(summary.deficit_rows, 3);
        assert_eq!(summary.sufficient_rows, 1);
        assert_eq!(summary.deficient_materials, 2);
        assert_eq!(summary.total_shortfall, 120.0);
        assert!(!summary.all_clear);
    }

    #[test]
    fn zero_balance_is_not_a_deficit() {
        let summary = compute_summary(1, 1, &[balance("M1", "B1", 5.0, 5.0)], &[]);
        assert!(summary.all_clear);
        assert_eq!(summary.total_shortfall, 0.0);
    }
}
