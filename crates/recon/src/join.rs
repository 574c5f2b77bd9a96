//! The balance join shared by the deficit report, the substitution report
//! and the allocation view.
//!
//! Both inputs are aggregated rows, so each side holds at most one row per
//! (material, batch) and a join never fans out.

use std::collections::HashMap;

use crate::model::{BatchKey, DemandRow, SupplyRow};
use crate::shipments::ShipmentList;

/// Which side determines the output row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    /// One row per demand row; missing supply counts as 0.
    Demand,
    /// One row per supply row; missing demand counts as 0.
    Supply,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow<'a> {
    pub key: &'a BatchKey,
    pub supply: f64,
    pub demand: f64,
    /// Shipments of the matching demand row, if any.
    pub shipments: Option<&'a ShipmentList>,
}

impl JoinedRow<'_> {
    /// Supply minus demand.
    pub fn balance(&self) -> f64 {
        self.supply - self.demand
    }
}

/// Left-join the driving side to the other, fill the gap with 0 and keep
/// the driving side's order.
pub fn balance_join<'a, D, S>(demand: D, supply: S, drive: Drive) -> Vec<JoinedRow<'a>>
where
    D: IntoIterator<Item = &'a DemandRow>,
    S: IntoIterator<Item = &'a SupplyRow>,
{
    match drive {
        Drive::Demand => {
            let stock: HashMap<&BatchKey, f64> =
                supply.into_iter().map(|s| (&s.key, s.stock_onhand)).collect();
            demand
                .into_iter()
                .map(|d| JoinedRow {
                    key: &d.key,
                    supply: stock.get(&d.key).copied().unwrap_or(0.0),
                    demand: d.total_ordered,
                    shipments: Some(&d.shipments),
                })
                .collect()
        }
        Drive::Supply => {
            let orders: HashMap<&BatchKey, &DemandRow> =
                demand.into_iter().map(|d| (&d.key, d)).collect();
            supply
                .into_iter()
                .map(|s| {
                    let matched = orders.get(&s.key).copied();
                    JoinedRow {
                        key: &s.key,
                        supply: s.stock_onhand,
                        demand: matched.map_or(0.0, |d| d.total_ordered),
                        shipments: matched.map(|d| &d.shipments),
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand(material: &str, batch: &str, qty: f64) -> DemandRow {
        DemandRow {
            key: BatchKey::new(material, batch),
            total_ordered: qty,
            shipments: ShipmentList::new(),
        }
    }

    fn supply(material: &str, batch: &str, qty: f64) -> SupplyRow {
        SupplyRow {
            key: BatchKey::new(material, batch),
            stock_onhand: qty,
        }
    }

    #[test]
    fn demand_driven_fills_missing_stock() {
        let d = vec![demand("M1", "B1", 150.0), demand("M2", "B2", 80.0)];
        let s = vec![supply("M1", "B1", 120.0), supply("M9", "B9", 999.0)];
        let rows = balance_join(&d, &s, Drive::Demand);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].balance(), -30.0);
        assert_eq!(rows[1].supply, 0.0);
        assert_eq!(rows[1].balance(), -80.0);
        assert!(rows.iter().all(|r| r.shipments.is_some()));
    }

    #[test]
    fn supply_driven_fills_missing_demand() {
        let d = vec![demand("M3", "B1", 250.0), demand("M3", "B7", 5.0)];
        let s = vec![supply("M3", "B1", 200.0), supply("M3", "B2", 50.0)];
        let rows = balance_join(&d, &s, Drive::Supply);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key.batch, "B1");
        assert_eq!(rows[0].balance(), -50.0);
        assert_eq!(rows[1].key.batch, "B2");
        assert_eq!(rows[1].demand, 0.0);
        assert!(rows[1].shipments.is_none());
    }

    #[test]
    fn accepts_filtered_iterators() {
        let d = vec![demand("M1", "B1", 1.0), demand("M2", "B1", 2.0)];
        let s = vec![supply("M1", "B1", 5.0), supply("M2", "B1", 5.0)];
        let rows = balance_join(
            d.iter().filter(|r| r.key.material == "M2"),
            s.iter().filter(|r| r.key.material == "M2"),
            Drive::Supply,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].balance(), 3.0);
    }
}
