use std::collections::BTreeMap;

use crate::model::{BatchKey, DemandRow, OrderLine, StockLine, SupplyRow};
use crate::shipments::ShipmentList;

/// Group order lines by (material, batch), sum quantities (missing → 0) and
/// collect distinct shipment ids in first-seen order.
pub fn aggregate_demand(lines: &[OrderLine]) -> Vec<DemandRow> {
    let mut groups: BTreeMap<&BatchKey, (f64, ShipmentList)> = BTreeMap::new();

    for line in lines {
        let entry = groups.entry(&line.key).or_insert_with(|| (0.0, ShipmentList::new()));
        entry.0 += line.ordered_quantity.unwrap_or(0.0);
        if let Some(ref id) = line.shipment_id {
            entry.1.push(id);
        }
    }

    groups
        .into_iter()
        .map(|(key, (total_ordered, shipments))| DemandRow {
            key: key.clone(),
            total_ordered,
            shipments,
        })
        .collect()
}

/// Group stock lines by (material, batch) and sum on-hand quantity
/// (missing → 0). Sub-location lines of one batch collapse here.
pub fn aggregate_supply(lines: &[StockLine]) -> Vec<SupplyRow> {
    let mut groups: BTreeMap<&BatchKey, f64> = BTreeMap::new();

    for line in lines {
        *groups.entry(&line.key).or_insert(0.0) += line.unrestricted_quantity.unwrap_or(0.0);
    }

    groups
        .into_iter()
        .map(|(key, stock_onhand)| SupplyRow {
            key: key.clone(),
            stock_onhand,
        })
        .collect()
}
