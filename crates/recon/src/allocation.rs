use crate::catalog::ProductCatalog;
use crate::join::{balance_join, Drive};
use crate::model::{AllocationView, DemandRow, SupplyRow};
use crate::substitution::free_quantity_row;

/// Per-batch allocation for one material. Uses the same supply-driven join
/// as the substitution report, so the numbers of both views agree.
///
/// Totals are taken over the joined rows: demand on a batch that has no
/// stock line does not appear here.
pub fn allocation_view(
    material: &str,
    demand: &[DemandRow],
    supply: &[SupplyRow],
    catalog: Option<&ProductCatalog>,
) -> AllocationView {
    let joined = balance_join(
        demand.iter().filter(|d| d.key.material == material),
        supply.iter().filter(|s| s.key.material == material),
        Drive::Supply,
    );

    let rows: Vec<_> = joined.iter().map(|j| free_quantity_row(j, catalog)).collect();
    let total_stock: f64 = rows.iter().map(|r| r.stock_gudang).sum();
    let total_ordered: f64 = rows.iter().map(|r| r.qty_so_terpakai).sum();

    AllocationView {
        material: material.to_string(),
        product_name: catalog.and_then(|c| c.lookup(material)).map(str::to_string),
        rows,
        total_stock,
        total_ordered,
        balance: total_stock - total_ordered,
    }
}
