use std::collections::BTreeSet;

use crate::catalog::ProductCatalog;
use crate::join::{balance_join, Drive, JoinedRow};
use crate::model::{BalanceRow, DemandRow, SubstitutionRow, SupplyRow};

/// Distinct materials with at least one deficit row.
pub fn deficient_materials(deficits: &[BalanceRow]) -> BTreeSet<&str> {
    deficits
        .iter()
        .filter(|r| r.is_deficit())
        .map(|r| r.material.as_str())
        .collect()
}

/// Every physical batch of the given materials with its free quantity net
/// of all demand on that batch, not only the demand that caused a deficit.
///
/// Sorted by material ascending, then free quantity descending.
pub fn find_substitutions(
    materials: &BTreeSet<&str>,
    demand: &[DemandRow],
    supply: &[SupplyRow],
    catalog: Option<&ProductCatalog>,
) -> Vec<SubstitutionRow> {
    if materials.is_empty() {
        return Vec::new();
    }

    let in_scope = |material: &str| materials.contains(material);
    let joined = balance_join(
        demand.iter().filter(|d| in_scope(d.key.material.as_str())),
        supply.iter().filter(|s| in_scope(s.key.material.as_str())),
        Drive::Supply,
    );

    let mut rows: Vec<SubstitutionRow> = joined.iter().map(|j| free_quantity_row(j, catalog)).collect();
    rows.sort_by(|a, b| {
        a.material
            .cmp(&b.material)
            .then_with(|| b.sisa_stock_bisa_pakai.total_cmp(&a.sisa_stock_bisa_pakai))
            .then_with(|| a.batch.cmp(&b.batch))
    });

    log::debug!(
        "substitution: {} material(s), {} batch row(s)",
        materials.len(),
        rows.len()
    );
    rows
}

/// Shape a supply-driven joined row for the substitution and allocation
/// reports.
pub(crate) fn free_quantity_row(joined: &JoinedRow<'_>, catalog: Option<&ProductCatalog>) -> SubstitutionRow {
    SubstitutionRow {
        material: joined.key.material.clone(),
        product_name: catalog
            .and_then(|c| c.lookup(&joined.key.material))
            .map(str::to_string),
        batch: joined.key.batch.clone(),
        stock_gudang: joined.supply,
        qty_so_terpakai: joined.demand,
        sisa_stock_bisa_pakai: joined.balance(),
    }
}
