use crate::aggregate::{aggregate_demand, aggregate_supply};
use crate::allocation::allocation_view;
use crate::catalog::ProductCatalog;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::join::{balance_join, Drive};
use crate::load::{parse_input, ParsedLines};
use crate::model::{
    AllocationView, BalanceRow, DemandRow, ReconInput, ReconMeta, ReconResult, SupplyRow,
};
use crate::substitution::{deficient_materials, find_substitutions};
use crate::summary::compute_summary;

/// Run reconciliation per config. Fails only on schema errors; a run with
/// no deficits is a normal result with `summary.all_clear` set.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    let parsed = parse_input(config, input)?;
    Ok(reconcile(config, &parsed))
}

/// Aggregated demand and supply for one set of parsed lines. Everything
/// here is derived; nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    pub demand: Vec<DemandRow>,
    pub supply: Vec<SupplyRow>,
    catalog: Option<&'a ProductCatalog>,
}

impl<'a> Reconciliation<'a> {
    pub fn new(parsed: &'a ParsedLines) -> Self {
        let demand = aggregate_demand(&parsed.orders);
        let supply = aggregate_supply(&parsed.stock);
        log::debug!(
            "aggregated {} order line(s) into {} demand row(s), {} stock line(s) into {} supply row(s)",
            parsed.orders.len(),
            demand.len(),
            parsed.stock.len(),
            supply.len()
        );
        Self {
            demand,
            supply,
            catalog: parsed.catalog.as_ref(),
        }
    }

    /// One balance row per demand row, in (material, batch) order.
    pub fn balances(&self, shipment_separator: &str) -> Vec<BalanceRow> {
        balance_join(&self.demand, &self.supply, Drive::Demand)
            .into_iter()
            .map(|j| BalanceRow {
                material: j.key.material.clone(),
                product_name: self.product_name(&j.key.material),
                batch: j.key.batch.clone(),
                total_ordered: j.demand,
                stock_onhand: j.supply,
                balance: j.balance(),
                shipment_list: j
                    .shipments
                    .map(|s| s.join(shipment_separator))
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn allocation(&self, material: &str) -> AllocationView {
        allocation_view(material, &self.demand, &self.supply, self.catalog)
    }

    /// Whether `material` appears in either demand or supply.
    pub fn knows_material(&self, material: &str) -> bool {
        self.demand.iter().any(|d| d.key.material == material)
            || self.supply.iter().any(|s| s.key.material == material)
    }

    fn product_name(&self, material: &str) -> Option<String> {
        self.catalog
            .and_then(|c| c.lookup(material))
            .map(str::to_string)
    }
}

/// Split balance rows into (deficits, sufficient). Nothing is dropped or
/// duplicated: the two halves together are exactly the input.
pub fn partition_deficits(balances: Vec<BalanceRow>) -> (Vec<BalanceRow>, Vec<BalanceRow>) {
    balances.into_iter().partition(BalanceRow::is_deficit)
}

/// Aggregate, join, classify and build the substitution report.
pub fn reconcile(config: &ReconConfig, parsed: &ParsedLines) -> ReconResult {
    let recon = Reconciliation::new(parsed);
    let balances = recon.balances(&config.output.shipment_separator);
    let deficits: Vec<BalanceRow> = balances.iter().filter(|b| b.is_deficit()).cloned().collect();

    let materials = deficient_materials(&deficits);
    let substitutions = find_substitutions(&materials, &recon.demand, &recon.supply, recon.catalog);

    let summary = compute_summary(recon.demand.len(), recon.supply.len(), &balances, &substitutions);
    if summary.all_clear {
        log::info!("no deficits across {} demand row(s)", summary.demand_rows);
    } else {
        log::info!(
            "{} deficit batch(es) across {} material(s), shortfall {}",
            summary.deficit_rows,
            summary.deficient_materials,
            summary.total_shortfall
        );
    }

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            product_names: parsed.catalog.is_some(),
        },
        summary,
        diagnostics: parsed.diagnostics.clone(),
        deficits,
        substitutions,
        balances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    const ORDERS: &str = "\
Material,Batch Number,Ordered Quantity,Shipment Number
M1,B1,100,SH1
M1,B1,50,SH2
M2,B2,80,SH3
M4,B1,\"1,000\",SH4
";

    const STOCK: &str = "\
Material,Batch,Unrestricted
M1,B1,120
M1,B9,75
M4,B1,600
M4,B1,400
";

    fn input(orders: &str, stock: &str) -> ReconInput {
        ReconInput {
            orders: Table::from_csv_str("orders", orders).unwrap(),
            stock: Table::from_csv_str("stock", stock).unwrap(),
            mapping: None,
        }
    }

    #[test]
    fn deficits_and_balances() {
        let result = run(&ReconConfig::default(), &input(ORDERS, STOCK)).unwrap();

        assert_eq!(result.balances.len(), 3);
        assert_eq!(result.deficits.len(), 2);

        let m1 = &result.deficits[0];
        assert_eq!((m1.material.as_str(), m1.batch.as_str()), ("M1", "B1"));
        assert_eq!(m1.total_ordered, 150.0);
        assert_eq!(m1.stock_onhand, 120.0);
        assert_eq!(m1.balance, -30.0);
        assert_eq!(m1.shipment_list, "SH1, SH2");

        let m2 = &result.deficits[1];
        assert_eq!(m2.stock_onhand, 0.0);
        assert_eq!(m2.balance, -80.0);

        let m4 = &result.balances[2];
        assert_eq!(m4.balance, 0.0);
        assert!(!m4.is_deficit());
    }

    #[test]
    fn substitutions_cover_every_batch_of_deficient_material() {
        let result = run(&ReconConfig::default(), &input(ORDERS, STOCK)).unwrap();
        let subs: Vec<_> = result
            .substitutions
            .iter()
            .map(|s| (s.material.as_str(), s.batch.as_str(), s.sisa_stock_bisa_pakai))
            .collect();
        // M2 has no stock at all; M4 is not deficient.
        assert_eq!(subs, vec![("M1", "B9", 75.0), ("M1", "B1", -30.0)]);
        assert_eq!(result.summary.substitution_rows, 2);
    }

    #[test]
    fn all_clear_is_success() {
        let orders = "Material,Batch Number,Ordered Quantity,Shipment Number\nM1,B1,5,SH1\n";
        let stock = "Material,Batch,Unrestricted\nM1,B1,5\n";
        let result = run(&ReconConfig::default(), &input(orders, stock)).unwrap();
        assert!(result.summary.all_clear);
        assert!(result.deficits.is_empty());
        assert!(result.substitutions.is_empty());
        assert_eq!(result.balances.len(), 1);
    }

    #[test]
    fn partition_keeps_every_row() {
        let result = run(&ReconConfig::default(), &input(ORDERS, STOCK)).unwrap();
        let (deficits, sufficient) = partition_deficits(result.balances.clone());
        assert_eq!(deficits, result.deficits);
        assert_eq!(deficits.len() + sufficient.len(), result.balances.len());
        assert!(sufficient.iter().all(|r| r.balance >= 0.0));
    }

    #[test]
    fn custom_separator() {
        let mut config = ReconConfig::default();
        config.output.shipment_separator = " | ".into();
        let result = run(&config, &input(ORDERS, STOCK)).unwrap();
        assert_eq!(result.deficits[0].shipment_list, "SH1 | SH2");
    }

    #[test]
    fn idempotent() {
        let inp = input(ORDERS, STOCK);
        let a = run(&ReconConfig::default(), &inp).unwrap();
        let b = run(&ReconConfig::default(), &inp).unwrap();
        assert_eq!(a.deficits, b.deficits);
        assert_eq!(a.substitutions, b.substitutions);
        assert_eq!(a.balances, b.balances);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn load_order_does_not_matter() {
        let shuffled_orders = "\
Material,Batch Number,Ordered Quantity,Shipment Number
M4,B1,\"1,000\",SH4
M2,B2,80,SH3
M1,B1,100,SH1
M1,B1,50,SH2
";
        let shuffled_stock = "\
Material,Batch,Unrestricted
M4,B1,400
M1,B9,75
M4,B1,600
M1,B1,120
";
        let a = run(&ReconConfig::default(), &input(ORDERS, STOCK)).unwrap();
        let b = run(&ReconConfig::default(), &input(shuffled_orders, shuffled_stock)).unwrap();
        assert_eq!(a.deficits, b.deficits);
        assert_eq!(a.substitutions, b.substitutions);
    }

    #[test]
    fn schema_error_stops_run() {
        let err = run(
            &ReconConfig::default(),
            &input("Material,Batch,Ordered Quantity,Shipment Number\n", STOCK),
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { ref column, .. } if column == "Batch Number"));
    }

    #[test]
    fn product_names_flow_into_reports() {
        let mut inp = input(ORDERS, STOCK);
        inp.mapping = Some(
            Table::from_csv_str("mapping", "SKU SAP,Product Description\nM1,Widget\n").unwrap(),
        );
        let result = run(&ReconConfig::default(), &inp).unwrap();
        assert!(result.meta.product_names);
        assert_eq!(result.deficits[0].product_name.as_deref(), Some("Widget"));
        assert_eq!(result.deficits[1].product_name, None);
        assert!(result.substitutions.iter().all(|s| s.product_name.as_deref() == Some("Widget")));
    }
}
