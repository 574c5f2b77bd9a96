use serde::Serialize;

use crate::shipments::ShipmentList;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded source tables.
#[derive(Debug, Clone)]
pub struct ReconInput {
    pub orders: Table,
    pub stock: Table,
    pub mapping: Option<Table>,
}

/// Join key. Ordering is (material, batch), which is also the report order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchKey {
    pub material: String,
    pub batch: String,
}

impl BatchKey {
    pub fn new(material: impl Into<String>, batch: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            batch: batch.into(),
        }
    }
}

/// One sales-order line after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub key: BatchKey,
    pub ordered_quantity: Option<f64>,
    /// `None` when the shipment cell was blank.
    pub shipment_id: Option<String>,
}

/// One warehouse stock line after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLine {
    pub key: BatchKey,
    pub unrestricted_quantity: Option<f64>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DemandRow {
    pub key: BatchKey,
    pub total_ordered: f64,
    pub shipments: ShipmentList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyRow {
    pub key: BatchKey,
    pub stock_onhand: f64,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Demand row joined against supply. A deficit when `balance < 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRow {
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Product Name", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(rename = "Batch")]
    pub batch: String,
    #[serde(rename = "Total_Ordered")]
    pub total_ordered: f64,
    #[serde(rename = "Stock_Onhand")]
    pub stock_onhand: f64,
    #[serde(rename = "Balance")]
    pub balance: f64,
    #[serde(rename = "List_Shipment_Numbers")]
    pub shipment_list: String,
}

impl BalanceRow {
    pub fn is_deficit(&self) -> bool {
        self.balance < 0.0
    }
}

/// Physical batch of a deficient material with its free quantity net of
/// all demand placed on it. Also used for the per-SKU allocation view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstitutionRow {
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Product Name", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(rename = "Batch")]
    pub batch: String,
    #[serde(rename = "Stock_Gudang")]
    pub stock_gudang: f64,
    #[serde(rename = "Qty_SO_Terpakai")]
    pub qty_so_terpakai: f64,
    #[serde(rename = "Sisa_Stock_Bisa_Pakai")]
    pub sisa_stock_bisa_pakai: f64,
}

/// Single-material drill-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationView {
    pub material: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub rows: Vec<SubstitutionRow>,
    pub total_stock: f64,
    pub total_ordered: f64,
    pub balance: f64,
}

// ---------------------------------------------------------------------------
// Diagnostics + Summary + Output
// ---------------------------------------------------------------------------

/// What happened while turning one source table into lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadDiagnostics {
    pub table: String,
    pub rows_read: usize,
    /// Rows dropped because material or batch was blank.
    pub rows_skipped_blank_key: usize,
    pub quantities_missing: usize,
    /// Non-blank quantities that could not be parsed and were treated as 0.
    pub quantities_coerced: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub demand_rows: usize,
    pub supply_rows: usize,
    pub deficit_rows: usize,
    pub sufficient_rows: usize,
    pub deficient_materials: usize,
    pub substitution_rows: usize,
    /// Sum of `-balance` over deficit rows.
    pub total_shortfall: f64,
    pub all_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    /// Whether a product catalog was applied (drives the `Product Name` column).
    pub product_names: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub diagnostics: Vec<LoadDiagnostics>,
    pub deficits: Vec<BalanceRow>,
    pub substitutions: Vec<SubstitutionRow>,
    /// Every balance row, deficits and sufficient rows alike.
    pub balances: Vec<BalanceRow>,
}
