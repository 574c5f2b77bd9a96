//! Schema check and line extraction for the source tables.

use crate::catalog::ProductCatalog;
use crate::config::{OrderColumns, ReconConfig, StockColumns};
use crate::error::ReconError;
use crate::model::{BatchKey, LoadDiagnostics, OrderLine, ReconInput, StockLine};
use crate::normalize::normalize_column;
use crate::table::{CellValue, Table};

/// Normalized lines for one reconciliation input. This is the part a
/// session memoizes; everything downstream is recomputed per run.
#[derive(Debug, Clone)]
pub struct ParsedLines {
    pub orders: Vec<OrderLine>,
    pub stock: Vec<StockLine>,
    pub catalog: Option<ProductCatalog>,
    pub diagnostics: Vec<LoadDiagnostics>,
}

/// Parse both source tables, plus the optional mapping table.
///
/// Both required tables are schema-checked before any row is read, so a
/// missing column fails the run without partial work. A broken mapping
/// table only disables product names.
pub fn parse_input(config: &ReconConfig, input: &ReconInput) -> Result<ParsedLines, ReconError> {
    let order_idx = OrderIndices::resolve(&input.orders, &config.orders)?;
    let stock_idx = StockIndices::resolve(&input.stock, &config.stock)?;

    let (orders, order_diag) = load_order_lines(&input.orders, &order_idx);
    let (stock, stock_diag) = load_stock_lines(&input.stock, &stock_idx);

    for diag in [&order_diag, &stock_diag] {
        if diag.quantities_coerced > 0 {
            log::warn!(
                "{}: {} quantity value(s) were not numeric and count as 0",
                diag.table,
                diag.quantities_coerced
            );
        }
        if diag.rows_skipped_blank_key > 0 {
            log::warn!(
                "{}: skipped {} row(s) with blank material or batch",
                diag.table,
                diag.rows_skipped_blank_key
            );
        }
    }

    let catalog = match &input.mapping {
        Some(table) => match ProductCatalog::from_table(table, &config.mapping) {
            Ok(catalog) if !catalog.is_empty() => Some(catalog),
            Ok(_) => {
                log::warn!("{}: no product descriptions found", table.name);
                None
            }
            Err(e) => {
                log::warn!("product names disabled: {e}");
                None
            }
        },
        None => None,
    };

    Ok(ParsedLines {
        orders,
        stock,
        catalog,
        diagnostics: vec![order_diag, stock_diag],
    })
}

struct OrderIndices {
    material: usize,
    batch: usize,
    quantity: usize,
    shipment: usize,
}

impl OrderIndices {
    fn resolve(table: &Table, columns: &OrderColumns) -> Result<Self, ReconError> {
        Ok(Self {
            material: table.column_index(&columns.material)?,
            batch: table.column_index(&columns.batch)?,
            quantity: table.column_index(&columns.quantity)?,
            shipment: table.column_index(&columns.shipment)?,
        })
    }
}

struct StockIndices {
    material: usize,
    batch: usize,
    quantity: usize,
}

impl StockIndices {
    fn resolve(table: &Table, columns: &StockColumns) -> Result<Self, ReconError> {
        Ok(Self {
            material: table.column_index(&columns.material)?,
            batch: table.column_index(&columns.batch)?,
            quantity: table.column_index(&columns.quantity)?,
        })
    }
}

fn row_key(row: &[CellValue], material: usize, batch: usize) -> Option<BatchKey> {
    let material = Table::cell(row, material).as_key()?;
    let batch = Table::cell(row, batch).as_key()?;
    Some(BatchKey { material, batch })
}

fn load_order_lines(table: &Table, idx: &OrderIndices) -> (Vec<OrderLine>, LoadDiagnostics) {
    let quantities = normalize_column(table.rows.iter().map(|r| Table::cell(r, idx.quantity)));
    let mut diag = LoadDiagnostics {
        table: table.name.clone(),
        rows_read: table.len(),
        quantities_missing: quantities.missing,
        quantities_coerced: quantities.coerced,
        ..Default::default()
    };

    let mut lines = Vec::with_capacity(table.len());
    for (row, quantity) in table.rows.iter().zip(quantities.values) {
        let Some(key) = row_key(row, idx.material, idx.batch) else {
            diag.rows_skipped_blank_key += 1;
            continue;
        };
        lines.push(OrderLine {
            key,
            ordered_quantity: quantity,
            shipment_id: Table::cell(row, idx.shipment).as_key(),
        });
    }

    (lines, diag)
}

fn load_stock_lines(table: &Table, idx: &StockIndices) -> (Vec<StockLine>, LoadDiagnostics) {
    let quantities = normalize_column(table.rows.iter().map(|r| Table::cell(r, idx.quantity)));
    let mut diag = LoadDiagnostics {
        table: table.name.clone(),
        rows_read: table.len(),
        quantities_missing: quantities.missing,
        quantities_coerced: quantities.coerced,
        ..Default::default()
    };

    let mut lines = Vec::with_capacity(table.len());
    for (row, quantity) in table.rows.iter().zip(quantities.values) {
        let Some(key) = row_key(row, idx.material, idx.batch) else {
            diag.rows_skipped_blank_key += 1;
            continue;
        };
        lines.push(StockLine {
            key,
            unrestricted_quantity: quantity,
        });
    }

    (lines, diag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(orders: &str, stock: &str) -> ReconInput {
        ReconInput {
            orders: Table::from_csv_str("orders", orders).unwrap(),
            stock: Table::from_csv_str("stock", stock).unwrap(),
            mapping: None,
        }
    }

    #[test]
    fn parses_lines_and_counts_coercions() {
        let parsed = parse_input(
            &ReconConfig::default(),
            &input(
                "\
Material,Batch Number,Ordered Quantity,Shipment Number
M1,B1,\"1,000\",SH1
M1,B1,abc,SH2
M1,,5,SH3
",
                "\
Material,Batch,Unrestricted
M1,B1,40
",
            ),
        )
        .unwrap();

        assert_eq!(parsed.orders.len(), 2);
        assert_eq!(parsed.orders[0].ordered_quantity, Some(1000.0));
        assert_eq!(parsed.orders[1].ordered_quantity, None);
        assert_eq!(parsed.orders[1].shipment_id.as_deref(), Some("SH2"));

        let order_diag = &parsed.diagnostics[0];
        assert_eq!(order_diag.table, "orders");
        assert_eq!(order_diag.rows_read, 3);
        assert_eq!(order_diag.rows_skipped_blank_key, 1);
        assert_eq!(order_diag.quantities_coerced, 1);
        assert_eq!(parsed.diagnostics[1].quantities_coerced, 0);
        assert!(parsed.catalog.is_none());
    }

    #[test]
    fn missing_stock_column_fails() {
        let err = parse_input(
            &ReconConfig::default(),
            &input(
                "Material,Batch Number,Ordered Quantity,Shipment Number\n",
                "Material,Batch\nM1,B1\n",
            ),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingColumn {
                table: "stock".into(),
                column: "Unrestricted".into(),
            }
        );
    }

    #[test]
    fn missing_shipment_column_fails() {
        let err = parse_input(
            &ReconConfig::default(),
            &input(
                "Material,Batch Number,Ordered Quantity\nM1,B1,5\n",
                "Material,Batch,Unrestricted\n",
            ),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'Shipment Number'"));
        assert!(err.to_string().contains("'orders'"));
    }

    #[test]
    fn broken_mapping_only_disables_names() {
        let mut inp = input(
            "Material,Batch Number,Ordered Quantity,Shipment Number\nM1,B1,5,SH1\n",
            "Material,Batch,Unrestricted\n",
        );
        inp.mapping = Some(Table::from_csv_str("mapping", "SKU,Name\nM1,Widget\n").unwrap());
        let parsed = parse_input(&ReconConfig::default(), &inp).unwrap();
        assert!(parsed.catalog.is_none());
        assert_eq!(parsed.orders.len(), 1);
    }
}
