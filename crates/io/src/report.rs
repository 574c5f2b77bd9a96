// Report layout shared by the CSV and XLSX writers

use stockgap_recon::model::{AllocationView, BalanceRow, ReconResult, SubstitutionRow};

#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
}

impl ReportCell {
    /// Plain text form for delimited output. Integral quantities print
    /// without a fractional part.
    pub fn to_plain(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_plain(*n),
        }
    }
}

pub fn format_plain(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One labeled table of an export (a CSV section or an XLSX sheet).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

pub const DEFICIT_TITLE: &str = "Deficit";
pub const SUBSTITUTION_TITLE: &str = "Substitution";
pub const BALANCE_TITLE: &str = "Balances";

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn balance_sheet_rows(title: &str, rows: &[BalanceRow], product_names: bool) -> ReportSheet {
    let mut cols = vec!["Material"];
    if product_names {
        cols.push("Product Name");
    }
    cols.extend(["Batch", "Total_Ordered", "Stock_Onhand", "Balance", "List_Shipment_Numbers"]);

    let rows = rows
        .iter()
        .map(|r| {
            let mut cells = vec![ReportCell::Text(r.material.clone())];
            if product_names {
                cells.push(ReportCell::Text(r.product_name.clone().unwrap_or_default()));
            }
            cells.extend([
                ReportCell::Text(r.batch.clone()),
                ReportCell::Number(r.total_ordered),
                ReportCell::Number(r.stock_onhand),
                ReportCell::Number(r.balance),
                ReportCell::Text(r.shipment_list.clone()),
            ]);
            cells
        })
        .collect();

    ReportSheet {
        title: title.into(),
        headers: headers(&cols),
        rows,
    }
}

fn free_quantity_rows(title: &str, rows: &[SubstitutionRow], product_names: bool) -> ReportSheet {
    let mut cols = vec!["Material"];
    if product_names {
        cols.push("Product Name");
    }
    cols.extend(["Batch", "Stock_Gudang", "Qty_SO_Terpakai", "Sisa_Stock_Bisa_Pakai"]);

    let rows = rows
        .iter()
        .map(|r| {
            let mut cells = vec![ReportCell::Text(r.material.clone())];
            if product_names {
                cells.push(ReportCell::Text(r.product_name.clone().unwrap_or_default()));
            }
            cells.extend([
                ReportCell::Text(r.batch.clone()),
                ReportCell::Number(r.stock_gudang),
                ReportCell::Number(r.qty_so_terpakai),
                ReportCell::Number(r.sisa_stock_bisa_pakai),
            ]);
            cells
        })
        .collect();

    ReportSheet {
        title: title.into(),
        headers: headers(&cols),
        rows,
    }
}

pub fn deficit_sheet(result: &ReconResult) -> ReportSheet {
    balance_sheet_rows(DEFICIT_TITLE, &result.deficits, result.meta.product_names)
}

pub fn substitution_sheet(result: &ReconResult) -> ReportSheet {
    free_quantity_rows(SUBSTITUTION_TITLE, &result.substitutions, result.meta.product_names)
}

pub fn balance_sheet(result: &ReconResult) -> ReportSheet {
    balance_sheet_rows(BALANCE_TITLE, &result.balances, result.meta.product_names)
}

/// Deficit and substitution sections, plus every balance row when asked.
pub fn report_sheets(result: &ReconResult, include_balances: bool) -> Vec<ReportSheet> {
    let mut sheets = vec![deficit_sheet(result), substitution_sheet(result)];
    if include_balances {
        sheets.push(balance_sheet(result));
    }
    sheets
}

/// Allocation rows for one material followed by a `TOTAL` row.
pub fn allocation_sheet(view: &AllocationView) -> ReportSheet {
    let mut sheet = free_quantity_rows(&view.material, &view.rows, false);
    sheet.rows.push(vec![
        ReportCell::Text("TOTAL".into()),
        ReportCell::Text(String::new()),
        ReportCell::Number(view.total_stock),
        ReportCell::Number(view.total_ordered),
        ReportCell::Number(view.balance),
    ]);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockgap_recon::{ReconConfig, ReconInput, Table};

    fn result(with_mapping: bool) -> ReconResult {
        let input = ReconInput {
            orders: Table::from_csv_str(
                "orders",
                "Material,Batch Number,Ordered Quantity,Shipment Number\nM1,B1,100,SH1\nM1,B1,50,SH2\n",
            )
            .unwrap(),
            stock: Table::from_csv_str("stock", "Material,Batch,Unrestricted\nM1,B1,120\nM1,B2,7.5\n")
                .unwrap(),
            mapping: with_mapping.then(|| {
                Table::from_csv_str("mapping", "SKU SAP,Product Description\nM1,Widget\n").unwrap()
            }),
        };
        stockgap_recon::run(&ReconConfig::default(), &input).unwrap()
    }

    #[test]
    fn deficit_columns_follow_catalog() {
        let plain = deficit_sheet(&result(false));
        assert_eq!(
            plain.headers,
            vec!["Material", "Batch", "Total_Ordered", "Stock_Onhand", "Balance", "List_Shipment_Numbers"]
        );
        assert_eq!(plain.rows[0][4], ReportCell::Number(-30.0));

        let named = deficit_sheet(&result(true));
        assert_eq!(named.headers[1], "Product Name");
        assert_eq!(named.rows[0][1], ReportCell::Text("Widget".into()));
    }

    #[test]
    fn substitution_sheet_order() {
        let sheet = substitution_sheet(&result(false));
        let batches: Vec<_> = sheet.rows.iter().map(|r| r[1].to_plain()).collect();
        assert_eq!(batches, vec!["B2", "B1"]);
        assert_eq!(sheet.rows[0][4].to_plain(), "7.5");
    }

    #[test]
    fn balances_only_on_request() {
        let r = result(false);
        assert_eq!(report_sheets(&r, false).len(), 2);
        let sheets = report_sheets(&r, true);
        assert_eq!(sheets[2].title, BALANCE_TITLE);
        assert_eq!(sheets[2].rows.len(), 1);
    }

    #[test]
    fn allocation_total_row() {
        let view = AllocationView {
            material: "M1".into(),
            product_name: None,
            rows: vec![],
            total_stock: 127.5,
            total_ordered: 150.0,
            balance: -22.5,
        };
        let sheet = allocation_sheet(&view);
        assert_eq!(sheet.title, "M1");
        let total = sheet.rows.last().unwrap();
        assert_eq!(total[0], ReportCell::Text("TOTAL".into()));
        assert_eq!(total[4], ReportCell::Number(-22.5));
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(format_plain(150.0), "150");
        assert_eq!(format_plain(-30.0), "-30");
        assert_eq!(format_plain(0.25), "0.25");
    }
}
