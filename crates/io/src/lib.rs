// File I/O operations

pub mod csv;
pub mod json;
pub mod report;
pub mod xlsx;

use std::path::Path;

use stockgap_recon::model::{AllocationView, ReconResult};
use stockgap_recon::Table;

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Excel),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load one input table by extension. `sheet` only applies to Excel files.
pub fn load_table(name: &str, path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Csv) => csv::import_table(name, path),
        Some(FileFormat::Tsv) => csv::import_table_tsv(name, path),
        Some(FileFormat::Excel) => xlsx::import_table(name, path, sheet),
        Some(FileFormat::Json) | None => Err(format!(
            "unsupported input format: {} (expected .csv, .tsv, .xlsx, .xls or .ods)",
            path.display()
        )),
    }
}

/// Write the deficit and substitution reports.
///
/// - `.xlsx`: one worksheet per section
/// - `.csv`: labeled sections in one file
/// - `.json`: the full result
pub fn export_report(result: &ReconResult, path: &Path, include_balances: bool) -> Result<(), String> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Excel) if is_xlsx(path) => {
            let sheets = report::report_sheets(result, include_balances);
            let stats = xlsx::export_workbook(&sheets, path)?;
            log::info!(
                "wrote {} sheet(s), {} row(s) to {} in {} ms",
                stats.sheets_exported,
                stats.rows_exported,
                path.display(),
                stats.export_duration_ms
            );
            Ok(())
        }
        Some(FileFormat::Csv) => {
            let sheets = report::report_sheets(result, include_balances);
            csv::export_sections(&sheets, path)
        }
        Some(FileFormat::Json) => json::export(result, path),
        _ => Err(format!(
            "unsupported output format: {} (expected .xlsx, .csv or .json)",
            path.display()
        )),
    }
}

/// Deficit rows alone as a flat CSV.
pub fn export_deficits_csv(result: &ReconResult, path: &Path) -> Result<(), String> {
    csv::export_sheet(&report::deficit_sheet(result), path)
}

/// One material's allocation view, including its total row.
pub fn export_allocation(view: &AllocationView, path: &Path) -> Result<(), String> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Excel) if is_xlsx(path) => {
            xlsx::export_workbook(&[report::allocation_sheet(view)], path).map(|_| ())
        }
        Some(FileFormat::Csv) => csv::export_sheet(&report::allocation_sheet(view), path),
        Some(FileFormat::Json) => json::export(view, path),
        _ => Err(format!(
            "unsupported output format: {} (expected .xlsx, .csv or .json)",
            path.display()
        )),
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stockgap_recon::{CellValue, ReconConfig, ReconInput};
    use tempfile::tempdir;

    fn sample_result() -> ReconResult {
        let input = ReconInput {
            orders: Table::from_csv_str(
                "orders",
                "Material,Batch Number,Ordered Quantity,Shipment Number\nM1,B1,100,SH1\nM1,B1,50,SH2\n",
            )
            .unwrap(),
            stock: Table::from_csv_str("stock", "Material,Batch,Unrestricted\nM1,B1,120\nM1,B9,75\n")
                .unwrap(),
            mapping: None,
        };
        stockgap_recon::run(&ReconConfig::default(), &input).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("so.CSV")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("stock.xls")), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_path(Path::new("out.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_table_dispatch() {
        let dir = tempdir().unwrap();
        let tsv = dir.path().join("stock.tsv");
        fs::write(&tsv, "Material\tBatch\tUnrestricted\nM1\tB1\t10\n").unwrap();
        let table = load_table("stock", &tsv, None).unwrap();
        assert_eq!(table.rows[0][2], CellValue::Text("10".into()));

        let err = load_table("stock", &dir.path().join("stock.pdf"), None).unwrap_err();
        assert!(err.contains("unsupported input format"));
    }

    #[test]
    fn test_export_report_xlsx_sheets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_report(&sample_result(), &path, true).unwrap();

        let deficit = xlsx::import_table("d", &path, Some(report::DEFICIT_TITLE)).unwrap();
        assert_eq!(deficit.rows[0][4], CellValue::Number(-30.0));
        let subs = xlsx::import_table("s", &path, Some(report::SUBSTITUTION_TITLE)).unwrap();
        assert_eq!(subs.len(), 2);
        let balances = xlsx::import_table("b", &path, Some(report::BALANCE_TITLE)).unwrap();
        assert_eq!(balances.len(), 1);
    }

    #[test]
    fn test_export_report_csv_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_report(&sample_result(), &path, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Deficit\n"));
        assert!(content.contains("\n# Substitution\n"));
        assert!(!content.contains("# Balances"));
    }

    #[test]
    fn test_export_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let err = export_report(&sample_result(), &dir.path().join("r.xls"), false).unwrap_err();
        assert!(err.contains("unsupported output format"));
    }

    #[test]
    fn test_deficits_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("defisit.csv");
        export_deficits_csv(&sample_result(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Material,Batch,Total_Ordered,Stock_Onhand,Balance,List_Shipment_Numbers\nM1,B1,150,120,-30,\"SH1, SH2\"\n"
        );
    }
}
