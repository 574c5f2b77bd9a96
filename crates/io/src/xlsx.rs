// Excel table import (xlsx, xls, xlsb, ods) and report export (xlsx only)
//
// Import: first row is the header; cells keep their native type so numeric
//         quantities skip text parsing.
// Export: one worksheet per report section, quantities as numbers.

use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use stockgap_recon::{CellValue, Table};

use crate::report::{ReportCell, ReportSheet};

/// Excel's worksheet name limit.
const MAX_SHEET_NAME: usize = 31;

/// Import one worksheet as a named table. Uses the first sheet unless
/// `sheet` names another one.
pub fn import_table(name: &str, path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file {}: {}", path.display(), e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(requested) => sheet_names
            .iter()
            .find(|n| n.as_str() == requested)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "sheet '{requested}' not found in {} (available: {})",
                    path.display(),
                    sheet_names.join(", ")
                )
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "Excel file contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| data_to_cell(c).display()).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(name, headers);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(data_to_cell).collect();
        if cells.iter().all(CellValue::is_blank) {
            continue;
        }
        table.push_row(cells);
    }

    log::debug!(
        "{name}: read sheet '{sheet_name}' ({} column(s), {} row(s))",
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.into()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::text(s.clone()),
        Data::DurationIso(s) => CellValue::text(s.clone()),
    }
}

/// Export statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportResult {
    pub sheets_exported: usize,
    pub rows_exported: usize,
    pub export_duration_ms: u128,
}

/// Write each report section to its own worksheet.
pub fn export_workbook(sheets: &[ReportSheet], path: &Path) -> Result<ExportResult, String> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    let header_format = Format::new().set_bold();
    let qty_format = Format::new().set_num_format("#,##0");

    let mut workbook = Workbook::new();

    for sheet in sheets {
        let name = sheet_name(&sheet.title);
        let worksheet = workbook
            .add_worksheet()
            .set_name(&name)
            .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))?;

        write_sheet(worksheet, sheet, &header_format, &qty_format)?;

        result.rows_exported += sheet.rows.len();
        result.sheets_exported += 1;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok(result)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &ReportSheet,
    header_format: &Format,
    qty_format: &Format,
) -> Result<(), String> {
    let err = |e: rust_xlsxwriter::XlsxError| format!("Failed to write sheet '{}': {}", sheet.title, e);

    let mut widths: Vec<usize> = sheet.headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, header_format)
            .map_err(err)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        // rust_xlsxwriter uses 0-based row/col as u32/u16
        let row32 = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col16 = col as u16;
            match cell {
                ReportCell::Text(s) => {
                    worksheet.write_string(row32, col16, s).map_err(err)?;
                }
                ReportCell::Number(n) => {
                    worksheet
                        .write_number_with_format(row32, col16, *n, qty_format)
                        .map_err(err)?;
                }
            }
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(cell.to_plain().chars().count());
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, (*width).min(60) as f64 + 2.0)
            .map_err(err)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(err)?;

    Ok(())
}

/// Worksheet names may not contain `[]:*?/\` and are limited to 31 chars.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".into()
    } else {
        cleaned
    }
}
