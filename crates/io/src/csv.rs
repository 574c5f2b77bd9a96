// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use stockgap_recon::Table;

use crate::report::ReportSheet;

/// Import a delimited file as a named table, sniffing the delimiter.
pub fn import_table(name: &str, path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_table_from_string(name, &content, delimiter)
}

pub fn import_table_tsv(name: &str, path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    import_table_from_string(name, &content, b'\t')
}

pub fn import_table_from_string(name: &str, content: &str, delimiter: u8) -> Result<Table, String> {
    let table = Table::from_delimited_str(name, content, delimiter).map_err(|e| e.to_string())?;
    log::debug!(
        "{name}: {} column(s), {} row(s), delimiter {:?}",
        table.headers.len(),
        table.len(),
        delimiter as char
    );
    Ok(table)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: lines agreeing with line 1, weighted by field count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Excel on Windows exports CSV as Windows-1252
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn sheet_to_string(sheet: &ReportSheet) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&sheet.headers).map_err(|e| e.to_string())?;
    for row in &sheet.rows {
        writer
            .write_record(row.iter().map(|c| c.to_plain()))
            .map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Single table as a plain CSV file (e.g. the deficit-only download).
pub fn export_sheet(sheet: &ReportSheet, path: &Path) -> Result<(), String> {
    let content = sheet_to_string(sheet)?;
    std::fs::write(path, content).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

/// Several tables in one text file, each introduced by a `# <title>` line
/// and separated by a blank line.
pub fn sections_to_string(sheets: &[ReportSheet]) -> Result<String, String> {
    let mut out = String::new();
    for (i, sheet) in sheets.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str("# ");
        out.push_str(&sheet.title);
        out.push('\n');
        out.push_str(&sheet_to_string(sheet)?);
    }
    Ok(out)
}

pub fn export_sections(sheets: &[ReportSheet], path: &Path) -> Result<(), String> {
    let content = sections_to_string(sheets)?;
    std::fs::write(path, content).map_err(|e| format!("cannot write {}: {e}", path.display()))
}
