//! Parsed tabular input handed to the engine by whoever loaded the files.

use serde::Serialize;

use crate::error::ReconError;

/// A single cell as delivered by the loader. CSV sources only produce
/// `Text`/`Empty`; spreadsheet sources may also deliver native numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_nan(),
        }
    }

    /// Identifier form used for material / batch / shipment keys.
    /// Returns `None` for blank cells.
    pub fn as_key(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.display())
    }

    /// Display form. Integral numbers render without a fractional part so
    /// that a spreadsheet SKU `100234` matches the CSV text `100234`.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number_key(*n),
        }
    }
}

fn format_number_key(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Named table with a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(|h| clean_header(&h)).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header, or a schema error naming both
    /// the table and the column.
    pub fn column_index(&self, column: &str) -> Result<usize, ReconError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| ReconError::MissingColumn {
                table: self.name.clone(),
                column: column.into(),
            })
    }

    /// Cell accessor tolerant of short (ragged) rows.
    pub fn cell<'a>(row: &'a [CellValue], idx: usize) -> &'a CellValue {
        row.get(idx).unwrap_or(&EMPTY)
    }

    /// Parse comma-separated text with a header row. Every field is kept as
    /// text; numeric coercion happens later in the normalizer.
    pub fn from_csv_str(name: &str, data: &str) -> Result<Self, ReconError> {
        Self::from_delimited_str(name, data, b',')
    }

    pub fn from_delimited_str(name: &str, data: &str, delimiter: u8) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ReconError::Io(format!("{name}: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut table = Table::new(name, headers);

        for record in reader.records() {
            let record = record.map_err(|e| ReconError::Io(format!("{name}: {e}")))?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            table.push_row(record.iter().map(CellValue::text).collect());
        }

        Ok(table)
    }
}

/// Strip a UTF-8 byte-order mark and surrounding whitespace from a header.
fn clean_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}
