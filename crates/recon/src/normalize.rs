use crate::table::CellValue;

/// Coerce one cell to a quantity. Text has `,` grouping separators removed
/// before parsing; anything unparseable or non-finite is missing.
pub fn normalize_quantity(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(n) => n.is_finite().then_some(*n),
        CellValue::Text(s) => parse_quantity_text(s),
    }
}

pub fn parse_quantity_text(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A normalized quantity column plus coercion counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedColumn {
    pub values: Vec<Option<f64>>,
    /// Values that ended up missing, blanks included.
    pub missing: usize,
    /// Non-blank values that failed to parse.
    pub coerced: usize,
}

pub fn normalize_column<'a, I>(cells: I) -> NormalizedColumn
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut out = NormalizedColumn::default();
    for cell in cells {
        let value = normalize_quantity(cell);
        if value.is_none() {
            out.missing += 1;
            if !cell.is_blank() {
                out.coerced += 1;
            }
        }
        out.values.push(value);
    }
    out
}
