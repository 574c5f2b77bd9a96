use std::collections::HashMap;

use crate::config::MappingColumns;
use crate::error::ReconError;
use crate::table::Table;

/// SKU → product description. Cosmetic only; never affects quantities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    names: HashMap<String, String>,
}

impl ProductCatalog {
    /// Build from a mapping table. Later rows win on duplicate SKUs; rows
    /// with a blank SKU or description are ignored.
    pub fn from_table(table: &Table, columns: &MappingColumns) -> Result<Self, ReconError> {
        let sku_idx = table.column_index(&columns.sku)?;
        let desc_idx = table.column_index(&columns.description)?;

        let mut names = HashMap::new();
        for row in &table.rows {
            let (Some(sku), Some(desc)) = (
                Table::cell(row, sku_idx).as_key(),
                Table::cell(row, desc_idx).as_key(),
            ) else {
                continue;
            };
            names.insert(sku, desc);
        }

        Ok(Self { names })
    }

    pub fn insert(&mut self, sku: impl Into<String>, name: impl Into<String>) {
        self.names.insert(sku.into(), name.into());
    }

    pub fn lookup(&self, material: &str) -> Option<&str> {
        self.names.get(material).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_rows_override() {
        let table = Table::from_csv_str(
            "mapping",
            "\
SKU SAP,Product Description,Brand
100,Old name,X
200,Gadget,Y
100,New name,X
300,,Z
",
        )
        .unwrap();
        let catalog = ProductCatalog::from_table(&table, &MappingColumns::default()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("100"), Some("New name"));
        assert_eq!(catalog.lookup("200"), Some("Gadget"));
        assert_eq!(catalog.lookup("300"), None);
    }

    #[test]
    fn missing_description_column() {
        let table = Table::from_csv_str("mapping", "SKU SAP,Name\n1,A\n").unwrap();
        let err = ProductCatalog::from_table(&table, &MappingColumns::default()).unwrap_err();
        assert!(err.to_string().contains("'Product Description'"));
    }
}
