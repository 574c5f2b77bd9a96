use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Column mapping and output options. Every field has a default, so an
/// empty TOML document is a valid config for the standard export layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub orders: OrderColumns,
    #[serde(default)]
    pub stock: StockColumns,
    #[serde(default)]
    pub mapping: MappingColumns,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "Stock deficit check".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            orders: OrderColumns::default(),
            stock: StockColumns::default(),
            mapping: MappingColumns::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mappings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderColumns {
    pub material: String,
    pub batch: String,
    pub quantity: String,
    pub shipment: String,
}

impl Default for OrderColumns {
    fn default() -> Self {
        Self {
            material: "Material".into(),
            batch: "Batch Number".into(),
            quantity: "Ordered Quantity".into(),
            shipment: "Shipment Number".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StockColumns {
    pub material: String,
    pub batch: String,
    pub quantity: String,
}

impl Default for StockColumns {
    fn default() -> Self {
        Self {
            material: "Material".into(),
            batch: "Batch".into(),
            quantity: "Unrestricted".into(),
        }
    }
}

/// Optional SKU → product description lookup table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MappingColumns {
    pub sku: String,
    pub description: String,
}

impl Default for MappingColumns {
    fn default() -> Self {
        Self {
            sku: "SKU SAP".into(),
            description: "Product Description".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Separator used when joining the distinct shipment numbers of a batch.
    pub shipment_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            shipment_separator: ", ".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        check_columns(
            "orders",
            &[
                ("material", &self.orders.material),
                ("batch", &self.orders.batch),
                ("quantity", &self.orders.quantity),
                ("shipment", &self.orders.shipment),
            ],
        )?;
        check_columns(
            "stock",
            &[
                ("material", &self.stock.material),
                ("batch", &self.stock.batch),
                ("quantity", &self.stock.quantity),
            ],
        )?;
        check_columns(
            "mapping",
            &[
                ("sku", &self.mapping.sku),
                ("description", &self.mapping.description),
            ],
        )?;

        if self.output.shipment_separator.is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.shipment_separator must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Column names must be non-empty and distinct within one table.
fn check_columns(table: &str, columns: &[(&str, &String)]) -> Result<(), ReconError> {
    for (i, (field, name)) in columns.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{table}.{field}: column name must not be empty"
            )));
        }
        if let Some((other, _)) = columns[..i].iter().find(|(_, n)| n == name) {
            return Err(ReconError::ConfigValidation(format!(
                "{table}.{field} and {table}.{other} both map to column '{name}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
