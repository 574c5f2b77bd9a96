use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, duplicate column, etc.).
    ConfigValidation(String),
    /// Missing required column in an input table.
    MissingColumn { table: String, column: String },
    /// Allocation requested for a material present in neither table.
    UnknownMaterial(String),
    /// Malformed tabular input (CSV framing, ragged header, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::UnknownMaterial(material) => {
                write!(f, "material '{material}' not found in orders or stock")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
