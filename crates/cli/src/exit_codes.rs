//! CLI Exit Code Registry
//!
//! Single source of truth for `stockgap` exit codes. Scripts gate on them,
//! so a code never changes meaning once released.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success; for `run`, no batch is short                |
//! | 1    | `run` found at least one deficit row                 |
//! | 2    | Usage error (bad arguments, unsupported extension)   |
//! | 3    | Input could not be read or parsed                    |
//! | 4    | Input table lacks a required column                  |
//! | 5    | Config file is not valid TOML or fails validation    |
//! | 6    | `sku` was given a material present in neither table  |

use stockgap_recon::ReconError;

/// Success - command completed, nothing short.
pub const EXIT_SUCCESS: u8 = 0;

/// Deficits found. Like `diff(1)`, 1 means "there is something to look at".
pub const EXIT_DEFICITS: u8 = 1;

/// Usage error - bad arguments, unsupported file extension.
pub const EXIT_USAGE: u8 = 2;

/// Input file missing, unreadable, or not a table.
pub const EXIT_INPUT: u8 = 3;

/// Required column missing from the order, stock or mapping table.
pub const EXIT_SCHEMA: u8 = 4;

/// Config parse or validation failure.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Material not present in orders or stock.
pub const EXIT_UNKNOWN_MATERIAL: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumn { .. } => EXIT_SCHEMA,
        ReconError::UnknownMaterial(_) => EXIT_UNKNOWN_MATERIAL,
        ReconError::Io(_) => EXIT_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_DEFICITS,
            EXIT_USAGE,
            EXIT_INPUT,
            EXIT_SCHEMA,
            EXIT_INVALID_CONFIG,
            EXIT_UNKNOWN_MATERIAL,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn recon_errors_map() {
        let missing = ReconError::MissingColumn { table: "stock".into(), column: "Batch".into() };
        assert_eq!(recon_exit_code(&missing), EXIT_SCHEMA);
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
        assert_eq!(recon_exit_code(&ReconError::UnknownMaterial("M9".into())), EXIT_UNKNOWN_MATERIAL);
        assert_eq!(recon_exit_code(&ReconError::Io("x".into())), EXIT_INPUT);
    }
}
