// stockgap CLI - order-versus-stock batch deficit checks

mod exit_codes;
mod logging;
mod recon;
mod util;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_INPUT, EXIT_SUCCESS, EXIT_USAGE};
use recon::{InputArgs, RunArgs};

#[derive(Parser)]
#[command(name = "stockgap")]
#[command(about = "Compare sales-order demand against warehouse stock per material and batch")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log detail (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report batches where ordered quantity exceeds unrestricted stock
    #[command(after_help = "\
Examples:
  stockgap run --orders so_b2b.csv --stock loct_f211.xlsx
  stockgap run --orders so.csv --stock stock.csv --mapping sap_code.csv --output report.xlsx
  stockgap run --orders so.csv --stock stock.csv --json > result.json
  stockgap run --orders so.csv --stock stock.csv --deficits-csv defisit_stock_with_shipment.csv

Exit codes: 0 no deficits, 1 deficits found")]
    Run(RunArgs),

    /// Show how one material's stock is spread across its batches
    #[command(after_help = "\
Examples:
  stockgap sku 100234 --orders so.csv --stock stock.csv
  stockgap sku 100234 --orders so.csv --stock stock.csv --json")]
    Sku {
        /// Material code to drill into
        material: String,

        #[command(flatten)]
        input: InputArgs,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write the allocation table to a file (.csv, .xlsx or .json)
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },

    /// List every material present in orders or stock
    Materials {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate a column-mapping config without running
    #[command(after_help = "\
Examples:
  stockgap validate plant-a.recon.toml")]
    Validate {
        /// Path to the .toml config file
        config: std::path::PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Sku { material, input, json, output } => recon::cmd_sku(material, input, json, output),
        Commands::Materials { input } => recon::cmd_materials(input),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    /// Exit with `code` and print nothing (the report already said it).
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn recon(err: stockgap_recon::ReconError) -> Self {
        let hint = match &err {
            stockgap_recon::ReconError::MissingColumn { table, .. } => Some(format!(
                "column names are set per table in the config file ([{table}] section)"
            )),
            stockgap_recon::ReconError::UnknownMaterial(_) => {
                Some("`stockgap materials` lists the known material codes".to_string())
            }
            _ => None,
        };
        Self { code: exit_codes::recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
