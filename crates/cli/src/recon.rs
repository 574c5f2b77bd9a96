//! `stockgap run | sku | materials | validate`

use std::path::{Path, PathBuf};

use clap::Args;
use stockgap_io::report;
use stockgap_recon::{ReconConfig, ReconInput, ReconSession, Table};

use crate::exit_codes::{EXIT_DEFICITS, EXIT_INVALID_CONFIG};
use crate::util::{format_qty, render_sheet};
use crate::CliError;

/// Source tables plus the optional column-mapping config.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Sales-order export (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(long)]
    pub orders: PathBuf,

    /// Warehouse stock export (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(long)]
    pub stock: PathBuf,

    /// Material code to product name table
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Column-mapping config (.toml); defaults to the standard export headers
    #[arg(long, env = "STOCKGAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Worksheet to read from an Excel orders file (default: first)
    #[arg(long)]
    pub sheet_orders: Option<String>,

    /// Worksheet to read from an Excel stock file (default: first)
    #[arg(long)]
    pub sheet_stock: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output JSON to stdout instead of tables
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file (.xlsx sheets, .csv sections, or .json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the deficit rows alone as a flat CSV (one header, no sections)
    #[arg(long, value_name = "PATH")]
    pub deficits_csv: Option<PathBuf>,

    /// Also export every balance row, not only deficits
    #[arg(long)]
    pub include_balances: bool,

    /// Print nothing; only the exit code tells the result
    #[arg(short, long)]
    pub quiet: bool,
}

// ============================================================================
// Loading
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReconConfig::from_toml(&config_str).map_err(CliError::recon)?;
    log::info!("config '{}' from {}", config.name, path.display());
    Ok(config)
}

fn load_input(args: &InputArgs) -> Result<ReconInput, CliError> {
    let orders = stockgap_io::load_table("orders", &args.orders, args.sheet_orders.as_deref())
        .map_err(CliError::io)?;
    let stock = stockgap_io::load_table("stock", &args.stock, args.sheet_stock.as_deref())
        .map_err(CliError::io)?;

    // A missing product catalog only costs the name column.
    let mapping: Option<Table> = match &args.mapping {
        Some(path) => match stockgap_io::load_table("mapping", path, None) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("product names unavailable: {e}");
                None
            }
        },
        None => None,
    };

    Ok(ReconInput { orders, stock, mapping })
}

fn open_session(args: &InputArgs) -> Result<ReconSession, CliError> {
    let config = load_config(args.config.as_deref())?;
    let input = load_input(args)?;
    Ok(ReconSession::new(config, input))
}

/// Reject an output path we cannot write before doing any work.
fn check_output_path(path: &Path) -> Result<(), CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" | "csv" | "json" => Ok(()),
        _ => Err(CliError::args(format!("unsupported output format: {}", path.display()))
            .with_hint("use a .xlsx, .csv or .json file name")),
    }
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    if let Some(ref path) = args.output {
        check_output_path(path)?;
    }

    let session = open_session(&args.input)?;
    let result = session.run().map_err(CliError::recon)?;

    if let Some(ref path) = args.output {
        stockgap_io::export_report(&result, path, args.include_balances).map_err(CliError::io)?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = args.deficits_csv {
        stockgap_io::export_deficits_csv(&result, path).map_err(CliError::io)?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if !args.quiet {
        let s = &result.summary;
        if s.all_clear {
            println!("No deficits: every ordered batch is covered by unrestricted stock.");
        } else {
            println!("{}", report::DEFICIT_TITLE);
            print!("{}", render_sheet(&report::deficit_sheet(&result)));
            println!();
            println!("{}", report::SUBSTITUTION_TITLE);
            print!("{}", render_sheet(&report::substitution_sheet(&result)));
        }
    }

    if !args.quiet {
        let s = &result.summary;
        eprintln!(
            "{}: {} ordered batch(es), {} stock batch(es), {} deficit(s) across {} material(s), shortfall {}",
            result.meta.config_name,
            s.demand_rows,
            s.supply_rows,
            s.deficit_rows,
            s.deficient_materials,
            format_qty(s.total_shortfall),
        );
    }

    if result.summary.all_clear {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_DEFICITS))
    }
}

// ============================================================================
// sku
// ============================================================================

pub fn cmd_sku(
    material: String,
    input: InputArgs,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    if let Some(ref path) = output {
        check_output_path(path)?;
    }

    let mut session = open_session(&input)?;
    session.select_material(material.trim());
    let view = match session.selected_allocation().map_err(CliError::recon)? {
        Some(view) => view,
        None => return Err(CliError::args("no material selected")),
    };

    if let Some(ref path) = output {
        stockgap_io::export_allocation(&view, path).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if json {
        let json_str = serde_json::to_string_pretty(&view)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    match &view.product_name {
        Some(name) => println!("{} ({})", view.material, name),
        None => println!("{}", view.material),
    }
    print!("{}", render_sheet(&report::allocation_sheet(&view)));
    Ok(())
}

// ============================================================================
// materials
// ============================================================================

pub fn cmd_materials(input: InputArgs) -> Result<(), CliError> {
    let session = open_session(&input)?;
    for material in session.materials().map_err(CliError::recon)? {
        println!("{material}");
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path)).map_err(|e| {
        if e.code == EXIT_INVALID_CONFIG {
            e.with_hint("an empty file is valid; only override the columns that differ")
        } else {
            e
        }
    })?;

    eprintln!(
        "valid: '{}' (orders: {} / {} / {} / {}; stock: {} / {} / {})",
        config.name,
        config.orders.material,
        config.orders.batch,
        config.orders.quantity,
        config.orders.shipment,
        config.stock.material,
        config.stock.batch,
        config.stock.quantity,
    );
    Ok(())
}
