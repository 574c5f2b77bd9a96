//! `stockgap-recon`: order-versus-stock batch deficit reconciliation.
//!
//! Pure engine crate: receives pre-loaded tables, returns the deficit,
//! substitution and allocation reports. No file IO.

pub mod aggregate;
pub mod allocation;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod join;
pub mod load;
pub mod model;
pub mod normalize;
pub mod session;
pub mod shipments;
pub mod substitution;
pub mod summary;
pub mod table;

pub use catalog::ProductCatalog;
pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{AllocationView, BalanceRow, ReconInput, ReconResult, SubstitutionRow};
pub use session::ReconSession;
pub use table::{CellValue, Table};
