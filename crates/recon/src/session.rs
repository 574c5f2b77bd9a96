//! Explicit context for one loaded pair of source tables.

use once_cell::sync::OnceCell;

use crate::config::ReconConfig;
use crate::engine::{reconcile, Reconciliation};
use crate::error::ReconError;
use crate::load::{parse_input, ParsedLines};
use crate::model::{AllocationView, ReconInput, ReconResult};

/// Holds the immutable source tables for a session, the memoized line
/// parse, and the material currently picked for drill-down.
///
/// Reports are recomputed on every call; only the table → line parse is
/// cached.
pub struct ReconSession {
    config: ReconConfig,
    input: ReconInput,
    parsed: OnceCell<ParsedLines>,
    selected_material: Option<String>,
}

impl ReconSession {
    pub fn new(config: ReconConfig, input: ReconInput) -> Self {
        Self {
            config,
            input,
            parsed: OnceCell::new(),
            selected_material: None,
        }
    }

    /// Parsed lines, loading them on first use.
    pub fn parsed(&self) -> Result<&ParsedLines, ReconError> {
        self.parsed.get_or_try_init(|| {
            log::debug!(
                "parsing {} order row(s), {} stock row(s)",
                self.input.orders.len(),
                self.input.stock.len()
            );
            parse_input(&self.config, &self.input)
        })
    }

    pub fn run(&self) -> Result<ReconResult, ReconError> {
        Ok(reconcile(&self.config, self.parsed()?))
    }

    /// Materials offered for drill-down: union of demand and supply, sorted.
    pub fn materials(&self) -> Result<Vec<String>, ReconError> {
        let parsed = self.parsed()?;
        let mut materials: Vec<String> = parsed
            .orders
            .iter()
            .map(|l| l.key.material.clone())
            .chain(parsed.stock.iter().map(|l| l.key.material.clone()))
            .collect();
        materials.sort();
        materials.dedup();
        Ok(materials)
    }

    pub fn select_material(&mut self, material: impl Into<String>) {
        self.selected_material = Some(material.into());
    }

    pub fn clear_selection(&mut self) {
        self.selected_material = None;
    }

    pub fn selected_material(&self) -> Option<&str> {
        self.selected_material.as_deref()
    }

    /// Allocation view for `material`. Unknown materials are an error so a
    /// typo is not reported as "no stock".
    pub fn allocation(&self, material: &str) -> Result<AllocationView, ReconError> {
        let recon = Reconciliation::new(self.parsed()?);
        if !recon.knows_material(material) {
            return Err(ReconError::UnknownMaterial(material.to_string()));
        }
        Ok(recon.allocation(material))
    }

    /// Allocation view for the selected material, if any.
    pub fn selected_allocation(&self) -> Result<Option<AllocationView>, ReconError> {
        match self.selected_material.as_deref() {
            Some(material) => self.allocation(material).map(Some),
            None => Ok(None),
        }
    }
}
