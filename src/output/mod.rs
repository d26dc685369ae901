//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing one CSV file of records per category
//! - Writing the skip manifest when pages were skipped
//! - Summarizing a run for the terminal

mod csv;
mod manifest;
pub mod stats;

pub use csv::{records_path, write_records, write_records_to, RECORD_COLUMNS};
pub use manifest::{manifest_path, remove_stale_manifest, write_skip_manifest, MANIFEST_FILE};
pub use stats::{print_summary, CategorySummary, RunSummary};

use crate::HarvestError;
use std::path::Path;

/// Creates the output directory and any missing parents
pub fn ensure_output_dir(path: &Path) -> Result<(), HarvestError> {
    if !path.as_os_str().is_empty() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
