//! Skip manifest persistence

use crate::state::SkipReport;
use crate::HarvestError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the skip manifest inside the output directory
pub const MANIFEST_FILE: &str = "skipped.json";

pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILE)
}

/// Writes the report as a JSON object indented by four spaces
///
/// Keys are category ids, values are the skipped page numbers in the order
/// they were recorded.
pub fn write_skip_manifest(path: &Path, report: &SkipReport) -> Result<(), HarvestError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    report.serialize(&mut serializer)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Removes a manifest left behind by an earlier run
///
/// Returns true if a file was removed.
pub fn remove_stale_manifest(path: &Path) -> Result<bool, HarvestError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
