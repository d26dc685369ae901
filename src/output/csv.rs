//! CSV serialization of extracted records

use crate::extract::Record;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column names written as the first row of every records file
pub const RECORD_COLUMNS: [&str; 2] = ["title", "link"];

/// Path of the records file for one category
pub fn records_path(output_dir: &Path, category: u32) -> PathBuf {
    output_dir.join(format!("forti_lists_{}.csv", category))
}

/// Writes the header and one row per record, replacing any existing file
///
/// Fields containing a comma, quote or line break are quoted with embedded
/// quotes doubled.
pub fn write_records(path: &Path, records: &[Record]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_records_to(&mut writer, records)?;
    writer.flush()
}

/// Serializes records to any writer
pub fn write_records_to<W: Write>(mut w: W, records: &[Record]) -> io::Result<()> {
    write_row(&mut w, &RECORD_COLUMNS)?;
    for record in records {
        write_row(&mut w, &[record.title.as_str(), record.link.as_str()])?;
    }
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            w.write_all(b",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    writeln!(w)
}
