//! JSON and CSV sinks
//!
//! Files are written in place: there is no temp-file-and-rename step, so a
//! crash mid-write leaves a truncated file behind.

use crate::aggregate::Aggregates;
use crate::error::Result;
use crate::types::CampusRow;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Column names of the classification CSV
pub const CSV_HEADER: [&str; 5] = ["institution", "city", "state", "carnegie_basic", "campus"];

/// Serialize the raw-record accumulator as one JSON object
pub fn write_json_to<W: Write>(
    writer: W,
    institutions: &IndexMap<String, Vec<Value>>,
) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, institutions)?;
    writer.flush()?;
    Ok(())
}

/// Write the classification rows, header first
///
/// The header is emitted even when there are no rows.
pub fn write_csv_to<'a, W, I>(writer: W, rows: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = CampusRow<'a>>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    let mut count = 0;
    for row in rows {
        csv.serialize(row)?;
        count += 1;
    }
    csv.flush()?;
    Ok(count)
}

/// Write the raw JSON dump to `path`
pub fn write_json(path: &Path, aggregates: &Aggregates) -> Result<()> {
    let file = create(path)?;
    write_json_to(file, aggregates.institutions())?;
    info!(
        path = %path.display(),
        institutions = aggregates.institution_count(),
        "wrote JSON dump"
    );
    Ok(())
}

/// Write the classification CSV to `path`
pub fn write_csv(path: &Path, aggregates: &Aggregates) -> Result<usize> {
    let file = create(path)?;
    let rows = write_csv_to(file, aggregates.campus_rows())?;
    info!(path = %path.display(), rows, "wrote classification CSV");
    Ok(rows)
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
