// 📤 Extraction - raw_data → flat file, no transformation

use crate::records::RawRecord;
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Header for a set of records.
///
/// Each record's source column order, merged in first-seen order, so a file
/// that went through ingestion comes back out with its own header.
pub fn export_columns(records: &[RawRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for column in records.iter().flat_map(RawRecord::column_order) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}

/// Write records with a header row; absent values become empty cells
pub fn write_records<W: Write>(writer: W, records: &[RawRecord], delimiter: u8) -> Result<usize> {
    let columns = export_columns(records);

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(&columns)?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| record.column(c).unwrap_or("")))?;
    }
    wtr.flush()?;

    Ok(records.len())
}

/// Export raw_data to `path`, returning the number of rows written
pub fn extract<S: DocumentStore + ?Sized>(store: &S, path: &Path, delimiter: u8) -> Result<usize> {
    let records = store.load_raw_records().context("Failed to read raw_data")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let written = write_records(file, &records, delimiter)?;

    info!(rows = written, path = %path.display(), "extraction complete");
    Ok(written)
}
