// 📥 Ingestion - flat file → repaired raw_data
//
// 1. Clean company_id and name on every row
// 2. Build the first-seen name directory over the whole batch
// 3. Drop rows without a usable id, repair the rest
// 4. Full-replace raw_data

use crate::error::InputError;
use crate::identity::{clean_identifier, clean_name};
use crate::records::{InputRow, RawRecord, COL_COMPANY_ID, COL_NAME};
use crate::repair::NameDirectory;
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 2] = [COL_COMPANY_ID, COL_NAME];

/// Counts from one ingestion run. `kept` is what landed in raw_data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub read: usize,
    pub kept: usize,
    /// Rows without a usable company_id
    pub dropped: usize,
    /// Kept rows whose name came from a sibling with the same id
    pub repaired: usize,
    /// Kept rows that fell back to the unknown-company sentinel
    pub defaulted: usize,
}

// ============================================================================
// INPUT FILE
// ============================================================================

/// Read the delimited input file into rows keyed by header.
///
/// Fails if the file is missing or lacks `company_id` / `name` columns.
pub fn read_input(path: &Path, delimiter: u8) -> Result<Vec<InputRow>> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("Failed to open input file")?;

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read input header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(InputError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            }
            .into());
        }
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read input row")?;
        let mut row = InputRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.set(header, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// REPAIR
// ============================================================================

/// Clean and repair a batch. Pure: no storage involved.
pub fn repair_rows(rows: &[InputRow]) -> (Vec<RawRecord>, IngestReport) {
    let cleaned: Vec<(Option<String>, Option<String>)> = rows
        .iter()
        .map(|row| {
            (
                clean_identifier(row.get(COL_COMPANY_ID)),
                clean_name(row.get(COL_NAME)),
            )
        })
        .collect();

    let directory = NameDirectory::from_pairs(
        cleaned
            .iter()
            .map(|(id, name)| (id.as_deref(), name.as_deref())),
    );

    let mut report = IngestReport {
        read: rows.len(),
        ..IngestReport::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (row, (id, name)) in rows.iter().zip(cleaned) {
        let Some(id) = id else {
            debug!(raw_id = ?row.get(COL_COMPANY_ID), "dropping row without usable company_id");
            report.dropped += 1;
            continue;
        };

        let resolved = directory.resolve(&id, name.as_deref());
        if name.is_none() {
            if directory.get(&id).is_some() {
                debug!(company_id = %id, name = %resolved, "repaired name from sibling record");
                report.repaired += 1;
            } else {
                report.defaulted += 1;
            }
        }

        records.push(RawRecord::from_row(row, id, resolved));
    }

    report.kept = records.len();
    (records, report)
}

// ============================================================================
// STAGE
// ============================================================================

/// Repair `rows` and replace raw_data with the result
pub fn ingest<S: DocumentStore + ?Sized>(store: &mut S, rows: &[InputRow]) -> Result<IngestReport> {
    let (records, report) = repair_rows(rows);

    store
        .replace_raw_records(&records)
        .context("Failed to write raw_data")?;

    info!(
        read = report.read,
        kept = report.kept,
        dropped = report.dropped,
        repaired = report.repaired,
        defaulted = report.defaulted,
        "ingestion complete"
    );

    Ok(report)
}

/// Read the input file and ingest it
pub fn ingest_file<S: DocumentStore + ?Sized>(
    store: &mut S,
    path: &Path,
    delimiter: u8,
) -> Result<IngestReport> {
    let rows = read_input(path, delimiter)?;
    ingest(store, &rows)
}
