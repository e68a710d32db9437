// 🔁 Transform - raw_data → charges + companies
//
// Re-derives both collections from scratch on every run. Given the same
// raw_data snapshot, the output differs only in `updated_at`; the report's
// fingerprint covers everything else so two runs can be compared.

use crate::identity::is_valid_identifier;
use crate::records::{
    Charge, Company, RawRecord, DATE_FORMAT, TIMESTAMP_FORMAT, UNKNOWN_STATUS,
};
use crate::repair::NameDirectory;
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Counts and content fingerprint of one transform run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReport {
    pub charges: usize,
    pub companies: usize,
    /// SHA-256 over every derived field except `updated_at`
    pub fingerprint: String,
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse `YYYY-MM-DD HH:MM:SS`, falling back to `YYYY-MM-DD` (midnight).
/// Anything else, including a missing value, is None.
///
/// The year must be exactly four digits; chrono alone would also take
/// short and signed years.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?;

    if !has_four_digit_year(value) {
        return None;
    }

    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Some(ts);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn has_four_digit_year(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// Parse an amount, 0.0 when absent or not a number
pub fn parse_amount(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

// ============================================================================
// DERIVATION
// ============================================================================

/// Derive charges and the company directory from raw records.
///
/// Records whose company_id is not a clean identifier are skipped outright.
/// The first name seen for an id becomes its company_name.
pub fn derive(records: &[RawRecord], run_time: NaiveDateTime) -> (Vec<Charge>, Vec<Company>) {
    let mut directory = NameDirectory::new();
    let mut charges = Vec::with_capacity(records.len());

    for record in records {
        if !is_valid_identifier(&record.company_id) {
            debug!(company_id = %record.company_id, "skipping record with invalid company_id");
            continue;
        }

        directory.register(&record.company_id, &record.name);

        charges.push(Charge {
            company_id: record.company_id.clone(),
            company_name: record.name.clone(),
            amount: parse_amount(record.amount.as_deref()),
            status: record
                .status
                .clone()
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            created_at: parse_date(Some(record.created_at.as_str())),
            updated_at: run_time,
        });
    }

    (charges, directory.into_companies())
}

/// Content hash of a derived set, ignoring `updated_at`
pub fn fingerprint(charges: &[Charge], companies: &[Company]) -> String {
    let mut hasher = Sha256::new();

    for charge in charges {
        let created_at = charge
            .created_at
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        hasher.update(format!(
            "C|{}|{}|{}|{}|{}\n",
            charge.company_id, charge.company_name, charge.amount, charge.status, created_at
        ));
    }

    for company in companies {
        hasher.update(format!("K|{}|{}\n", company.id, company.company_name));
    }

    format!("{:x}", hasher.finalize())
}

// ============================================================================
// STAGE
// ============================================================================

/// Run the transform stamped with the current time
pub fn transform<S: DocumentStore + ?Sized>(store: &mut S) -> Result<TransformReport> {
    let now = Utc::now().naive_utc();
    // Stored timestamps carry whole seconds
    let now = now.with_nanosecond(0).unwrap_or(now);
    transform_at(store, now)
}

/// Run the transform with an explicit `updated_at`
pub fn transform_at<S: DocumentStore + ?Sized>(
    store: &mut S,
    run_time: NaiveDateTime,
) -> Result<TransformReport> {
    let records = store
        .load_raw_records()
        .context("Failed to read raw_data")?;

    let (charges, companies) = derive(&records, run_time);

    store
        .replace_derived(&charges, &companies)
        .context("Failed to write charges and companies")?;

    let report = TransformReport {
        charges: charges.len(),
        companies: companies.len(),
        fingerprint: fingerprint(&charges, &companies),
    };

    info!(
        charges = report.charges,
        companies = report.companies,
        "transform complete"
    );

    Ok(report)
}
