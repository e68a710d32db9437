// SQLite-backed document store
//
// One table per collection. Every table carries a storage-internal
// `doc_id` (never exported) and an autoincrement `seq` that fixes
// iteration order. Full replaces run inside a single transaction.

use super::{Collection, DocumentStore};
use crate::records::{
    Charge, Company, DailyTotal, RawRecord, NO_DATE_KEY, TIMESTAMP_FORMAT,
};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path, wal: bool) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        if wal {
            // Enable WAL mode for crash recovery
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!(journal_mode = %mode, "opened database");
        }
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // raw_data: repaired ingestion output
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS raw_data (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT UNIQUE NOT NULL,
            company_id TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            amount TEXT,
            status TEXT,
            extra TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // charges + companies: transform output
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS charges (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT UNIQUE NOT NULL,
            company_id TEXT NOT NULL,
            company_name TEXT NOT NULL,
            amount REAL NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT UNIQUE NOT NULL,
            id TEXT UNIQUE NOT NULL,
            company_name TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_raw_company_id ON raw_data(company_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_charges_created_at ON charges(created_at)",
        [],
    )?;

    Ok(())
}

/// JSON document kept in `raw_data.extra`: pass-through values plus the
/// source row's column order
#[derive(Debug, Default, Serialize, Deserialize)]
struct PassThrough {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    columns: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    values: BTreeMap<String, String>,
}

impl PassThrough {
    fn to_json(record: &RawRecord) -> serde_json::Result<Option<String>> {
        if record.columns.is_empty() && record.extra.is_empty() {
            return Ok(None);
        }
        let doc = PassThrough {
            columns: record.columns.clone(),
            values: record.extra.clone(),
        };
        serde_json::to_string(&doc).map(Some)
    }

    fn from_json(json: Option<String>) -> serde_json::Result<Self> {
        match json {
            Some(json_str) => serde_json::from_str(&json_str),
            None => Ok(PassThrough::default()),
        }
    }
}

fn new_doc_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_stored_timestamp(column: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

impl DocumentStore for SqliteStore {
    fn replace_raw_records(&mut self, records: &[RawRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM raw_data", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO raw_data (doc_id, company_id, name, created_at, amount, status, extra)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for record in records {
                let extra_json = PassThrough::to_json(record)?;
                stmt.execute(params![
                    new_doc_id(),
                    record.company_id,
                    record.name,
                    record.created_at,
                    record.amount,
                    record.status,
                    extra_json,
                ])?;
            }
        }
        tx.commit().context("Failed to replace raw_data")?;

        debug!(count = records.len(), "replaced raw_data");
        Ok(records.len())
    }

    fn load_raw_records(&self) -> Result<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT company_id, name, created_at, amount, status, extra
             FROM raw_data
             ORDER BY seq",
        )?;

        let records = stmt
            .query_map([], |row| {
                let extra_json: Option<String> = row.get(5)?;
                let pass_through = PassThrough::from_json(extra_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                })?;

                Ok(RawRecord {
                    company_id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    amount: row.get(3)?,
                    status: row.get(4)?,
                    extra: pass_through.values,
                    columns: pass_through.columns,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn replace_derived(&mut self, charges: &[Charge], companies: &[Company]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM charges", [])?;
        tx.execute("DELETE FROM companies", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO charges (doc_id, company_id, company_name, amount, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for charge in charges {
                stmt.execute(params![
                    new_doc_id(),
                    charge.company_id,
                    charge.company_name,
                    charge.amount,
                    charge.status,
                    charge.created_at.as_ref().map(format_timestamp),
                    format_timestamp(&charge.updated_at),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO companies (doc_id, id, company_name) VALUES (?1, ?2, ?3)",
            )?;
            for company in companies {
                stmt.execute(params![new_doc_id(), company.id, company.company_name])?;
            }
        }
        tx.commit().context("Failed to replace charges and companies")?;

        debug!(
            charges = charges.len(),
            companies = companies.len(),
            "replaced charges and companies"
        );
        Ok(())
    }

    fn load_charges(&self) -> Result<Vec<Charge>> {
        let mut stmt = self.conn.prepare(
            "SELECT company_id, company_name, amount, status, created_at, updated_at
             FROM charges
             ORDER BY seq",
        )?;

        let charges = stmt
            .query_map([], |row| {
                let created_at: Option<String> = row.get(4)?;
                let updated_at: String = row.get(5)?;

                Ok(Charge {
                    company_id: row.get(0)?,
                    company_name: row.get(1)?,
                    amount: row.get(2)?,
                    status: row.get(3)?,
                    created_at: created_at
                        .map(|s| parse_stored_timestamp(4, &s))
                        .transpose()?,
                    updated_at: parse_stored_timestamp(5, &updated_at)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(charges)
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, company_name FROM companies ORDER BY seq")?;

        let companies = stmt
            .query_map([], |row| {
                Ok(Company {
                    id: row.get(0)?,
                    company_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(companies)
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.as_str());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn daily_totals(&self) -> Result<Vec<DailyTotal>> {
        // created_at is stored as YYYY-MM-DD HH:MM:SS, so the first ten
        // characters are the date key
        let mut stmt = self.conn.prepare(
            "SELECT
                COALESCE(substr(created_at, 1, 10), ?1) AS date_key,
                company_name,
                SUM(amount) AS total_amount
             FROM charges
             GROUP BY date_key, company_name
             ORDER BY date_key, company_name",
        )?;

        let totals = stmt
            .query_map([NO_DATE_KEY], |row| {
                Ok(DailyTotal {
                    date_key: row.get(0)?,
                    company_name: row.get(1)?,
                    total_amount: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }
}
