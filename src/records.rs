// 📄 Records - input rows, repaired raw records, and derived entities
//
// Known fields are typed; every other input column rides along in `extra`
// untouched, the same way the old transaction model carried `metadata`.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

// ============================================================================
// SENTINELS
// ============================================================================

/// Name given to a record whose own name and every sibling's name are unusable
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// created_at value for a record that came in without one
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Charge status when the input carried none
pub const UNKNOWN_STATUS: &str = "unknown";

/// Date key for charges without a parseable created_at
pub const NO_DATE_KEY: &str = "Sin fecha";

/// Timestamp layout used for storage and for `parse_date`'s first attempt
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date layout used for `parse_date`'s fallback and for date keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cell values that mean "no value", same set pandas' read_csv treats as NA
pub const MISSING_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

// Column names with meaning to the pipeline
pub const COL_COMPANY_ID: &str = "company_id";
pub const COL_NAME: &str = "name";
pub const COL_CREATED_AT: &str = "created_at";
pub const COL_AMOUNT: &str = "amount";
pub const COL_STATUS: &str = "status";

const KNOWN_COLUMNS: [&str; 5] = [COL_COMPANY_ID, COL_NAME, COL_CREATED_AT, COL_AMOUNT, COL_STATUS];

/// True for an empty cell or one of the NA markers
pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

// ============================================================================
// INPUT ROW
// ============================================================================

/// One row of the flat input file, keyed by header.
///
/// Empty and NA-marker cells are not stored, so `get` treats them as
/// absent. Column order is kept as cells are set, present or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRow {
    cells: BTreeMap<String, String>,
    columns: Vec<String>,
}

impl InputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add a cell (missing values are dropped)
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }

        if is_missing(value) {
            self.cells.remove(column);
        } else {
            self.cells.insert(column.to_string(), value.to_string());
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Every column this row was built with, in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cells whose column has no dedicated field on `RawRecord`
    pub fn pass_through(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .filter(|(k, _)| !KNOWN_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// A repaired input row as persisted in `raw_data`.
///
/// Invariant: `company_id` is a clean identifier and `name` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub company_id: String,
    pub name: String,
    pub created_at: String,
    pub amount: Option<String>,
    pub status: Option<String>,

    /// Input columns with no meaning to the pipeline, passed through as-is
    pub extra: BTreeMap<String, String>,

    /// Header order of the source row; empty when built by hand
    pub columns: Vec<String>,
}

impl RawRecord {
    /// Build a record from an input row plus its repaired identity fields
    pub fn from_row(row: &InputRow, company_id: String, name: String) -> Self {
        let mut columns = row.columns().to_vec();
        if !columns.iter().any(|c| c == COL_CREATED_AT) {
            columns.push(COL_CREATED_AT.to_string());
        }

        RawRecord {
            company_id,
            name,
            created_at: row.get(COL_CREATED_AT).unwrap_or(UNKNOWN_DATE).to_string(),
            amount: row.get(COL_AMOUNT).map(str::to_string),
            status: row.get(COL_STATUS).map(str::to_string),
            extra: row.pass_through(),
            columns,
        }
    }

    /// Value of any column by name, known or pass-through
    pub fn column(&self, column: &str) -> Option<&str> {
        match column {
            COL_COMPANY_ID => Some(&self.company_id),
            COL_NAME => Some(&self.name),
            COL_CREATED_AT => Some(&self.created_at),
            COL_AMOUNT => self.amount.as_deref(),
            COL_STATUS => self.status.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Columns in source order, or for hand-built records: identity
    /// columns, amount/status if set, then pass-through columns sorted
    pub fn column_order(&self) -> Vec<String> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }

        let mut columns: Vec<String> = [COL_COMPANY_ID, COL_NAME, COL_CREATED_AT]
            .iter()
            .map(|c| c.to_string())
            .collect();
        if self.amount.is_some() {
            columns.push(COL_AMOUNT.to_string());
        }
        if self.status.is_some() {
            columns.push(COL_STATUS.to_string());
        }
        columns.extend(self.extra.keys().cloned());
        columns
    }
}

// ============================================================================
// DERIVED ENTITIES
// ============================================================================

/// One monetary event derived from a raw record
#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    pub company_id: String,
    pub company_name: String,
    pub amount: f64,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl Charge {
    /// `YYYY-MM-DD` of created_at, or the no-date sentinel
    pub fn date_key(&self) -> String {
        match self.created_at {
            Some(ts) => ts.format(DATE_FORMAT).to_string(),
            None => NO_DATE_KEY.to_string(),
        }
    }
}

/// Deduplicated company directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: String,
    pub company_name: String,
}

/// One row of the day × company view
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date_key: String,
    pub company_name: String,
    pub total_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_input_row_drops_empty_cells() {
        let row = InputRow::new()
            .with("company_id", "ab12")
            .with("name", "")
            .with("paid_at", "");

        assert_eq!(row.get("company_id"), Some("ab12"));
        assert_eq!(row.get("name"), None);
        assert_eq!(row.get("paid_at"), None);
        assert_eq!(row.columns(), ["company_id", "name", "paid_at"]);
    }

    #[test]
    fn test_input_row_treats_na_markers_as_missing() {
        let row = InputRow::new()
            .with("name", "nan")
            .with("created_at", "NULL")
            .with("amount", "N/A")
            .with("status", "<NA>")
            .with("id", "Nancy");

        assert_eq!(row.get("name"), None);
        assert_eq!(row.get("created_at"), None);
        assert_eq!(row.get("amount"), None);
        assert_eq!(row.get("status"), None);
        assert_eq!(row.get("id"), Some("Nancy"));
        assert!(is_missing("None"));
        assert!(!is_missing(" nan "));
    }

    #[test]
    fn test_from_row_splits_known_and_extra() {
        let row = InputRow::new()
            .with("id", "c-1")
            .with("company_id", "AB12")
            .with("name", "acme")
            .with("amount", "10.5")
            .with("paid_at", "2024-01-02");

        let record = RawRecord::from_row(&row, "ab12".to_string(), "Acme".to_string());

        assert_eq!(record.company_id, "ab12");
        assert_eq!(record.created_at, UNKNOWN_DATE);
        assert_eq!(record.amount.as_deref(), Some("10.5"));
        assert_eq!(record.status, None);
        assert_eq!(record.extra.len(), 2);
        assert_eq!(record.column("id"), Some("c-1"));
        assert_eq!(record.column("paid_at"), Some("2024-01-02"));
        assert_eq!(record.column("status"), None);
        assert_eq!(
            record.column_order(),
            vec!["id", "company_id", "name", "amount", "paid_at", "created_at"]
        );
    }

    #[test]
    fn test_column_order_fallback_for_hand_built_records() {
        let mut extra = BTreeMap::new();
        extra.insert("zeta".to_string(), "1".to_string());
        extra.insert("alpha".to_string(), "2".to_string());
        let record = RawRecord {
            company_id: "ab12".to_string(),
            name: "Acme".to_string(),
            created_at: UNKNOWN_DATE.to_string(),
            amount: None,
            status: Some("paid".to_string()),
            extra,
            columns: Vec::new(),
        };

        assert_eq!(
            record.column_order(),
            vec!["company_id", "name", "created_at", "status", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_charge_date_key() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(13, 5, 0)
            .unwrap();
        let mut charge = Charge {
            company_id: "ab12".to_string(),
            company_name: "Acme".to_string(),
            amount: 1.0,
            status: "paid".to_string(),
            created_at: Some(ts),
            updated_at: ts,
        };
        assert_eq!(charge.date_key(), "2024-01-02");

        charge.created_at = None;
        assert_eq!(charge.date_key(), NO_DATE_KEY);
    }
}
