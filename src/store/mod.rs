// 🗄️ Storage client - collections of documents with full-replace writes
//
// Stages never hold a global handle: each one takes a `DocumentStore`
// explicitly, which keeps the SQLite store and the in-memory double
// interchangeable.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{setup_database, SqliteStore};

use crate::records::{Charge, Company, DailyTotal, RawRecord};
use crate::view::group_daily_totals;
use anyhow::Result;

/// Logical collections the pipeline reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    RawData,
    Charges,
    Companies,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::RawData => "raw_data",
            Collection::Charges => "charges",
            Collection::Companies => "companies",
        }
    }
}

pub trait DocumentStore {
    /// Clear `raw_data` and insert `records`. An empty slice still clears.
    fn replace_raw_records(&mut self, records: &[RawRecord]) -> Result<usize>;

    /// Every raw record, in insertion order
    fn load_raw_records(&self) -> Result<Vec<RawRecord>>;

    /// Clear `charges` and `companies` together and insert the new sets.
    fn replace_derived(&mut self, charges: &[Charge], companies: &[Company]) -> Result<()>;

    fn load_charges(&self) -> Result<Vec<Charge>>;

    fn load_companies(&self) -> Result<Vec<Company>>;

    fn count(&self, collection: Collection) -> Result<usize>;

    /// Charges summed per (date key, company name), ascending on both.
    ///
    /// Stores that can group natively should override this.
    fn daily_totals(&self) -> Result<Vec<DailyTotal>> {
        Ok(group_daily_totals(&self.load_charges()?))
    }
}
