// In-memory store for tests and one-shot runs

use super::{Collection, DocumentStore};
use crate::records::{Charge, Company, RawRecord};
use anyhow::Result;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw_data: Vec<RawRecord>,
    charges: Vec<Charge>,
    companies: Vec<Company>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn replace_raw_records(&mut self, records: &[RawRecord]) -> Result<usize> {
        self.raw_data = records.to_vec();
        debug!(count = records.len(), "replaced raw_data in memory");
        Ok(records.len())
    }

    fn load_raw_records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.raw_data.clone())
    }

    fn replace_derived(&mut self, charges: &[Charge], companies: &[Company]) -> Result<()> {
        self.charges = charges.to_vec();
        self.companies = companies.to_vec();
        debug!(
            charges = charges.len(),
            companies = companies.len(),
            "replaced charges and companies in memory"
        );
        Ok(())
    }

    fn load_charges(&self) -> Result<Vec<Charge>> {
        Ok(self.charges.clone())
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    fn count(&self, collection: Collection) -> Result<usize> {
        Ok(match collection {
            Collection::RawData => self.raw_data.len(),
            Collection::Charges => self.charges.len(),
            Collection::Companies => self.companies.len(),
        })
    }
}
