// 🩹 Name Repair - first-seen name per company_id
//
// Ingestion uses this to fill in names for rows whose own name was
// unusable; Transform uses the same directory to build `companies`, so both
// stages share one first-seen policy.

use crate::records::{Company, UNKNOWN_COMPANY};
use std::collections::HashMap;

/// First usable name seen for each identifier, in scan order.
#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    names: HashMap<String, String>,
    /// Identifiers in first-registration order
    order: Vec<String>,
}

impl NameDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the directory from (cleaned id, cleaned name) pairs.
    ///
    /// Pairs missing either side are skipped; a later name for an id
    /// already registered is ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
    {
        let mut directory = NameDirectory::new();
        for (id, name) in pairs {
            if let (Some(id), Some(name)) = (id, name) {
                directory.register(id, name);
            }
        }
        directory
    }

    /// Register `name` for `id` unless `id` already has one.
    /// Returns true when this call registered it.
    pub fn register(&mut self, id: &str, name: &str) -> bool {
        if self.names.contains_key(id) {
            return false;
        }
        self.names.insert(id.to_string(), name.to_string());
        self.order.push(id.to_string());
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Final name for a row: its own cleaned name if it has one, otherwise
    /// the directory's name for its id, otherwise the unknown sentinel.
    pub fn resolve(&self, id: &str, name: Option<&str>) -> String {
        name.or_else(|| self.get(id))
            .unwrap_or(UNKNOWN_COMPANY)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Directory as company entries, in first-registration order
    pub fn into_companies(self) -> Vec<Company> {
        let mut names = self.names;
        self.order
            .into_iter()
            .filter_map(|id| {
                names.remove(&id).map(|company_name| Company { id, company_name })
            })
            .collect()
    }
}
