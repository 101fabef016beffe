// Override store
// User-chosen country text per identifier; always wins over uploaded data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Persisted map identifier -> country text. Entries live until explicitly
/// replaced or removed, and survive a clear-all of the record ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideStore {
    entries: HashMap<String, String>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Set or replace the country text for an identifier. Blank country text
    /// removes the entry instead of storing an empty override.
    pub fn set(&mut self, identifier: impl Into<String>, country: impl Into<String>) {
        let identifier = identifier.into();
        let country = country.into();
        if country.trim().is_empty() {
            self.entries.remove(&identifier);
        } else {
            self.entries.insert(identifier, country);
        }
    }

    pub fn remove(&mut self, identifier: &str) -> Option<String> {
        self.entries.remove(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, country)| (id.as_str(), country.as_str()))
    }
}
