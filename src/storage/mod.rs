// Persistence boundary
// Named JSON blobs behind a small trait; SQLite-backed store for the app,
// in-memory store for tests. Core logic never touches the database directly.

pub mod sqlite;

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

pub use sqlite::SqliteStore;

/// Blob keys. A clear-all wipes only the record blobs; preference blobs
/// (order, hidden set, favorites) and overrides are preserved on purpose.
pub mod keys {
    pub const PREFIX: &str = "appeals_";

    pub fn category_records(category: usize) -> String {
        format!("{}cat_records_{}", PREFIX, category)
    }

    pub const CATEGORY_ORDER: &str = "appeals_cat_order";
    pub const HIDDEN_CATEGORIES: &str = "appeals_hidden_cats";
    pub const FAVORITE_COUNTRIES: &str = "appeals_fav_countries";
    pub const OVERRIDES: &str = "appeals_overrides";
}

/// Load/save named blobs. Implementations report failures back as errors;
/// callers keep operating on their in-memory state either way.
pub trait BlobStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

// Shared handles count as stores, so a caller can keep one for inspection
// while the session owns another.
impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| anyhow!("Failed to lock blob map: {}", e))?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| anyhow!("Failed to lock blob map: {}", e))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| anyhow!("Failed to lock blob map: {}", e))?;
        blobs.remove(key);
        Ok(())
    }
}
