// Application session
// Owns the ledger, override store and view preferences, and wires them to a
// blob store. Mutations apply in memory first and then persist; a persistence
// failure is reported but never rolls back the in-memory state.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::LedgerConfig;
use crate::countries::CountryDirectory;
use crate::error::LedgerError;
use crate::ledger::{AddOutcome, CategoryLedger, TicketRecord};
use crate::overrides::OverrideStore;
use crate::report::quick::{generate_quick_report, QuickSelections};
use crate::report::{reconcile, ReconcileOutcome, UploadedRow};
use crate::storage::{keys, BlobStore};

pub struct AppSession {
    directory: Arc<CountryDirectory>,
    ledger: CategoryLedger,
    overrides: OverrideStore,
    /// Display order: a permutation of the category indices.
    order: Vec<usize>,
    /// Categories hidden from display. Never covers the whole set.
    hidden: Vec<usize>,
    favorites: Vec<String>,
    store: Box<dyn BlobStore>,
}

impl AppSession {
    /// Open a session over the given store, restoring persisted state.
    /// Missing or corrupt blobs fall back to defaults; only a failing store
    /// aborts the open.
    pub fn open(
        store: Box<dyn BlobStore>,
        config: LedgerConfig,
        directory: Arc<CountryDirectory>,
    ) -> Result<Self> {
        let category_count = config.category_count();
        let mut ledger = CategoryLedger::new(config);

        for category in 0..category_count {
            if let Some(records) =
                load_json::<Vec<TicketRecord>>(store.as_ref(), &keys::category_records(category))?
            {
                ledger.set_records(category, records);
            }
        }

        let overrides = load_json::<OverrideStore>(store.as_ref(), keys::OVERRIDES)?
            .unwrap_or_default();

        let mut order = load_json::<Vec<usize>>(store.as_ref(), keys::CATEGORY_ORDER)?
            .unwrap_or_else(|| (0..category_count).collect());
        if !is_permutation(&order, category_count) {
            log::warn!("Persisted category order is not a permutation, resetting");
            order = (0..category_count).collect();
        }

        let mut hidden = load_json::<Vec<usize>>(store.as_ref(), keys::HIDDEN_CATEGORIES)?
            .unwrap_or_default();
        hidden.retain(|&c| c < category_count);
        hidden.sort_unstable();
        hidden.dedup();
        if hidden.len() >= category_count {
            log::warn!("Persisted hidden set covers every category, resetting");
            hidden.clear();
        }

        let favorites = load_json::<Vec<String>>(store.as_ref(), keys::FAVORITE_COUNTRIES)?
            .unwrap_or_default();

        log::info!(
            "Session opened: {} records, {} overrides",
            ledger.total(),
            overrides.len()
        );

        Ok(Self {
            directory,
            ledger,
            overrides,
            order,
            hidden,
            favorites,
            store,
        })
    }

    pub fn ledger(&self) -> &CategoryLedger {
        &self.ledger
    }

    pub fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    pub fn category_order(&self) -> &[usize] {
        &self.order
    }

    pub fn hidden_categories(&self) -> &[usize] {
        &self.hidden
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Categories in display order with hidden ones filtered out.
    pub fn visible_categories(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|c| !self.hidden.contains(c))
            .collect()
    }

    // ============ Ledger mutations ============

    pub fn add_identifiers(&mut self, category: usize, raw: &str) -> Result<AddOutcome> {
        let outcome = self.ledger.add_identifiers(category, raw)?;
        if outcome.added > 0 {
            self.persist_category(category)?;
        }
        Ok(outcome)
    }

    pub fn remove_record(&mut self, category: usize, index: usize) -> Result<()> {
        self.ledger.remove_record(category, index);
        self.persist_category(category)
    }

    pub fn move_records(&mut self, from: usize, indices: &[usize], to: usize) -> Result<()> {
        self.ledger.move_records(from, indices, to);
        self.persist_category(from)?;
        self.persist_category(to)
    }

    /// Wipe all records, in memory and in the store. Overrides, favorites,
    /// display order and the hidden set are preserved; losing a day's records
    /// must not also lose the user's accumulated preferences.
    pub fn clear_all(&mut self) -> Result<()> {
        self.ledger.clear();
        for category in 0..self.ledger.config().category_count() {
            self.store
                .remove(&keys::category_records(category))
                .context("Failed to clear category records")?;
        }
        log::info!("Cleared all ledger records");
        Ok(())
    }

    // ============ Overrides ============

    pub fn set_override(
        &mut self,
        identifier: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<()> {
        self.overrides.set(identifier, country);
        self.persist_overrides()
    }

    pub fn remove_override(&mut self, identifier: &str) -> Result<()> {
        self.overrides.remove(identifier);
        self.persist_overrides()
    }

    // ============ View preferences ============

    pub fn set_favorites(&mut self, favorites: Vec<String>) -> Result<()> {
        self.favorites = favorites;
        let json = serde_json::to_string(&self.favorites)
            .context("Failed to serialize favorites")?;
        self.store.save(keys::FAVORITE_COUNTRIES, &json)
    }

    /// Replace the display order. Anything that is not a permutation of the
    /// category indices is ignored; stale UI state must not corrupt prefs.
    pub fn set_category_order(&mut self, order: Vec<usize>) -> Result<()> {
        if !is_permutation(&order, self.ledger.config().category_count()) {
            log::warn!("Rejected category order {:?}: not a permutation", order);
            return Ok(());
        }
        self.order = order;
        let json =
            serde_json::to_string(&self.order).context("Failed to serialize category order")?;
        self.store.save(keys::CATEGORY_ORDER, &json)
    }

    /// Hide a category from display. Hiding the last visible category is
    /// rejected and leaves the visible set unchanged.
    pub fn hide_category(&mut self, category: usize) -> Result<()> {
        if !self.ledger.config().is_valid_category(category) || self.hidden.contains(&category) {
            return Ok(());
        }
        if self.visible_categories().len() <= 1 {
            return Err(LedgerError::CannotHideAll.into());
        }
        self.hidden.push(category);
        self.persist_hidden()
    }

    pub fn show_category(&mut self, category: usize) -> Result<()> {
        if !self.hidden.contains(&category) {
            return Ok(());
        }
        self.hidden.retain(|&c| c != category);
        self.persist_hidden()
    }

    // ============ Reports ============

    /// Reconcile the current ledger against an uploaded table. Pure; call
    /// again with the same rows after accepting overrides.
    pub fn reconcile(&self, rows: &[UploadedRow]) -> ReconcileOutcome {
        reconcile(&self.ledger, rows, &self.overrides, &self.directory)
    }

    /// Quick report over manual per-record selections.
    pub fn quick_report(&self, selections: &QuickSelections) -> String {
        generate_quick_report(&self.ledger, selections, &self.directory)
    }

    // ============ Persistence helpers ============

    fn persist_category(&self, category: usize) -> Result<()> {
        let json = serde_json::to_string(self.ledger.records_in(category))
            .context("Failed to serialize category records")?;
        self.store.save(&keys::category_records(category), &json)
    }

    fn persist_overrides(&self) -> Result<()> {
        let json =
            serde_json::to_string(&self.overrides).context("Failed to serialize overrides")?;
        self.store.save(keys::OVERRIDES, &json)
    }

    fn persist_hidden(&self) -> Result<()> {
        let json =
            serde_json::to_string(&self.hidden).context("Failed to serialize hidden set")?;
        self.store.save(keys::HIDDEN_CATEGORIES, &json)
    }
}

fn is_permutation(order: &[usize], category_count: usize) -> bool {
    if order.len() != category_count {
        return false;
    }
    let mut seen = vec![false; category_count];
    for &c in order {
        if c >= category_count || seen[c] {
            return false;
        }
        seen[c] = true;
    }
    true
}

/// Deserialize a stored blob, treating corrupt payloads as absent. Only a
/// store-level failure propagates.
fn load_json<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Discarding corrupt blob {}: {}", key, e);
            Ok(None)
        }
    }
}
