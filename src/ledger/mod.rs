// Category ledger
// Ordered per-category collections of ticket records with add/remove/move ops.

pub mod parser;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// A single tracked identifier. The identifier string is immutable after
/// creation; only category membership and position change. `uid` is assigned
/// once and never reused, independent of the identifier value (the same value
/// may legitimately appear in several records).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketRecord {
    #[serde(rename = "id")]
    pub identifier: String,
    pub added_at: DateTime<Utc>,
    pub uid: Uuid,
}

impl TicketRecord {
    fn new(identifier: String) -> Self {
        Self {
            identifier,
            added_at: Utc::now(),
            uid: Uuid::new_v4(),
        }
    }
}

/// Result of a successful add: how many records were created and which
/// identifier values they carry, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub added: usize,
    pub identifiers: Vec<String>,
}

/// A record flattened out of its category, tagged with where it lives.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub record: TicketRecord,
    pub category: usize,
    pub index: usize,
    pub category_name: String,
}

/// Per-category ordered record columns. The category set is closed at
/// construction; out-of-range category or index arguments are defensive
/// no-ops rather than errors, since they arise from stale caller state and
/// must never corrupt the ledger.
pub struct CategoryLedger {
    config: LedgerConfig,
    columns: Vec<Vec<TicketRecord>>,
}

impl CategoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        let columns = vec![Vec::new(); config.category_count()];
        Self { config, columns }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Parse raw text and prepend one record per accepted token to the
    /// category (most-recently-added first). Blank input is a silent no-op;
    /// non-blank input with zero valid tokens is `NoValidIdentifiers`. All or
    /// nothing: on error no record is created.
    pub fn add_identifiers(
        &mut self,
        category: usize,
        raw: &str,
    ) -> Result<AddOutcome, LedgerError> {
        if !self.config.is_valid_category(category) {
            return Ok(AddOutcome {
                added: 0,
                identifiers: Vec::new(),
            });
        }
        if raw.trim().is_empty() {
            return Ok(AddOutcome {
                added: 0,
                identifiers: Vec::new(),
            });
        }

        let identifiers =
            parser::parse_identifiers(raw, self.config.id_min_len, self.config.id_max_len);
        if identifiers.is_empty() {
            return Err(LedgerError::NoValidIdentifiers);
        }

        for identifier in &identifiers {
            self.columns[category].insert(0, TicketRecord::new(identifier.clone()));
        }

        Ok(AddOutcome {
            added: identifiers.len(),
            identifiers,
        })
    }

    /// Delete by positional index. Out-of-bounds is a no-op.
    pub fn remove_record(&mut self, category: usize, index: usize) {
        if let Some(column) = self.columns.get_mut(category) {
            if index < column.len() {
                column.remove(index);
            }
        }
    }

    /// Move the records at `indices` from one category to another. Indices are
    /// deduplicated and bounds-checked; removal happens in descending index
    /// order so earlier removals cannot shift later ones, and the moved
    /// records are prepended to the destination in ascending original order.
    pub fn move_records(&mut self, from: usize, indices: &[usize], to: usize) {
        if from == to
            || !self.config.is_valid_category(from)
            || !self.config.is_valid_category(to)
        {
            return;
        }

        let source_len = self.columns[from].len();
        let mut valid: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < source_len)
            .collect();
        valid.sort_unstable();
        valid.dedup();
        if valid.is_empty() {
            return;
        }

        let moved: Vec<TicketRecord> = valid
            .iter()
            .map(|&i| self.columns[from][i].clone())
            .collect();

        for &i in valid.iter().rev() {
            self.columns[from].remove(i);
        }

        self.columns[to].splice(0..0, moved);
    }

    pub fn records_in(&self, category: usize) -> &[TicketRecord] {
        self.columns
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the records of a category wholesale. Used when restoring
    /// persisted state; invalid categories are ignored.
    pub fn set_records(&mut self, category: usize, records: Vec<TicketRecord>) {
        if let Some(column) = self.columns.get_mut(category) {
            *column = records;
        }
    }

    pub fn count_in(&self, category: usize) -> usize {
        self.columns.get(category).map(Vec::len).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Flatten every category into one sequence tagged with origin, for bulk
    /// operations spanning categories.
    pub fn list_all(&self) -> Vec<LedgerEntry> {
        let mut entries = Vec::with_capacity(self.total());
        for (category, column) in self.columns.iter().enumerate() {
            let name = self
                .config
                .category_name(category)
                .unwrap_or_default()
                .to_string();
            for (index, record) in column.iter().enumerate() {
                entries.push(LedgerEntry {
                    record: record.clone(),
                    category,
                    index,
                    category_name: name.clone(),
                });
            }
        }
        entries
    }

    /// Every identifier value across all categories, first-seen order,
    /// deduplicated by value (not by record).
    pub fn all_identifiers_deduplicated(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for column in &self.columns {
            for record in column {
                if !seen.contains(&record.identifier) {
                    seen.push(record.identifier.clone());
                }
            }
        }
        seen
    }

    /// Newline-joined identifier list, the payload of the copy-IDs feature.
    pub fn copy_ids_text(&self) -> String {
        self.all_identifiers_deduplicated().join("\n")
    }

    /// Drop all records in every category. Configuration is untouched.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ledger() -> CategoryLedger {
        CategoryLedger::new(LedgerConfig::default())
    }

    /// Multiset of identifier values across every category.
    fn identifier_multiset(ledger: &CategoryLedger) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for entry in ledger.list_all() {
            *counts.entry(entry.record.identifier).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_add_prepends_most_recent_first() {
        let mut l = ledger();
        l.add_identifiers(0, "1001").unwrap();
        l.add_identifiers(0, "1002 1003").unwrap();

        let ids: Vec<&str> = l
            .records_in(0)
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        // The second batch lands in front of the first; within a batch the
        // later token ends up above the earlier one, as each is prepended.
        assert_eq!(ids, vec!["1003", "1002", "1001"]);
    }

    #[test]
    fn test_add_blank_is_silent_noop() {
        let mut l = ledger();
        let outcome = l.add_identifiers(0, "   ").unwrap();
        assert_eq!(outcome.added, 0);
        assert_eq!(l.count_in(0), 0);
    }

    #[test]
    fn test_add_garbage_is_parse_error() {
        let mut l = ledger();
        let err = l.add_identifiers(0, "hello world").unwrap_err();
        assert_eq!(err, LedgerError::NoValidIdentifiers);
        assert_eq!(l.count_in(0), 0);
    }

    #[test]
    fn test_add_respects_length_bounds() {
        let mut l = ledger();
        l.add_identifiers(0, "12 1234 1234567890123456").unwrap();
        for record in l.records_in(0) {
            assert!(record.identifier.len() >= 3 && record.identifier.len() <= 15);
        }
        assert_eq!(l.count_in(0), 1);
    }

    #[test]
    fn test_add_invalid_category_is_noop() {
        let mut l = ledger();
        let outcome = l.add_identifiers(99, "1234").unwrap();
        assert_eq!(outcome.added, 0);
        assert_eq!(l.total(), 0);
    }

    #[test]
    fn test_uids_are_unique() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1001 1001").unwrap();
        let mut uids: Vec<_> = l.records_in(0).iter().map(|r| r.uid).collect();
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), 3);
    }

    #[test]
    fn test_remove_by_index() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1002 1003").unwrap();
        // Column is ["1003", "1002", "1001"].
        l.remove_record(0, 1);
        let ids: Vec<&str> = l
            .records_in(0)
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["1003", "1001"]);

        // Out of bounds and invalid category are no-ops.
        l.remove_record(0, 10);
        l.remove_record(99, 0);
        assert_eq!(l.count_in(0), 2);
    }

    #[test]
    fn test_move_prepends_in_original_order() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1002 1003 1004").unwrap();
        // Column 0: ["1004", "1003", "1002", "1001"].
        l.add_identifiers(1, "2001").unwrap();

        l.move_records(0, &[0, 2], 1);

        let from: Vec<&str> = l
            .records_in(0)
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        let to: Vec<&str> = l
            .records_in(1)
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(from, vec!["1003", "1001"]);
        assert_eq!(to, vec!["1004", "1002", "2001"]);
    }

    #[test]
    fn test_move_same_category_is_noop() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1002").unwrap();
        let before: Vec<_> = l.records_in(0).to_vec();
        l.move_records(0, &[0, 1], 0);
        assert_eq!(l.records_in(0), before.as_slice());
    }

    #[test]
    fn test_move_dedupes_and_bounds_checks_indices() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1002").unwrap();
        l.move_records(0, &[1, 1, 1, 42], 1);
        assert_eq!(l.count_in(0), 1);
        assert_eq!(l.count_in(1), 1);
        assert_eq!(l.records_in(1)[0].identifier, "1001");
    }

    #[test]
    fn test_moves_preserve_identifier_multiset() {
        let mut l = ledger();
        l.add_identifiers(0, "1001 1002 1003").unwrap();
        l.add_identifiers(1, "1001 2001").unwrap();
        let before = identifier_multiset(&l);

        l.move_records(0, &[0, 1], 2);
        l.move_records(1, &[0], 3);
        l.move_records(2, &[1], 0);
        l.move_records(3, &[0, 5], 1);

        assert_eq!(identifier_multiset(&l), before);
        assert_eq!(l.total(), 5);
    }

    #[test]
    fn test_move_preserves_uid_and_identifier() {
        let mut l = ledger();
        l.add_identifiers(0, "1001").unwrap();
        let original = l.records_in(0)[0].clone();
        l.move_records(0, &[0], 2);
        assert_eq!(l.records_in(2)[0], original);
    }

    #[test]
    fn test_list_all_tags_origin() {
        let mut l = ledger();
        l.add_identifiers(0, "1001").unwrap();
        l.add_identifiers(2, "3001 3002").unwrap();

        let all = l.list_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].category, 0);
        assert_eq!(all[0].category_name, "Коллеги");
        assert_eq!(all[1].category, 2);
        assert_eq!(all[1].index, 0);
        assert_eq!(all[2].index, 1);
    }

    #[test]
    fn test_all_identifiers_deduplicated_first_seen_order() {
        let mut l = ledger();
        l.add_identifiers(0, "1002 1001").unwrap(); // column: 1001, 1002
        l.add_identifiers(1, "1001 2001").unwrap(); // column: 2001, 1001

        assert_eq!(
            l.all_identifiers_deduplicated(),
            vec!["1001", "1002", "2001"]
        );
        assert_eq!(l.copy_ids_text(), "1001\n1002\n2001");
    }

    #[test]
    fn test_clear_empties_all_categories() {
        let mut l = ledger();
        l.add_identifiers(0, "1001").unwrap();
        l.add_identifiers(3, "4001").unwrap();
        l.clear();
        assert_eq!(l.total(), 0);
    }
}
