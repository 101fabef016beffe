// Quick report
// Manual mode: countries chosen per record by the user, no uploaded table.
// Reuses the engine's aggregation and rendering so both report modes agree.

use std::collections::HashMap;

use uuid::Uuid;

use crate::countries::CountryDirectory;
use crate::ledger::{CategoryLedger, LedgerEntry};

use super::{render_blocks, synthesize_abbreviation};

/// Country text chosen per record, keyed by the record's stable uid so the
/// choice survives re-renders and moves between categories.
pub type QuickSelections = HashMap<Uuid, String>;

/// Presentation order for the selection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    IdAscending,
    IdDescending,
    CategoryThenId,
}

/// Numeric-aware identifier ordering: identifiers are digit strings, so
/// comparing by length first then lexicographically gives numeric order.
fn compare_identifiers(a: &str, b: &str) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort flattened ledger entries for display.
pub fn sort_entries(entries: &mut [LedgerEntry], mode: SortMode) {
    match mode {
        SortMode::IdAscending => entries.sort_by(|a, b| {
            compare_identifiers(&a.record.identifier, &b.record.identifier)
        }),
        SortMode::IdDescending => entries.sort_by(|a, b| {
            compare_identifiers(&b.record.identifier, &a.record.identifier)
        }),
        SortMode::CategoryThenId => entries.sort_by(|a, b| {
            a.category.cmp(&b.category).then_with(|| {
                compare_identifiers(&a.record.identifier, &b.record.identifier)
            })
        }),
    }
}

/// Aggregate manual selections into the same report shape as a full
/// reconciliation. Each selected record contributes one count; records with
/// no selection (or a blank one) are skipped.
pub fn generate_quick_report(
    ledger: &CategoryLedger,
    selections: &QuickSelections,
    directory: &CountryDirectory,
) -> String {
    let config = ledger.config();
    let mut per_category: Vec<HashMap<String, u64>> = vec![HashMap::new(); config.category_count()];

    for entry in ledger.list_all() {
        let Some(country) = selections.get(&entry.record.uid) else {
            continue;
        };
        if country.trim().is_empty() {
            continue;
        }

        let abbreviation = directory
            .resolve(country)
            .map(str::to_string)
            .unwrap_or_else(|| synthesize_abbreviation(country));
        *per_category[entry.category].entry(abbreviation).or_insert(0) += 1;
    }

    render_blocks(config, &per_category)
}
