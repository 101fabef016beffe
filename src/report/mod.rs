// Reconciliation engine
// Joins ledger identifiers against uploaded rows and overrides, classifies
// each identifier and renders the per-category country count report.

pub mod quick;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::countries::{collation_key, CountryDirectory};
use crate::ledger::{CategoryLedger, TicketRecord};
use crate::overrides::OverrideStore;

/// One row of the externally uploaded identifier table. Read-only input;
/// the engine never mutates or re-orders the uploaded data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedRow {
    pub identifier: String,
    pub country: String,
}

impl UploadedRow {
    pub fn new(identifier: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            country: country.into(),
        }
    }
}

/// Identifier resolved to a directory abbreviation (or carried by an override).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownMatch {
    pub identifier: String,
    pub country: String,
    pub abbreviation: String,
    pub category: usize,
}

/// Identifier whose country text exists but resolves to nothing. The
/// suggested abbreviation is display-only and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnknownMatch {
    pub identifier: String,
    pub country: String,
    pub suggested_abbreviation: String,
    pub category: usize,
}

/// Identifier with no uploaded row or a blank country field; the caller
/// should prompt the user for an override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotFoundMatch {
    pub identifier: String,
    pub category: usize,
}

/// Classification buckets for one reconciliation run, one entry per distinct
/// identifier per category, in ledger order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchReport {
    pub known: Vec<KnownMatch>,
    pub unknown: Vec<UnknownMatch>,
    pub not_found: Vec<NotFoundMatch>,
}

/// Rendered report text plus the classification the caller may use to solicit
/// overrides and re-run.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub text: String,
    pub matching: MatchReport,
}

/// Fallback abbreviation for country text the directory cannot resolve:
/// first three characters lowercased, or the whole text if shorter.
/// Character-wise, so Cyrillic input truncates correctly.
pub fn synthesize_abbreviation(country: &str) -> String {
    country.to_lowercase().chars().take(3).collect()
}

/// Run one reconciliation over the current ledger, an uploaded table and the
/// override store. Stateless between runs: re-running with the same inputs
/// yields byte-identical text, and accepting an override only requires calling
/// this again with the same table.
pub fn reconcile(
    ledger: &CategoryLedger,
    rows: &[UploadedRow],
    overrides: &OverrideStore,
    directory: &CountryDirectory,
) -> ReconcileOutcome {
    let config = ledger.config();
    let uploaded = index_uploaded(rows);

    let mut matching = MatchReport::default();
    let mut per_category: Vec<HashMap<String, u64>> = Vec::with_capacity(config.category_count());

    for category in 0..config.category_count() {
        let mut counts: HashMap<String, u64> = HashMap::new();

        for (identifier, occurrences) in count_by_identifier(ledger.records_in(category)) {
            // Overrides win unconditionally, whether or not a row matches.
            if let Some(country) = overrides.get(&identifier) {
                let abbreviation = directory
                    .resolve(country)
                    .map(str::to_string)
                    .unwrap_or_else(|| synthesize_abbreviation(country));
                matching.known.push(KnownMatch {
                    identifier: identifier.clone(),
                    country: country.to_string(),
                    abbreviation: abbreviation.clone(),
                    category,
                });
                *counts.entry(abbreviation).or_insert(0) += occurrences;
                continue;
            }

            let Some(row) = uploaded.get(identifier.as_str()) else {
                matching.not_found.push(NotFoundMatch {
                    identifier,
                    category,
                });
                continue;
            };

            let country = row.country.trim();
            if country.is_empty() {
                matching.not_found.push(NotFoundMatch {
                    identifier,
                    category,
                });
                continue;
            }

            match directory.resolve(country) {
                Some(abbreviation) => {
                    matching.known.push(KnownMatch {
                        identifier: identifier.clone(),
                        country: country.to_string(),
                        abbreviation: abbreviation.to_string(),
                        category,
                    });
                    *counts.entry(abbreviation.to_string()).or_insert(0) += occurrences;
                }
                None => {
                    matching.unknown.push(UnknownMatch {
                        identifier,
                        country: country.to_string(),
                        suggested_abbreviation: synthesize_abbreviation(country),
                        category,
                    });
                }
            }
        }

        per_category.push(counts);
    }

    let text = render_blocks(config, &per_category);
    log::debug!(
        "reconciled: {} known, {} unknown, {} not found",
        matching.known.len(),
        matching.unknown.len(),
        matching.not_found.len()
    );

    ReconcileOutcome { text, matching }
}

/// Uploaded rows keyed by trimmed identifier, first occurrence wins. Later
/// duplicate rows are ignored on purpose; downstream tooling depends on this.
fn index_uploaded(rows: &[UploadedRow]) -> HashMap<&str, &UploadedRow> {
    let mut map = HashMap::new();
    for row in rows {
        let identifier = row.identifier.trim();
        if identifier.is_empty() {
            continue;
        }
        map.entry(identifier).or_insert(row);
    }
    map
}

/// Count-by-identifier table for one category, distinct identifiers in
/// first-occurrence ledger order. Repeats count multiply.
fn count_by_identifier(records: &[TicketRecord]) -> Vec<(String, u64)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        let entry = counts.entry(record.identifier.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(record.identifier.as_str());
        }
        *entry += 1;
    }
    order
        .into_iter()
        .map(|id| (id.to_string(), counts[id]))
        .collect()
}

/// Render the report text: one block per category with aggregated entries,
/// canonical category order, `abbr:count` lines sorted by collation, blocks
/// joined with a blank line. Empty categories are omitted entirely.
pub(crate) fn render_blocks(config: &LedgerConfig, per_category: &[HashMap<String, u64>]) -> String {
    let mut blocks = Vec::new();
    for (category, counts) in per_category.iter().enumerate() {
        if counts.is_empty() {
            continue;
        }

        let mut entries: Vec<(&str, u64)> = counts
            .iter()
            .map(|(abbr, &count)| (abbr.as_str(), count))
            .collect();
        entries.sort_by(|a, b| {
            collation_key(a.0)
                .cmp(&collation_key(b.0))
                .then_with(|| a.0.cmp(b.0))
        });

        let label = config.report_label(category).unwrap_or_default();
        let mut block = format!("{}:", label);
        for (abbreviation, count) in entries {
            block.push('\n');
            block.push_str(abbreviation);
            block.push(':');
            block.push_str(&count.to_string());
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}
