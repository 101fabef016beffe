// Country directory and name resolver
// Maps free-text country names to canonical report abbreviations.

mod directory;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Immutable directory entry: canonical display name plus the short code used
/// as the report grouping key. Codes are directory-defined and not guaranteed
/// to be exactly three characters ("Ирак", "ОАЭ").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub abbreviation: String,
}

/// Sorted directory listing partitioned by the caller's favorite set.
#[derive(Debug, Clone)]
pub struct SortedCountries<'a> {
    pub favorites: Vec<&'a Country>,
    pub others: Vec<&'a Country>,
}

/// Fixed table of known countries with lookup indices precomputed for the
/// resolution chain. Built once and shared; no runtime mutation.
pub struct CountryDirectory {
    entries: Vec<Country>,
    /// Lowercased abbreviation -> entry index (first occurrence wins).
    abbr_lookup: HashMap<String, usize>,
    /// Lowercased canonical name -> entry index.
    name_lookup: HashMap<String, usize>,
    /// Normalized canonical name -> entry index.
    normalized_lookup: HashMap<String, usize>,
    /// Normalized names in entry order, for the containment fallback.
    normalized_names: Vec<String>,
}

impl CountryDirectory {
    pub fn new(entries: Vec<Country>) -> Self {
        let mut abbr_lookup = HashMap::new();
        let mut name_lookup = HashMap::new();
        let mut normalized_lookup = HashMap::new();
        let mut normalized_names = Vec::with_capacity(entries.len());

        for (i, country) in entries.iter().enumerate() {
            abbr_lookup
                .entry(country.abbreviation.to_lowercase())
                .or_insert(i);
            name_lookup.entry(country.name.to_lowercase()).or_insert(i);
            let normalized = normalize(&country.name);
            normalized_lookup.entry(normalized.clone()).or_insert(i);
            normalized_names.push(normalized);
        }

        Self {
            entries,
            abbr_lookup,
            name_lookup,
            normalized_lookup,
            normalized_names,
        }
    }

    /// The directory shipped with the application.
    pub fn builtin() -> Self {
        let entries = directory::BUILTIN
            .iter()
            .map(|&(name, abbreviation)| Country {
                name: name.to_string(),
                abbreviation: abbreviation.to_string(),
            })
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[Country] {
        &self.entries
    }

    /// Resolve free text to a canonical abbreviation.
    ///
    /// Precedence: exact abbreviation, exact name, normalized name, then a
    /// whole-word containment scan in entry order. Exact stages run before the
    /// fuzzy one because short names and abbreviations can collide under
    /// substring matching ("Суд" is an abbreviation and a prefix of "Судан").
    pub fn resolve(&self, text: &str) -> Option<&str> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_lowercase();
        if let Some(&i) = self.abbr_lookup.get(&lower) {
            return Some(&self.entries[i].abbreviation);
        }
        if let Some(&i) = self.name_lookup.get(&lower) {
            return Some(&self.entries[i].abbreviation);
        }

        let normalized = normalize(trimmed);
        if normalized.is_empty() {
            return None;
        }
        if let Some(&i) = self.normalized_lookup.get(&normalized) {
            return Some(&self.entries[i].abbreviation);
        }

        // Whole-word containment in either direction, first entry wins.
        let padded_input = format!(" {} ", normalized);
        for (i, name) in self.normalized_names.iter().enumerate() {
            let padded_name = format!(" {} ", name);
            if padded_input.contains(&padded_name) || padded_name.contains(&padded_input) {
                return Some(&self.entries[i].abbreviation);
            }
        }

        None
    }

    pub fn is_known(&self, text: &str) -> bool {
        self.resolve(text).is_some()
    }

    /// All entries ordered by Russian-aware name collation.
    pub fn all_sorted(&self) -> Vec<&Country> {
        let mut sorted: Vec<&Country> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            collation_key(&a.name)
                .cmp(&collation_key(&b.name))
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    /// Sorted listing split into favorites (relative order preserved) and the
    /// rest, favorites first.
    pub fn sorted_with_favorites(&self, favorite_names: &[String]) -> SortedCountries<'_> {
        let all = self.all_sorted();
        let (favorites, others) = all
            .into_iter()
            .partition(|c| favorite_names.iter().any(|f| f == &c.name));
        SortedCountries { favorites, others }
    }
}

/// Normalize free text for matching: trim, lowercase, fold ё to е, collapse
/// whitespace and punctuation runs to single spaces, drop everything that is
/// not a letter or digit.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_gap = false;
    for ch in text.trim().to_lowercase().chars() {
        let ch = if ch == 'ё' { 'е' } else { ch };
        if ch.is_alphanumeric() {
            if pending_gap && !out.is_empty() {
                out.push(' ');
            }
            pending_gap = false;
            out.push(ch);
        } else {
            pending_gap = true;
        }
    }
    out
}

/// Collation key for report and listing order. Lowercase with ё folded to е
/// agrees with Russian alphabetical order for the directory's character set
/// and keeps output deterministic without a locale dependency.
pub fn collation_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| if ch == 'ё' { 'е' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir() -> CountryDirectory {
        CountryDirectory::builtin()
    }

    #[test]
    fn test_resolve_canonical_name() {
        assert_eq!(dir().resolve("Египет"), Some("Еги"));
        assert_eq!(dir().resolve("Саудовская Аравия"), Some("Сау"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(dir().resolve("ЕГИПЕТ"), Some("Еги"));
        assert_eq!(dir().resolve("египет"), Some("Еги"));
    }

    #[test]
    fn test_resolve_abbreviation_is_idempotent() {
        let d = dir();
        for country in d.entries() {
            assert_eq!(d.resolve(&country.name), Some(country.abbreviation.as_str()));
            assert_eq!(
                d.resolve(&country.abbreviation),
                Some(country.abbreviation.as_str())
            );
        }
    }

    #[test]
    fn test_abbreviation_beats_containment() {
        // "Суд" is the abbreviation for Судан and a substring of its name;
        // the exact-abbreviation stage must win before any fuzzy matching.
        assert_eq!(dir().resolve("Суд"), Some("Суд"));
        assert_eq!(dir().resolve("суд"), Some("Суд"));
    }

    #[test]
    fn test_exact_name_beats_containment() {
        // "Южный Судан" contains "Судан" as a whole word; the exact stage
        // must pick the longer name, not the earlier directory entry.
        assert_eq!(dir().resolve("Южный Судан"), Some("Южн"));
    }

    #[test]
    fn test_containment_fallback() {
        assert_eq!(dir().resolve("Арабская Республика Египет"), Some("Еги"));
        assert_eq!(dir().resolve("республика судан"), Some("Суд"));
    }

    #[test]
    fn test_containment_requires_word_boundary() {
        // "Иранистика" does not contain "Иран" as a whole word.
        assert_eq!(dir().resolve("Иранистика"), None);
    }

    #[test]
    fn test_yo_folding_and_punctuation() {
        assert_eq!(dir().resolve("ёгипет"), Some("Еги"));
        assert_eq!(dir().resolve("  Египет!!! "), Some("Еги"));
    }

    #[test]
    fn test_unknown_country() {
        let d = dir();
        assert_eq!(d.resolve("Mars"), None);
        assert_eq!(d.resolve(""), None);
        assert_eq!(d.resolve("   "), None);
        assert!(!d.is_known("Mars"));
        assert!(d.is_known("Египет"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Южный,,,Судан  "), "южный судан");
        assert_eq!(normalize("ЁЖ"), "еж");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_all_sorted_is_alphabetical() {
        let d = dir();
        let sorted = d.all_sorted();
        assert_eq!(sorted.len(), d.entries().len());
        for pair in sorted.windows(2) {
            assert!(collation_key(&pair[0].name) <= collation_key(&pair[1].name));
        }
        assert_eq!(sorted[0].name, "Алжир");
    }

    #[test]
    fn test_sorted_with_favorites() {
        let d = dir();
        let favs = vec!["Египет".to_string(), "Алжир".to_string()];
        let split = d.sorted_with_favorites(&favs);
        assert_eq!(split.favorites.len(), 2);
        // Favorites keep sorted order among themselves.
        assert_eq!(split.favorites[0].name, "Алжир");
        assert_eq!(split.favorites[1].name, "Египет");
        assert_eq!(split.others.len(), d.entries().len() - 2);
        assert!(split.others.iter().all(|c| c.name != "Египет"));
    }
}
