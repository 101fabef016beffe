// Startup configuration for the appeals ledger
// The category set and identifier bounds are fixed once at construction

use serde::{Deserialize, Serialize};

/// One slot in the closed category enumeration.
///
/// `name` is the short display name; `report_label` is the header line used in
/// generated report blocks. They differ in the reference instance ("Коллеги"
/// vs "Обращений коллег").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub report_label: String,
}

impl CategoryConfig {
    pub fn new(name: impl Into<String>, report_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            report_label: report_label.into(),
        }
    }
}

/// Fixed configuration for a ledger instance.
///
/// The category enumeration is closed: it is set once here and never grows or
/// shrinks at runtime. Categories are addressed by index into `categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub categories: Vec<CategoryConfig>,
    /// Minimum accepted identifier length, in digits.
    pub id_min_len: usize,
    /// Maximum accepted identifier length, in digits.
    pub id_max_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryConfig::new("Коллеги", "Обращений коллег"),
                CategoryConfig::new("Агенты", "Обращений агентов"),
                CategoryConfig::new("Консультант", "Обращений по консультанту"),
                CategoryConfig::new("Тикеты", "Обращений по тикетам"),
            ],
            id_min_len: 3,
            id_max_len: 15,
        }
    }
}

impl LedgerConfig {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn is_valid_category(&self, index: usize) -> bool {
        index < self.categories.len()
    }

    pub fn category_name(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(|c| c.name.as_str())
    }

    pub fn report_label(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(|c| c.report_label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_four_categories() {
        let config = LedgerConfig::default();
        assert_eq!(config.category_count(), 4);
        assert!(config.is_valid_category(3));
        assert!(!config.is_valid_category(4));
        assert_eq!(config.category_name(0), Some("Коллеги"));
        assert_eq!(config.report_label(3), Some("Обращений по тикетам"));
    }

    #[test]
    fn test_default_id_bounds() {
        let config = LedgerConfig::default();
        assert_eq!(config.id_min_len, 3);
        assert_eq!(config.id_max_len, 15);
    }
}
