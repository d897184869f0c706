//! User settings for expense-split
//!
//! Exclusion lists, the partner's accounts, the split rate and the optional
//! spreadsheet endpoint. The lists are stored in insertion order so they can
//! be shown and removed by position; the calculator only ever treats them as
//! sets.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::paths::SplitPaths;
use crate::error::SplitError;
use crate::storage::file_io::{read_json, read_json_required, write_json_atomic};

/// Which string list of the settings an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Major categories left out of the calculation
    #[value(alias = "categories")]
    Category,
    /// Minor categories left out of the calculation
    #[value(alias = "subcategories")]
    Subcategory,
    /// Accounts the partner pays from
    #[value(alias = "accounts")]
    PartnerAccount,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category exclusions"),
            Self::Subcategory => write!(f, "subcategory exclusions"),
            Self::PartnerAccount => write!(f, "partner accounts"),
        }
    }
}

/// Spreadsheet web endpoint the monthly total is posted to
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEndpoint {
    /// Web app URL
    pub url: String,
    /// Shared secret sent with every request
    pub token: String,
}

impl fmt::Debug for ExportEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportEndpoint")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// User settings for expense-split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Major categories to exclude
    #[serde(default, alias = "expenceList")]
    pub expense_category_exclusions: Vec<String>,

    /// Minor categories to exclude
    #[serde(default, alias = "expenceSubList")]
    pub expense_subcategory_exclusions: Vec<String>,

    /// Accounts owned by the partner
    #[serde(default, alias = "partnerAccount")]
    pub partner_accounts: Vec<String>,

    /// Partner's share of ordinary expenses
    #[serde(default = "default_split_rate", alias = "rate")]
    pub split_rate: f64,

    /// Display label for the partner
    #[serde(default = "default_partner_name", alias = "partnerName")]
    pub partner_name: String,

    /// Optional spreadsheet endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportEndpoint>,
}

fn default_schema_version() -> u32 {
    1
}

/// Split rate used when none is configured
pub fn default_split_rate() -> f64 {
    0.5
}

/// Partner label used when none is configured
pub fn default_partner_name() -> String {
    "Partner".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            expense_category_exclusions: Vec::new(),
            expense_subcategory_exclusions: Vec::new(),
            partner_accounts: Vec::new(),
            split_rate: default_split_rate(),
            partner_name: default_partner_name(),
            export: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if never saved
    pub fn load_or_create(paths: &SplitPaths) -> Result<Self, SplitError> {
        // Missing file yields defaults; the caller decides when to persist
        let settings_path = paths.settings_file();
        read_json(&settings_path).map_err(|e| {
            SplitError::Config(format!(
                "Failed to load settings from {}: {}",
                settings_path.display(),
                e
            ))
        })
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, SplitError> {
        read_json_required(path).map_err(|e| {
            SplitError::Config(format!(
                "Failed to load settings from {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save settings to the default location
    pub fn save(&self, paths: &SplitPaths) -> Result<(), SplitError> {
        paths.ensure_directories()?;
        self.save_to(&paths.settings_file())
    }

    /// Save settings to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<(), SplitError> {
        write_json_atomic(path, self)
    }

    /// Get one of the string lists
    pub fn list(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Category => &self.expense_category_exclusions,
            ListKind::Subcategory => &self.expense_subcategory_exclusions,
            ListKind::PartnerAccount => &self.partner_accounts,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<String> {
        match kind {
            ListKind::Category => &mut self.expense_category_exclusions,
            ListKind::Subcategory => &mut self.expense_subcategory_exclusions,
            ListKind::PartnerAccount => &mut self.partner_accounts,
        }
    }

    /// Append an entry unless it is blank or already present
    ///
    /// Returns whether the list changed.
    pub fn add_item(&mut self, kind: ListKind, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() {
            return false;
        }

        let list = self.list_mut(kind);
        if list.iter().any(|existing| existing == item) {
            return false;
        }

        list.push(item.to_string());
        true
    }

    /// Remove an entry by value. Returns whether it was present.
    pub fn remove_item(&mut self, kind: ListKind, item: &str) -> bool {
        let item = item.trim();
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|existing| existing != item);
        list.len() != before
    }

    /// Remove an entry by 0-based position; out-of-range is a no-op
    pub fn remove_index(&mut self, kind: ListKind, index: usize) -> Option<String> {
        let list = self.list_mut(kind);
        if index < list.len() {
            Some(list.remove(index))
        } else {
            None
        }
    }

    /// Drop duplicate and blank entries, keeping first occurrences
    pub fn normalize(&mut self) {
        for kind in [
            ListKind::Category,
            ListKind::Subcategory,
            ListKind::PartnerAccount,
        ] {
            let list = self.list_mut(kind);
            let mut seen = std::collections::HashSet::new();
            list.retain(|item| !item.trim().is_empty() && seen.insert(item.clone()));
        }
    }

    /// Check whether the split rate is a usable fraction
    ///
    /// The calculator accepts any rate; this is for the CLI to warn on.
    pub fn split_rate_in_range(&self) -> bool {
        self.split_rate.is_finite() && (0.0..=1.0).contains(&self.split_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.expense_category_exclusions.is_empty());
        assert!(settings.expense_subcategory_exclusions.is_empty());
        assert!(settings.partner_accounts.is_empty());
        assert_eq!(settings.split_rate, 0.5);
        assert_eq!(settings.partner_name, "Partner");
        assert!(settings.export.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.split_rate = 0.4;
        settings.add_item(ListKind::PartnerAccount, "Bank X");

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.split_rate, 0.4);
        assert_eq!(loaded.partner_accounts, vec!["Bank X".to_string()]);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_extension_keys_are_accepted() {
        let json = r#"{
            "partnerAccount": ["Bank X"],
            "expenceList": ["振替"],
            "expenceSubList": ["家賃"],
            "rate": 0.6,
            "partnerName": "Hanako"
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.partner_accounts, vec!["Bank X"]);
        assert_eq!(settings.expense_category_exclusions, vec!["振替"]);
        assert_eq!(settings.expense_subcategory_exclusions, vec!["家賃"]);
        assert_eq!(settings.split_rate, 0.6);
        assert_eq!(settings.partner_name, "Hanako");
    }

    #[test]
    fn test_add_item_dedups_and_trims() {
        let mut settings = Settings::default();
        assert!(settings.add_item(ListKind::Category, " Transfer "));
        assert!(!settings.add_item(ListKind::Category, "Transfer"));
        assert!(!settings.add_item(ListKind::Category, "   "));
        assert_eq!(settings.list(ListKind::Category), ["Transfer".to_string()]);
    }

    #[test]
    fn test_remove_item_and_index() {
        let mut settings = Settings::default();
        settings.add_item(ListKind::Subcategory, "Rent");
        settings.add_item(ListKind::Subcategory, "Gym");
        settings.add_item(ListKind::Subcategory, "Books");

        assert!(settings.remove_item(ListKind::Subcategory, "Gym"));
        assert!(!settings.remove_item(ListKind::Subcategory, "Gym"));
        assert_eq!(
            settings.remove_index(ListKind::Subcategory, 1),
            Some("Books".to_string())
        );
        assert_eq!(settings.remove_index(ListKind::Subcategory, 5), None);
        assert_eq!(settings.list(ListKind::Subcategory), ["Rent".to_string()]);
    }

    #[test]
    fn test_normalize() {
        let mut settings = Settings::default();
        settings.partner_accounts = vec!["A".into(), "".into(), "A".into(), "B".into()];
        settings.normalize();
        assert_eq!(settings.partner_accounts, vec!["A", "B"]);
    }

    #[test]
    fn test_split_rate_range() {
        let mut settings = Settings::default();
        assert!(settings.split_rate_in_range());
        settings.split_rate = 1.2;
        assert!(!settings.split_rate_in_range());
        settings.split_rate = f64::NAN;
        assert!(!settings.split_rate_in_range());
    }

    #[test]
    fn test_endpoint_debug_hides_token() {
        let endpoint = ExportEndpoint {
            url: "https://script.google.com/macros/s/abc/exec".into(),
            token: "secret".into(),
        };
        let debug = format!("{:?}", endpoint);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("script.google.com"));
    }
}
