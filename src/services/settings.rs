//! Settings service
//!
//! Every explicit user edit goes through here: load, change, save atomically,
//! then append an audit entry. Concurrent editors simply overwrite each other
//! (last write wins).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::{ExportEndpoint, ListKind, Settings, SplitPaths};
use crate::error::{SplitError, SplitResult};
use crate::storage::{read_json, read_json_required};

/// Field name used in audit entries for a list
fn list_setting_name(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Category => "expense_category_exclusions",
        ListKind::Subcategory => "expense_subcategory_exclusions",
        ListKind::PartnerAccount => "partner_accounts",
    }
}

/// Flat spreadsheet keys used by the browser extension's settings export
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEndpointKeys {
    gas_api_url: Option<String>,
    gas_api_token: Option<String>,
}

/// Service for reading and editing settings
pub struct SettingsService {
    settings_path: PathBuf,
    audit: AuditLogger,
}

impl SettingsService {
    /// Create a settings service over an explicit settings file
    pub fn new(settings_path: PathBuf, audit: AuditLogger) -> Self {
        Self {
            settings_path,
            audit,
        }
    }

    /// Create a settings service over the default locations
    pub fn from_paths(paths: &SplitPaths) -> Self {
        Self::new(paths.settings_file(), AuditLogger::new(paths.audit_log()))
    }

    /// Path of the settings file in use
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// The audit logger edits are recorded to
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load current settings; defaults when nothing has been saved
    pub fn load(&self) -> SplitResult<Settings> {
        read_json(&self.settings_path)
    }

    fn save(&self, settings: &Settings) -> SplitResult<()> {
        settings.save_to(&self.settings_path)
    }

    fn record(&self, entry: AuditEntry) {
        // A failed audit write must not undo a saved edit
        if let Err(e) = self.audit.log(&entry) {
            warn!("failed to write audit entry: {}", e);
        }
    }

    /// Write defaults for any missing values
    ///
    /// Returns `true` if the settings file did not exist before.
    pub fn init(&self) -> SplitResult<bool> {
        let created = !self.settings_path.exists();
        let before: Option<serde_json::Value> = if created {
            None
        } else {
            Some(read_json_required(&self.settings_path)?)
        };

        let mut settings = self.load()?;
        settings.normalize();
        self.save(&settings)?;

        let after = serde_json::to_value(&settings)?;
        if before.as_ref() != Some(&after) {
            self.record(AuditEntry::change(Operation::Init, "settings", &before, &after));
        }

        info!(path = %self.settings_path.display(), created, "settings initialized");
        Ok(created)
    }

    /// Set the partner's share of ordinary expenses
    ///
    /// Any finite number is stored; values outside `0..=1` are the caller's
    /// call to warn about.
    pub fn set_split_rate(&self, rate: f64) -> SplitResult<Settings> {
        if !rate.is_finite() {
            return Err(SplitError::Validation(format!(
                "Split rate must be a finite number, got {}",
                rate
            )));
        }

        let mut settings = self.load()?;
        let before = settings.split_rate;
        settings.split_rate = rate;
        self.save(&settings)?;
        self.record(AuditEntry::change(
            Operation::Update,
            "split_rate",
            &before,
            &rate,
        ));
        Ok(settings)
    }

    /// Set the partner's display name
    pub fn set_partner_name(&self, name: &str) -> SplitResult<Settings> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::Validation(
                "Partner name cannot be empty".into(),
            ));
        }

        let mut settings = self.load()?;
        let before = std::mem::replace(&mut settings.partner_name, name.to_string());
        self.save(&settings)?;
        self.record(AuditEntry::change(
            Operation::Update,
            "partner_name",
            &before,
            name,
        ));
        Ok(settings)
    }

    /// Add an entry to one of the lists
    ///
    /// Adding an entry that is already present leaves the settings unchanged
    /// and returns `Ok(false)`.
    pub fn add_item(&self, kind: ListKind, item: &str) -> SplitResult<bool> {
        if item.trim().is_empty() {
            return Err(SplitError::Validation(format!(
                "Cannot add an empty entry to {}",
                kind
            )));
        }

        let mut settings = self.load()?;
        if !settings.add_item(kind, item) {
            return Ok(false);
        }

        self.save(&settings)?;
        self.record(AuditEntry::added(list_setting_name(kind), item.trim()));
        Ok(true)
    }

    /// Remove an entry from one of the lists by value
    pub fn remove_item(&self, kind: ListKind, item: &str) -> SplitResult<()> {
        let mut settings = self.load()?;
        if !settings.remove_item(kind, item) {
            return Err(SplitError::entry_not_found(format!(
                "'{}' in {}",
                item.trim(),
                kind
            )));
        }

        self.save(&settings)?;
        self.record(AuditEntry::removed(list_setting_name(kind), item.trim()));
        Ok(())
    }

    /// Remove an entry from one of the lists by 0-based position
    ///
    /// Out-of-range positions change nothing and return `Ok(None)`.
    pub fn remove_index(&self, kind: ListKind, index: usize) -> SplitResult<Option<String>> {
        let mut settings = self.load()?;
        let removed = settings.remove_index(kind, index);

        if let Some(item) = &removed {
            self.save(&settings)?;
            self.record(AuditEntry::removed(list_setting_name(kind), item));
        }

        Ok(removed)
    }

    /// Configure the spreadsheet endpoint
    pub fn set_export(&self, url: &str, token: &str) -> SplitResult<Settings> {
        let url = url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(SplitError::Validation(format!(
                "Export URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        if token.trim().is_empty() {
            return Err(SplitError::Validation("Export token cannot be empty".into()));
        }

        let mut settings = self.load()?;
        let before_url = settings.export.as_ref().map(|e| e.url.clone());
        settings.export = Some(ExportEndpoint {
            url: url.to_string(),
            token: token.trim().to_string(),
        });
        self.save(&settings)?;

        // Tokens stay out of the audit log
        self.record(AuditEntry::change(
            Operation::Update,
            "export.url",
            &before_url,
            url,
        ));
        Ok(settings)
    }

    /// Remove the spreadsheet endpoint. Returns whether one was configured.
    pub fn clear_export(&self) -> SplitResult<bool> {
        let mut settings = self.load()?;
        let Some(previous) = settings.export.take() else {
            return Ok(false);
        };

        self.save(&settings)?;
        self.record(AuditEntry::change(
            Operation::Update,
            "export.url",
            &previous.url,
            &Option::<String>::None,
        ));
        Ok(true)
    }

    /// Replace settings with the contents of a JSON file
    ///
    /// Accepts this tool's own format as well as the browser extension's keys
    /// (`partnerAccount`, `expenceList`, `expenceSubList`, `rate`,
    /// `partnerName`, `gasApiUrl`, `gasApiToken`).
    pub fn import_from(&self, path: &Path) -> SplitResult<Settings> {
        let raw: serde_json::Value = read_json_required(path)?;

        let mut imported: Settings = serde_json::from_value(raw.clone()).map_err(|e| {
            SplitError::Config(format!("Invalid settings in {}: {}", path.display(), e))
        })?;

        if imported.export.is_none() {
            let legacy: LegacyEndpointKeys = serde_json::from_value(raw).unwrap_or_default();
            if let (Some(url), Some(token)) = (legacy.gas_api_url, legacy.gas_api_token) {
                if !url.trim().is_empty() && !token.trim().is_empty() {
                    imported.export = Some(ExportEndpoint { url, token });
                }
            }
        }
        imported.normalize();

        let before = self.load()?;
        self.save(&imported)?;

        let redact = |s: &Settings| {
            let mut s = s.clone();
            if let Some(export) = s.export.as_mut() {
                export.token = "<redacted>".into();
            }
            s
        };
        self.record(AuditEntry::change(
            Operation::Import,
            "settings",
            &redact(&before),
            &redact(&imported),
        ));

        info!(source = %path.display(), "settings imported");
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_service() -> (TempDir, SettingsService) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, SettingsService::from_paths(&paths))
    }

    #[test]
    fn test_load_defaults_when_missing() {
        let (_temp, service) = create_service();
        assert_eq!(service.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_init_creates_file_once() {
        let (_temp, service) = create_service();

        assert!(service.init().unwrap());
        assert!(service.settings_path().exists());
        assert!(!service.init().unwrap());

        // Second init changed nothing, so only one audit entry
        assert_eq!(service.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_init_fills_missing_keys() {
        let (_temp, service) = create_service();
        std::fs::write(service.settings_path(), r#"{"partnerAccount": ["Bank X"]}"#).unwrap();

        service.init().unwrap();

        let raw: serde_json::Value =
            read_json_required(service.settings_path()).unwrap();
        assert_eq!(raw["split_rate"], serde_json::json!(0.5));
        assert_eq!(raw["partner_name"], serde_json::json!("Partner"));
        assert_eq!(raw["partner_accounts"], serde_json::json!(["Bank X"]));
    }

    #[test]
    fn test_set_split_rate() {
        let (_temp, service) = create_service();

        service.set_split_rate(0.4).unwrap();
        assert_eq!(service.load().unwrap().split_rate, 0.4);

        let err = service.set_split_rate(f64::INFINITY).unwrap_err();
        assert!(err.is_validation());

        let entries = service.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].setting, "split_rate");
    }

    #[test]
    fn test_set_partner_name() {
        let (_temp, service) = create_service();

        service.set_partner_name(" Hanako ").unwrap();
        assert_eq!(service.load().unwrap().partner_name, "Hanako");
        assert!(service.set_partner_name("  ").unwrap_err().is_validation());
    }

    #[test]
    fn test_add_and_remove_items() {
        let (_temp, service) = create_service();

        assert!(service.add_item(ListKind::Category, "Transfer").unwrap());
        assert!(!service.add_item(ListKind::Category, "Transfer").unwrap());
        assert!(service.add_item(ListKind::Category, "Cash").unwrap());

        service.remove_item(ListKind::Category, "Transfer").unwrap();
        assert!(service
            .remove_item(ListKind::Category, "Transfer")
            .unwrap_err()
            .is_not_found());

        assert_eq!(
            service.remove_index(ListKind::Category, 0).unwrap(),
            Some("Cash".to_string())
        );
        assert_eq!(service.remove_index(ListKind::Category, 3).unwrap(), None);
        assert!(service.load().unwrap().expense_category_exclusions.is_empty());
    }

    #[test]
    fn test_empty_item_rejected() {
        let (_temp, service) = create_service();
        assert!(service
            .add_item(ListKind::PartnerAccount, " ")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_export_endpoint_and_token_not_audited() {
        let (_temp, service) = create_service();

        service
            .set_export("https://script.google.com/macros/s/x/exec", "s3cret")
            .unwrap();
        let settings = service.load().unwrap();
        assert_eq!(settings.export.unwrap().token, "s3cret");

        let log = std::fs::read_to_string(service.audit().path()).unwrap();
        assert!(!log.contains("s3cret"));

        assert!(service.clear_export().unwrap());
        assert!(!service.clear_export().unwrap());
        assert!(service.load().unwrap().export.is_none());
    }

    #[test]
    fn test_set_export_validates_url() {
        let (_temp, service) = create_service();
        assert!(service
            .set_export("script.google.com", "t")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_import_extension_settings() {
        let (temp, service) = create_service();
        let source = temp.path().join("extension.json");
        std::fs::write(
            &source,
            r#"{
                "partnerAccount": ["Bank X", "Bank X"],
                "expenceList": ["振替"],
                "expenceSubList": [],
                "rate": 0.6,
                "partnerName": "Hanako",
                "gasApiUrl": "https://script.google.com/macros/s/x/exec",
                "gasApiToken": "tok"
            }"#,
        )
        .unwrap();

        let imported = service.import_from(&source).unwrap();

        assert_eq!(imported.partner_accounts, vec!["Bank X"]);
        assert_eq!(imported.split_rate, 0.6);
        assert_eq!(imported.export.as_ref().unwrap().token, "tok");
        assert_eq!(service.load().unwrap(), imported);

        let log = std::fs::read_to_string(service.audit().path()).unwrap();
        assert!(!log.contains("\"tok\""));
    }
}
