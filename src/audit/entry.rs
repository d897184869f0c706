//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of settings edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entry appended to a list
    Add,
    /// Entry removed from a list
    Remove,
    /// Scalar value replaced
    Update,
    /// Whole settings document replaced from a file
    Import,
    /// Defaults written for missing values
    Init,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Add => write!(f, "ADD"),
            Operation::Remove => write!(f, "REMOVE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Init => write!(f, "INIT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the edit happened (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Settings field that changed, e.g. `split_rate` or `partner_accounts`
    pub setting: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Record a change of `setting` from `before` to `after`
    pub fn change<B: Serialize + ?Sized, A: Serialize + ?Sized>(
        operation: Operation,
        setting: impl Into<String>,
        before: &B,
        after: &A,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            setting: setting.into(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
        }
    }

    /// Record a list entry being added
    pub fn added(setting: impl Into<String>, item: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Add,
            setting: setting.into(),
            before: None,
            after: Some(serde_json::Value::String(item.to_string())),
        }
    }

    /// Record a list entry being removed
    pub fn removed(setting: impl Into<String>, item: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Remove,
            setting: setting.into(),
            before: Some(serde_json::Value::String(item.to_string())),
            after: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let show = |v: &Option<serde_json::Value>| match v {
            Some(value) => value.to_string(),
            None => "-".to_string(),
        };

        format!(
            "[{}] {:<6} {}: {} -> {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.setting,
            show(&self.before),
            show(&self.after)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Add.to_string(), "ADD");
        assert_eq!(Operation::Remove.to_string(), "REMOVE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_change_entry() {
        let entry = AuditEntry::change(Operation::Update, "split_rate", &0.5, &0.4);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.setting, "split_rate");
        assert_eq!(entry.before, Some(serde_json::json!(0.5)));
        assert_eq!(entry.after, Some(serde_json::json!(0.4)));
    }

    #[test]
    fn test_added_and_removed() {
        let added = AuditEntry::added("partner_accounts", "Bank X");
        assert!(added.before.is_none());
        assert_eq!(added.after, Some(serde_json::json!("Bank X")));

        let removed = AuditEntry::removed("partner_accounts", "Bank X");
        assert_eq!(removed.operation, Operation::Remove);
        assert!(removed.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::change(Operation::Update, "partner_name", "Partner", "Hanako");
        let text = entry.format_human_readable();
        assert!(text.contains("UPDATE"));
        assert!(text.contains("partner_name: \"Partner\" -> \"Hanako\""));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::added("expense_category_exclusions", "Transfer");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"before\""));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.operation, Operation::Add);
        assert_eq!(deserialized.setting, "expense_category_exclusions");
    }
}
