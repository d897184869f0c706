//! Transaction model
//!
//! One row of the Money Forward household-accounting detail table. Amounts
//! and memos are kept exactly as extracted; interpretation is left to the
//! calculator so that a malformed row degrades instead of failing the import.

use serde::{Deserialize, Deserializer, Serialize};

use super::money::Yen;

/// A single extracted transaction row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier, stable within a session
    #[serde(alias = "ID", default)]
    pub id: String,

    /// Whether the source page counted this row in its own total
    #[serde(
        alias = "計算対象",
        alias = "isCalculationTarget",
        deserialize_with = "deserialize_flag",
        default
    )]
    pub is_calculation_target: bool,

    /// Origin-formatted date, never parsed by the calculator
    #[serde(alias = "日付", default)]
    pub date: String,

    /// Free-text description
    #[serde(alias = "内容", default)]
    pub description: String,

    /// Raw amount text, possibly decorated (`"-1,234"`, `"¥500"`)
    #[serde(alias = "金額（円）", alias = "amountYen", default)]
    pub amount_yen: String,

    /// Holding financial institution
    #[serde(alias = "保有金融機関", default)]
    pub account: String,

    /// Major category
    #[serde(alias = "大項目", default)]
    pub category: String,

    /// Minor category
    #[serde(alias = "中項目", default)]
    pub subcategory: String,

    /// Free-text memo; a bare integer marks a special split percentage
    #[serde(alias = "メモ", default)]
    pub memo: String,

    /// Transfer marker, informational only
    #[serde(
        alias = "振替",
        alias = "isTransfer",
        deserialize_with = "deserialize_flag",
        default
    )]
    pub is_transfer: bool,
}

impl Transaction {
    /// Create a counted transaction with the fields that matter for splitting
    pub fn new(
        id: impl Into<String>,
        amount_yen: impl Into<String>,
        account: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            is_calculation_target: true,
            date: String::new(),
            description: String::new(),
            amount_yen: amount_yen.into(),
            account: account.into(),
            category: category.into(),
            subcategory: String::new(),
            memo: String::new(),
            is_transfer: false,
        }
    }

    /// Builder-style subcategory setter
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    /// Builder-style memo setter
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Builder-style target flag setter
    pub fn with_target(mut self, is_calculation_target: bool) -> Self {
        self.is_calculation_target = is_calculation_target;
        self
    }

    /// Parsed amount, `None` if the raw text holds no valid integer
    pub fn amount(&self) -> Option<Yen> {
        Yen::parse_lenient(&self.amount_yen)
    }

    /// Percentage carried in the memo, if the memo is a bare integer
    pub fn special_percentage(&self) -> Option<i64> {
        parse_memo_percentage(&self.memo)
    }

    /// Check if the memo marks this row as a special split
    pub fn is_special(&self) -> bool {
        self.special_percentage().is_some()
    }
}

/// Interpret a memo as a bare integer percentage
///
/// Surrounding whitespace is ignored; anything else (`"30%"`, `"lunch"`, `""`)
/// means the memo is ordinary text. The whole memo must be the number: a
/// prefix parse would read `"30%"` as 30, this does not.
pub fn parse_memo_percentage(memo: &str) -> Option<i64> {
    memo.trim().parse::<i64>().ok()
}

/// Parse a yes/no flag as found in exports
///
/// Money Forward writes `1`/`0`; hand-edited files tend to use booleans.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "✓" | "○"
    )
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => b,
        RawFlag::Int(n) => n != 0,
        RawFlag::Text(s) => parse_flag(&s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_percentage() {
        assert_eq!(parse_memo_percentage("30"), Some(30));
        assert_eq!(parse_memo_percentage(" 50 "), Some(50));
        assert_eq!(parse_memo_percentage("-10"), Some(-10));
        assert_eq!(parse_memo_percentage("30%"), None);
        assert_eq!(parse_memo_percentage("lunch"), None);
        assert_eq!(parse_memo_percentage(""), None);
    }

    #[test]
    fn test_amount_parsing() {
        let txn = Transaction::new("1", "-1,500", "Bank", "Food");
        assert_eq!(txn.amount(), Some(Yen::new(-1500)));

        let txn = Transaction::new("2", "n/a", "Bank", "Food");
        assert_eq!(txn.amount(), None);
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_deserialize_source_keys() {
        let json = r#"{
            "ID": "abc",
            "計算対象": "1",
            "日付": "08/01(金)",
            "内容": "スーパー",
            "金額（円）": "-3,200",
            "保有金融機関": "Bank X",
            "大項目": "食費",
            "中項目": "食料品",
            "メモ": "50",
            "振替": "0"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, "abc");
        assert!(txn.is_calculation_target);
        assert!(!txn.is_transfer);
        assert_eq!(txn.amount(), Some(Yen::new(-3200)));
        assert_eq!(txn.special_percentage(), Some(50));
    }

    #[test]
    fn test_deserialize_native_keys_with_bool_flags() {
        let json = r#"{"id": "x", "is_calculation_target": false, "amount_yen": "100"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(!txn.is_calculation_target);
        assert_eq!(txn.category, "");
    }
}
