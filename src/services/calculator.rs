//! Expense calculator
//!
//! Turns an extracted transaction set plus the user's settings into the split
//! summary. Pure and total: rows that cannot be interpreted are dropped, never
//! reported as errors.
//!
//! Stages, in order:
//!
//! 1. in-scope filter (target flag, category and subcategory exclusions,
//!    non-zero integer amount)
//! 2. special detection (memo is a bare integer percentage)
//! 3. aggregation of `sum`, `special_total`, `special_offer` and `partner`
//! 4. `need = floor((sum - special_total) * split_rate + special_offer)`,
//!    `lack = need - partner`

use std::collections::HashSet;

use serde::Serialize;

use crate::config::Settings;
use crate::models::{CalculationResults, Transaction, Yen};

/// Why a row was left out, or how it was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowStatus {
    /// The source page did not count the row
    NotTarget,
    /// Major category is excluded
    ExcludedCategory,
    /// Minor category is excluded
    ExcludedSubcategory,
    /// Amount is zero or not an integer
    ZeroOrInvalidAmount,
    /// Row takes part in the calculation
    InScope {
        amount: Yen,
        /// Memo percentage when the row is special
        special_percentage: Option<i64>,
        /// Paid from one of the partner's accounts
        partner_paid: bool,
    },
}

impl RowStatus {
    /// Check if the row takes part in the calculation
    pub fn is_in_scope(&self) -> bool {
        matches!(self, Self::InScope { .. })
    }

    /// Check if the row is in scope and special
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            Self::InScope {
                special_percentage: Some(_),
                ..
            }
        )
    }

    /// Short human-readable label
    pub fn label(&self) -> String {
        match self {
            Self::NotTarget => "not target".to_string(),
            Self::ExcludedCategory => "excluded category".to_string(),
            Self::ExcludedSubcategory => "excluded subcategory".to_string(),
            Self::ZeroOrInvalidAmount => "zero/invalid amount".to_string(),
            Self::InScope {
                special_percentage: Some(pct),
                ..
            } => format!("special {}%", pct),
            Self::InScope { .. } => "in scope".to_string(),
        }
    }
}

/// Settings lookups prepared once per calculation
#[derive(Debug)]
pub struct SplitRules<'a> {
    category_exclusions: HashSet<&'a str>,
    subcategory_exclusions: HashSet<&'a str>,
    partner_accounts: HashSet<&'a str>,
    split_rate: f64,
}

impl<'a> SplitRules<'a> {
    /// Build exact-match lookup sets from the settings lists
    pub fn from_settings(settings: &'a Settings) -> Self {
        fn to_set(list: &[String]) -> HashSet<&str> {
            list.iter().map(String::as_str).collect()
        }

        Self {
            category_exclusions: to_set(&settings.expense_category_exclusions),
            subcategory_exclusions: to_set(&settings.expense_subcategory_exclusions),
            partner_accounts: to_set(&settings.partner_accounts),
            split_rate: settings.split_rate,
        }
    }

    /// Classify a single row
    pub fn classify(&self, txn: &Transaction) -> RowStatus {
        if !txn.is_calculation_target {
            return RowStatus::NotTarget;
        }
        if self.category_exclusions.contains(txn.category.as_str()) {
            return RowStatus::ExcludedCategory;
        }
        if self.subcategory_exclusions.contains(txn.subcategory.as_str()) {
            return RowStatus::ExcludedSubcategory;
        }

        match txn.amount() {
            Some(amount) if !amount.is_zero() => RowStatus::InScope {
                amount,
                special_percentage: txn.special_percentage(),
                partner_paid: self.partner_accounts.contains(txn.account.as_str()),
            },
            _ => RowStatus::ZeroOrInvalidAmount,
        }
    }
}

/// Classify every row, preserving input order
pub fn classify_all(transactions: &[Transaction], settings: &Settings) -> Vec<RowStatus> {
    let rules = SplitRules::from_settings(settings);
    transactions.iter().map(|txn| rules.classify(txn)).collect()
}

/// Compute the split summary for a transaction set
///
/// # Examples
/// ```
/// use expense_split::config::Settings;
/// use expense_split::models::{Transaction, Yen};
/// use expense_split::services::calculate;
///
/// let mut settings = Settings::default();
/// settings.partner_accounts.push("Bank X".into());
///
/// let txns = vec![Transaction::new("1", "10,000", "Bank X", "Food")];
/// let results = calculate(&txns, &settings);
///
/// assert_eq!(results.need, Yen::new(5000));
/// assert_eq!(results.lack, Yen::new(-5000));
/// ```
pub fn calculate(transactions: &[Transaction], settings: &Settings) -> CalculationResults {
    let rules = SplitRules::from_settings(settings);

    // Totals are widened so no input can overflow; they are clamped back to
    // the i64 range only when stored.
    let mut sum: i128 = 0;
    let mut special_total: i128 = 0;
    let mut special_offer = 0.0_f64;
    let mut partner: i128 = 0;

    for txn in transactions {
        let RowStatus::InScope {
            amount,
            special_percentage,
            partner_paid,
        } = rules.classify(txn)
        else {
            continue;
        };

        let value = i128::from(amount.value());
        sum += value;

        if let Some(pct) = special_percentage {
            special_total += value;
            special_offer += amount.value() as f64 * pct as f64 / 100.0;
        }

        if partner_paid {
            partner += value;
        }
    }

    let ordinary = (sum - special_total) as f64;
    // Float-to-int `as` saturates, and NaN becomes 0
    let need = (ordinary * rules.split_rate + special_offer).floor() as i64;

    CalculationResults {
        sum: Yen::saturating_from_i128(sum),
        special_total: Yen::saturating_from_i128(special_total),
        special_offer,
        need: Yen::new(need),
        partner: Yen::saturating_from_i128(partner),
        lack: Yen::saturating_from_i128(i128::from(need) - partner),
    }
}
