//! Transaction display formatting
//!
//! Lists extracted rows alongside the calculator's verdict for each, so a
//! user can see why a row did or did not count.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::config::Settings;
use crate::models::Transaction;
use crate::services::{classify_all, RowStatus};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Memo")]
    memo: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, status: &RowStatus) -> Self {
        let category = if txn.subcategory.is_empty() {
            txn.category.clone()
        } else {
            format!("{} / {}", txn.category, txn.subcategory)
        };

        let partner_mark = match status {
            RowStatus::InScope {
                partner_paid: true, ..
            } => " (partner)",
            _ => "",
        };

        Self {
            date: txn.date.clone(),
            description: truncate(&txn.description, 24),
            account: truncate(&txn.account, 16),
            category,
            amount: txn.amount_yen.clone(),
            memo: truncate(&txn.memo, 12),
            status: format!("{}{}", status.label(), partner_mark),
        }
    }
}

/// Format transactions as a table with a status column
///
/// When `in_scope_only` is set, rows the calculator ignores are hidden.
pub fn format_transaction_table(
    transactions: &[Transaction],
    settings: &Settings,
    in_scope_only: bool,
) -> String {
    let statuses = classify_all(transactions, settings);

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .zip(&statuses)
        .filter(|(_, status)| !in_scope_only || status.is_in_scope())
        .map(|(txn, status)| TransactionRow::new(txn, status))
        .collect();

    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
