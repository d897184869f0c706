//! JSON report export
//!
//! A results report bundles the calculation with the rows that produced it,
//! so a month can be archived and checked later.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::spreadsheet::infer_month;
use crate::config::Settings;
use crate::error::{SplitError, SplitResult};
use crate::models::{CalculationResults, Transaction, Yen};
use crate::services::{calculate, classify_all, RowStatus};

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One in-scope row as it entered the calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub account: String,
    pub category: String,
    pub subcategory: String,
    pub amount: Yen,
    /// Memo percentage for special rows
    pub special_percentage: Option<i64>,
    pub partner_paid: bool,
}

/// Calculation results plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsReport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Report timestamp
    pub generated_at: DateTime<Utc>,

    /// Application version that created the report
    pub app_version: String,

    /// Where the transactions came from
    pub source: String,

    pub partner_name: String,
    pub split_rate: f64,

    /// `YYYY/MM` of the first dated row, if any
    pub month: Option<String>,

    pub results: CalculationResults,

    /// In-scope rows in source order
    pub rows: Vec<ReportRow>,
}

impl ResultsReport {
    /// Calculate and assemble a report
    pub fn build(
        source: impl Into<String>,
        transactions: &[Transaction],
        settings: &Settings,
    ) -> Self {
        let rows = transactions
            .iter()
            .zip(classify_all(transactions, settings))
            .filter_map(|(txn, status)| match status {
                RowStatus::InScope {
                    amount,
                    special_percentage,
                    partner_paid,
                } => Some(ReportRow {
                    id: txn.id.clone(),
                    date: txn.date.clone(),
                    description: txn.description.clone(),
                    account: txn.account.clone(),
                    category: txn.category.clone(),
                    subcategory: txn.subcategory.clone(),
                    amount,
                    special_percentage,
                    partner_paid,
                }),
                _ => None,
            })
            .collect();

        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
            partner_name: settings.partner_name.clone(),
            split_rate: settings.split_rate,
            month: infer_month(transactions),
            results: calculate(transactions, settings),
            rows,
        }
    }

    /// Number of special rows in the report
    pub fn special_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.special_percentage.is_some())
            .count()
    }
}

/// Write a report as JSON
pub fn export_report_json<W: Write>(
    report: &ResultsReport,
    writer: &mut W,
    pretty: bool,
) -> SplitResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, report)
    } else {
        serde_json::to_writer(&mut *writer, report)
    }
    .map_err(|e| SplitError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| SplitError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Transaction>, Settings) {
        let mut settings = Settings::default();
        settings.partner_accounts.push("Bank X".into());
        settings.expense_category_exclusions.push("Transfer".into());

        let mut first = Transaction::new("1", "-1,000", "Bank A", "Food");
        first.date = "2025/08/02".into();
        let txns = vec![
            first,
            Transaction::new("2", "3000", "Bank X", "Rent").with_memo("40"),
            Transaction::new("3", "500", "Bank A", "Transfer"),
        ];
        (txns, settings)
    }

    #[test]
    fn test_build_report() {
        let (txns, settings) = sample();
        let report = ResultsReport::build("august.csv", &txns, &settings);

        assert_eq!(report.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.month.as_deref(), Some("2025/08"));
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.special_count(), 1);
        assert!(report.rows[1].partner_paid);
        assert_eq!(report.results, calculate(&txns, &settings));
    }

    #[test]
    fn test_export_json() {
        let (txns, settings) = sample();
        let report = ResultsReport::build("august.csv", &txns, &settings);

        let mut output = Vec::new();
        export_report_json(&report, &mut output, true).unwrap();

        let parsed: ResultsReport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.results, report.results);
        assert_eq!(parsed.rows, report.rows);
        assert_eq!(parsed.source, "august.csv");
    }
}
