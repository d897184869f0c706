//! CSV report export
//!
//! One row per in-scope transaction, then a separator row and the summary as
//! key/value rows.

use std::io::Write;

use super::json::ResultsReport;
use crate::error::{SplitError, SplitResult};

/// Write a report as CSV
pub fn export_report_csv<W: Write>(report: &ResultsReport, writer: W) -> SplitResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    let export_err = |e: csv::Error| SplitError::Export(e.to_string());

    wtr.write_record([
        "ID",
        "Date",
        "Description",
        "Account",
        "Category",
        "Subcategory",
        "Amount",
        "Special %",
        "Partner Paid",
    ])
    .map_err(export_err)?;

    for row in &report.rows {
        wtr.write_record([
            row.id.as_str(),
            row.date.as_str(),
            row.description.as_str(),
            row.account.as_str(),
            row.category.as_str(),
            row.subcategory.as_str(),
            row.amount.value().to_string().as_str(),
            row.special_percentage
                .map(|p| p.to_string())
                .unwrap_or_default()
                .as_str(),
            if row.partner_paid { "Y" } else { "N" },
        ])
        .map_err(export_err)?;
    }

    let results = &report.results;
    let summary = [
        ("month", report.month.clone().unwrap_or_default()),
        ("split_rate", report.split_rate.to_string()),
        ("sum", results.sum.value().to_string()),
        ("special_total", results.special_total.value().to_string()),
        ("special_offer", format!("{:.2}", results.special_offer)),
        ("need", results.need.value().to_string()),
        ("partner", results.partner.value().to_string()),
        ("lack", results.lack.value().to_string()),
    ];

    wtr.write_record(None::<&[u8]>).map_err(export_err)?;
    for (key, value) in summary {
        wtr.write_record([key, value.as_str()]).map_err(export_err)?;
    }

    wtr.flush().map_err(|e| SplitError::Export(e.to_string()))?;
    Ok(())
}
