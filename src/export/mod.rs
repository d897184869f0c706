//! Export module for expense-split
//!
//! - Spreadsheet: forwards the monthly total to a web endpoint
//! - JSON/YAML: full results report with the rows behind it
//! - CSV: in-scope rows plus a summary block

pub mod csv;
pub mod json;
pub mod spreadsheet;
pub mod yaml;

pub use self::csv::export_report_csv;
pub use json::{export_report_json, ReportRow, ResultsReport, REPORT_SCHEMA_VERSION};
pub use spreadsheet::{
    infer_month, month_from_period_header, send_with_retry, ExportSink, MonthlyTotal,
    RetryPolicy, SpreadsheetSink,
};
pub use yaml::export_report_yaml;
