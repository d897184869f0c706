//! CLI commands for export
//!
//! File reports (JSON, YAML, CSV) and the spreadsheet endpoint.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::calc::{load_transactions, source_label};
use crate::config::Settings;
use crate::error::{SplitError, SplitResult};
use crate::export::{
    export_report_csv, export_report_json, export_report_yaml, infer_month,
    month_from_period_header, send_with_retry, ExportSink, MonthlyTotal, ResultsReport,
    RetryPolicy, SpreadsheetSink,
};
use crate::models::Transaction;
use crate::services::calculate;

/// Report format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Full report as JSON
    Json,
    /// Full report as YAML, human-readable
    Yaml,
    /// In-scope rows plus a summary block
    Csv,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Write a results report
    Report {
        /// Transaction export (CSV or JSON); `-` reads CSV from stdin
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ReportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Send the partner's payment for the month to the spreadsheet
    Sheet {
        /// Transaction export (CSV or JSON); `-` reads CSV from stdin
        input: PathBuf,

        /// Month as YYYY/MM
        #[arg(short, long, conflicts_with = "period")]
        month: Option<String>,

        /// Period header such as "2025/8/1 - 2025/8/31"
        #[arg(long)]
        period: Option<String>,

        /// Attempts before giving up on an unavailable endpoint
        #[arg(long, default_value = "3")]
        attempts: u32,

        /// Print what would be sent without sending
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the spreadsheet endpoint is reachable
    Test,
}

/// Handle export commands
pub fn handle_export_command(settings: &Settings, cmd: ExportCommands) -> SplitResult<()> {
    match cmd {
        ExportCommands::Report {
            input,
            output,
            format,
            pretty,
        } => handle_export_report(settings, input, output, format, pretty),
        ExportCommands::Sheet {
            input,
            month,
            period,
            attempts,
            dry_run,
        } => handle_export_sheet(settings, input, month, period, attempts, dry_run),
        ExportCommands::Test => {
            let sink = SpreadsheetSink::from_settings(settings)?;
            sink.probe()?;
            println!("Spreadsheet endpoint is reachable.");
            Ok(())
        }
    }
}

fn handle_export_report(
    settings: &Settings,
    input: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
    pretty: bool,
) -> SplitResult<()> {
    let extraction = load_transactions(&input)?;
    let report = ResultsReport::build(source_label(&input), &extraction.transactions, settings);

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SplitError::Export(format!("Failed to create directory: {}", e)))?;
            }
            let file = File::create(path)
                .map_err(|e| SplitError::Export(format!("Failed to create file: {}", e)))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ReportFormat::Json => export_report_json(&report, &mut writer, pretty)?,
        ReportFormat::Yaml => export_report_yaml(&report, &mut writer)?,
        ReportFormat::Csv => export_report_csv(&report, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| SplitError::Export(e.to_string()))?;

    if let Some(path) = output {
        eprintln!(
            "Wrote report for {} rows to {}",
            report.rows.len(),
            path.display()
        );
    }

    Ok(())
}

fn resolve_month(
    month: Option<String>,
    period: Option<String>,
    transactions: &[Transaction],
) -> SplitResult<String> {
    if let Some(month) = month {
        return month_from_period_header(&format!("{}/1", month.trim())).ok_or_else(|| {
            SplitError::Validation(format!("Month must look like YYYY/MM, got '{}'", month))
        });
    }

    if let Some(period) = period {
        return month_from_period_header(&period).ok_or_else(|| {
            SplitError::Validation(format!("No YYYY/M/D date found in '{}'", period))
        });
    }

    infer_month(transactions).ok_or_else(|| {
        SplitError::Validation(
            "Could not determine the month from the transactions; pass --month".into(),
        )
    })
}

fn handle_export_sheet(
    settings: &Settings,
    input: PathBuf,
    month: Option<String>,
    period: Option<String>,
    attempts: u32,
    dry_run: bool,
) -> SplitResult<()> {
    let extraction = load_transactions(&input)?;
    let results = calculate(&extraction.transactions, settings);
    let month = resolve_month(month, period, &extraction.transactions)?;
    let total = MonthlyTotal::new(month, results.need);

    if dry_run {
        println!("Would send {} for {}", total.amount, total.month);
        return Ok(());
    }

    let sink = SpreadsheetSink::from_settings(settings)?;
    let policy = RetryPolicy {
        max_attempts: attempts,
        ..RetryPolicy::default()
    };
    send_with_retry(&sink, &total, &policy)?;

    println!("Sent {} for {} to the spreadsheet.", total.amount, total.month);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_month() {
        let mut txn = Transaction::new("1", "100", "Bank", "Food");
        txn.date = "2025/07/15".into();
        let txns = vec![txn];

        assert_eq!(
            resolve_month(Some("2025/8".into()), None, &txns).unwrap(),
            "2025/08"
        );
        assert_eq!(
            resolve_month(None, Some("2025/9/1 - 2025/9/30".into()), &txns).unwrap(),
            "2025/09"
        );
        assert_eq!(resolve_month(None, None, &txns).unwrap(), "2025/07");
        assert!(resolve_month(Some("August".into()), None, &txns)
            .unwrap_err()
            .is_validation());
        assert!(resolve_month(None, None, &[]).unwrap_err().is_validation());
    }
}
