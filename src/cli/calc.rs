//! Calculation CLI commands
//!
//! `calc` prints the split summary for an export file; `list` shows every row
//! with the calculator's verdict.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::warn;

use crate::config::Settings;
use crate::display::{format_breakdown, format_results, format_transaction_table};
use crate::error::{SplitError, SplitResult};
use crate::services::{calculate, classify_all, Extraction, ImportService};

/// Arguments for `calc`
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Transaction export (CSV or JSON); `-` reads CSV from stdin
    pub input: PathBuf,

    /// Show how the payment was derived
    #[arg(short, long)]
    pub breakdown: bool,

    /// Print the results as JSON
    #[arg(long, conflicts_with = "breakdown")]
    pub json: bool,
}

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Transaction export (CSV or JSON); `-` reads CSV from stdin
    pub input: PathBuf,

    /// Hide rows that do not take part in the calculation
    #[arg(long)]
    pub in_scope: bool,
}

/// Read transactions from a file, or CSV from stdin for `-`
pub fn load_transactions(input: &Path) -> SplitResult<Extraction> {
    let service = ImportService::new();

    let extraction = if input == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| SplitError::Import(format!("Failed to read stdin: {}", e)))?;
        service.parse_csv(buffer.as_slice())?
    } else {
        service.import_file(input)?
    };

    for (row, message) in &extraction.report.messages {
        warn!(row, "{}", message);
    }
    if extraction.report.skipped > 0 {
        eprintln!(
            "Skipped {} of {} rows that could not be read.",
            extraction.report.skipped, extraction.report.rows_read
        );
    }

    Ok(extraction)
}

/// Human-readable label for an input path
pub fn source_label(input: &Path) -> String {
    if input == Path::new("-") {
        "stdin".to_string()
    } else {
        input.display().to_string()
    }
}

/// Handle `calc`
pub fn handle_calc_command(settings: &Settings, args: CalcArgs) -> SplitResult<()> {
    let extraction = load_transactions(&args.input)?;
    let results = calculate(&extraction.transactions, settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print!("{}", format_results(&results, &settings.partner_name));

    if args.breakdown {
        let statuses = classify_all(&extraction.transactions, settings);
        print!(
            "{}",
            format_breakdown(&results, settings.split_rate, &statuses)
        );
    }

    Ok(())
}

/// Handle `list`
pub fn handle_list_command(settings: &Settings, args: ListArgs) -> SplitResult<()> {
    let extraction = load_transactions(&args.input)?;
    print!(
        "{}",
        format_transaction_table(&extraction.transactions, settings, args.in_scope)
    );
    Ok(())
}
