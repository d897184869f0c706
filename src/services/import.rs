//! Transaction extraction
//!
//! Reads the Money Forward household-accounting detail export (CSV, or a JSON
//! array of rows) into `Transaction` records. Amount and memo text are kept
//! verbatim; only the calculator interprets them.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{SplitError, SplitResult};
use crate::models::{parse_flag, Transaction};

/// Column positions of a transaction export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub target_column: Option<usize>,
    pub date_column: Option<usize>,
    pub description_column: Option<usize>,
    pub amount_column: usize,
    pub account_column: Option<usize>,
    pub category_column: Option<usize>,
    pub subcategory_column: Option<usize>,
    pub memo_column: Option<usize>,
    pub transfer_column: Option<usize>,
    pub id_column: Option<usize>,
    /// Whether the first record is a header row
    pub has_header: bool,
}

impl ColumnMapping {
    /// Layout of the Money Forward CSV download:
    /// `計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID`
    pub fn money_forward() -> Self {
        Self {
            target_column: Some(0),
            date_column: Some(1),
            description_column: Some(2),
            amount_column: 3,
            account_column: Some(4),
            category_column: Some(5),
            subcategory_column: Some(6),
            memo_column: Some(7),
            transfer_column: Some(8),
            id_column: Some(9),
            has_header: true,
        }
    }

    /// Set whether first row is header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Detect the mapping from a header record
    ///
    /// Japanese and English header names are both recognised. Returns `None`
    /// when no amount column can be found.
    pub fn detect_from_headers(headers: &StringRecord) -> Option<Self> {
        let mut target = None;
        let mut date = None;
        let mut description = None;
        let mut amount = None;
        let mut account = None;
        let mut category = None;
        let mut subcategory = None;
        let mut memo = None;
        let mut transfer = None;
        let mut id = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim_start_matches('\u{feff}').trim().to_lowercase();

            let slot = match h.as_str() {
                "計算対象" | "target" | "is_calculation_target" | "included" => &mut target,
                "日付" | "date" => &mut date,
                "内容" | "description" | "content" => &mut description,
                "金額（円）" | "金額(円)" | "金額" | "amount" | "amount_yen" => &mut amount,
                "保有金融機関" | "account" | "institution" => &mut account,
                "大項目" | "category" => &mut category,
                "中項目" | "subcategory" => &mut subcategory,
                "メモ" | "memo" => &mut memo,
                "振替" | "transfer" | "is_transfer" => &mut transfer,
                "id" => &mut id,
                _ => continue,
            };

            // First occurrence wins
            slot.get_or_insert(idx);
        }

        Some(Self {
            target_column: target,
            date_column: date,
            description_column: description,
            amount_column: amount?,
            account_column: account,
            category_column: category,
            subcategory_column: subcategory,
            memo_column: memo,
            transfer_column: transfer,
            id_column: id,
            has_header: true,
        })
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::money_forward()
    }
}

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Summary of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data records seen (excluding the header)
    pub rows_read: usize,
    /// Records turned into transactions
    pub imported: usize,
    /// Records that could not be read
    pub skipped: usize,
    /// Problems by 1-based data row number
    pub messages: Vec<(usize, String)>,
}

/// Result of reading one export
#[derive(Debug, Clone)]
pub struct Extraction {
    pub transactions: Vec<Transaction>,
    pub report: ImportReport,
}

/// Service for reading transaction exports
#[derive(Debug, Clone, Default)]
pub struct ImportService {
    mapping: Option<ColumnMapping>,
}

impl ImportService {
    /// Create an import service that detects columns from the header row
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed column mapping instead of detecting one
    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self {
            mapping: Some(mapping),
        }
    }

    /// Read a file, choosing the parser from its extension
    pub fn import_file(&self, path: &Path) -> SplitResult<Extraction> {
        if !path.exists() {
            return Err(SplitError::file_not_found(path.display().to_string()));
        }

        let file = File::open(path).map_err(|e| {
            SplitError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);

        let extraction = match InputFormat::from_path(path) {
            InputFormat::Json => self.parse_json(reader)?,
            InputFormat::Csv => self.parse_csv(reader)?,
        };

        debug!(
            path = %path.display(),
            imported = extraction.report.imported,
            skipped = extraction.report.skipped,
            "extracted transactions"
        );

        Ok(extraction)
    }

    /// Parse a JSON array of transaction rows
    pub fn parse_json<R: Read>(&self, reader: R) -> SplitResult<Extraction> {
        let mut transactions: Vec<Transaction> = serde_json::from_reader(reader)
            .map_err(|e| SplitError::Import(format!("Invalid transaction JSON: {}", e)))?;

        for txn in &mut transactions {
            ensure_id(txn);
        }

        let report = ImportReport {
            rows_read: transactions.len(),
            imported: transactions.len(),
            ..ImportReport::default()
        };

        Ok(Extraction {
            transactions,
            report,
        })
    }

    /// Parse CSV rows
    pub fn parse_csv<R: Read>(&self, reader: R) -> SplitResult<Extraction> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = reader.records();
        let mut report = ImportReport::default();
        let mut transactions = Vec::new();

        let first = match records.next() {
            Some(record) => record?,
            None => {
                return Ok(Extraction {
                    transactions,
                    report,
                })
            }
        };

        let mapping = match &self.mapping {
            Some(mapping) => mapping.clone(),
            None => ColumnMapping::detect_from_headers(&first).unwrap_or_else(|| {
                debug!("no recognised header row, using positional Money Forward layout");
                ColumnMapping::money_forward().with_header(false)
            }),
        };

        let pending_first = if mapping.has_header { None } else { Some(first) };

        let rows = pending_first
            .into_iter()
            .map(Ok)
            .chain(records)
            .enumerate();

        for (idx, record) in rows {
            let row_number = idx + 1;
            report.rows_read += 1;

            let result = record
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|r| parse_record(&r, &mapping));

            match result {
                Ok(txn) => {
                    transactions.push(txn);
                    report.imported += 1;
                }
                Err(message) => {
                    warn!(row = row_number, "skipping row: {}", message);
                    report.skipped += 1;
                    report.messages.push((row_number, message));
                }
            }
        }

        Ok(Extraction {
            transactions,
            report,
        })
    }
}

/// Parse a single CSV record
fn parse_record(record: &StringRecord, mapping: &ColumnMapping) -> Result<Transaction, String> {
    let field = |col: Option<usize>| -> String {
        col.and_then(|c| record.get(c))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let amount_yen = record
        .get(mapping.amount_column)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            format!(
                "Missing amount column (expected at least {} fields, found {})",
                mapping.amount_column + 1,
                record.len()
            )
        })?;

    // A file without a target column counts every row
    let is_calculation_target = match mapping.target_column {
        Some(_) => parse_flag(&field(mapping.target_column)),
        None => true,
    };

    let mut txn = Transaction {
        id: field(mapping.id_column),
        is_calculation_target,
        date: field(mapping.date_column),
        description: field(mapping.description_column),
        amount_yen,
        account: field(mapping.account_column),
        category: field(mapping.category_column),
        subcategory: field(mapping.subcategory_column),
        memo: field(mapping.memo_column),
        is_transfer: parse_flag(&field(mapping.transfer_column)),
    };
    ensure_id(&mut txn);

    Ok(txn)
}

fn ensure_id(txn: &mut Transaction) {
    if txn.id.trim().is_empty() {
        txn.id = Uuid::new_v4().to_string();
    }
}
