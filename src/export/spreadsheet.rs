//! Spreadsheet export
//!
//! Forwards a monthly total to a Google Apps Script web app. The app expects a
//! `text/plain` POST whose body is a JSON object `{month, amount, token}` with
//! the amount as a string; a plain GET is used as a connection test.

use std::thread;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ExportEndpoint, Settings};
use crate::error::{SplitError, SplitResult};
use crate::models::{Transaction, Yen};

/// Default request timeout for the spreadsheet endpoint
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A `(month, amount)` pair forwarded to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// `YYYY/MM`
    pub month: String,
    pub amount: Yen,
}

impl MonthlyTotal {
    pub fn new(month: impl Into<String>, amount: Yen) -> Self {
        Self {
            month: month.into(),
            amount,
        }
    }
}

/// Destination for monthly totals
pub trait ExportSink {
    /// Deliver one total
    fn send(&self, total: &MonthlyTotal) -> SplitResult<()>;

    /// Check that the destination is reachable
    fn probe(&self) -> SplitResult<()>;
}

#[derive(Serialize)]
struct SheetPayload<'a> {
    month: &'a str,
    amount: String,
    token: &'a str,
}

/// Google Apps Script web app sink
#[derive(Debug)]
pub struct SpreadsheetSink {
    endpoint: Option<ExportEndpoint>,
    client: Client,
}

impl SpreadsheetSink {
    /// Create a sink for an endpoint; `None` yields a sink that refuses to send
    pub fn new(endpoint: Option<ExportEndpoint>, timeout: Duration) -> SplitResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SplitError::Export(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { endpoint, client })
    }

    /// Create a sink from the configured endpoint
    pub fn from_settings(settings: &Settings) -> SplitResult<Self> {
        Self::new(settings.export.clone(), DEFAULT_TIMEOUT)
    }

    fn endpoint(&self) -> SplitResult<&ExportEndpoint> {
        match &self.endpoint {
            Some(endpoint) if !endpoint.url.is_empty() && !endpoint.token.is_empty() => {
                Ok(endpoint)
            }
            _ => Err(SplitError::Export(
                "Spreadsheet export is not configured; run `expense-split settings set-export`"
                    .into(),
            )),
        }
    }
}

impl ExportSink for SpreadsheetSink {
    fn send(&self, total: &MonthlyTotal) -> SplitResult<()> {
        let endpoint = self.endpoint()?;

        let body = serde_json::to_string(&SheetPayload {
            month: &total.month,
            amount: total.amount.value().to_string(),
            token: &endpoint.token,
        })?;

        let response = self
            .client
            .post(&endpoint.url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .map_err(transport_error)?;

        check_status(response.status())?;
        info!(month = %total.month, amount = total.amount.value(), "monthly total sent");
        Ok(())
    }

    fn probe(&self) -> SplitResult<()> {
        let endpoint = self.endpoint()?;
        let response = self
            .client
            .get(&endpoint.url)
            .send()
            .map_err(transport_error)?;
        check_status(response.status())
    }
}

fn transport_error(err: reqwest::Error) -> SplitError {
    SplitError::NotReady(format!("Spreadsheet endpoint unreachable: {}", err))
}

/// Map an HTTP status to the sink's error model
///
/// Server errors and rate limiting are retryable; other client errors are not.
pub fn check_status(status: StatusCode) -> SplitResult<()> {
    if status.is_success() || status.is_redirection() {
        return Ok(());
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SplitError::NotReady(format!(
            "Spreadsheet endpoint returned {}",
            status
        )));
    }
    Err(SplitError::Export(format!(
        "Spreadsheet endpoint rejected the request: {}",
        status
    )))
}

/// Bounded exponential backoff for retryable sink errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Policy that tries exactly once
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Send a total, retrying while the sink reports `NotReady`
///
/// Returns the number of attempts made on success.
pub fn send_with_retry<S: ExportSink + ?Sized>(
    sink: &S,
    total: &MonthlyTotal,
    policy: &RetryPolicy,
) -> SplitResult<u32> {
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1;

    loop {
        match sink.send(total) {
            Ok(()) => return Ok(attempt),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(attempt, max_attempts, "export not ready, retrying: {}", e);
                thread::sleep(backoff);
                backoff = backoff.saturating_mul(policy.multiplier);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Month of the first `YYYY/M/D` date in a period header
///
/// `"2025/8/1 - 2025/8/31"` gives `"2025/08"`.
pub fn month_from_period_header(text: &str) -> Option<String> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '/'))
        .find_map(parse_slash_date)
        .map(format_month)
}

/// Month of the first transaction with a readable date
pub fn infer_month(transactions: &[Transaction]) -> Option<String> {
    transactions
        .iter()
        .find_map(|txn| parse_row_date(&txn.date))
        .map(format_month)
}

fn parse_slash_date(piece: &str) -> Option<NaiveDate> {
    let mut parts = piece.split('/');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);

    if year.len() != 4 || !(1..=2).contains(&month.len()) || !(1..=2).contains(&day.len()) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y/%m/%d", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn format_month(date: NaiveDate) -> String {
    format!("{:04}/{:02}", date.year(), date.month())
}
