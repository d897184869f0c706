//! Session state
//!
//! Owns the current transaction snapshot. Each extraction pass takes a ticket
//! before reading; when it finishes, its result replaces the snapshot
//! wholesale unless a newer pass has started in the meantime, in which case
//! the older result is dropped. Nothing is merged.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::calculator::calculate;
use crate::config::Settings;
use crate::models::{CalculationResults, Transaction};

/// Handed out when an extraction pass starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExtractionTicket(u64);

impl ExtractionTicket {
    /// Generation number of this pass
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// The transaction set produced by one extraction pass
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Rows in source order
    pub transactions: Vec<Transaction>,
    /// Generation of the pass that produced it
    pub generation: u64,
    /// Where the rows came from (usually a file path)
    pub source: String,
    /// When the pass was committed
    pub extracted_at: DateTime<Utc>,
}

/// Coordinates extraction passes and the snapshot they produce
#[derive(Debug, Default)]
pub struct Session {
    latest_ticket: u64,
    snapshot: Option<Snapshot>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an extraction pass; supersedes any pass still in flight
    pub fn begin_extraction(&mut self) -> ExtractionTicket {
        self.latest_ticket += 1;
        ExtractionTicket(self.latest_ticket)
    }

    /// Apply the result of a pass
    ///
    /// Returns `false` and leaves the snapshot untouched when `ticket` has
    /// been superseded by a later `begin_extraction`.
    pub fn commit(
        &mut self,
        ticket: ExtractionTicket,
        source: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(
                generation = ticket.0,
                latest = self.latest_ticket,
                "dropping superseded extraction"
            );
            return false;
        }

        let source = source.into();
        info!(
            generation = ticket.0,
            rows = transactions.len(),
            source = %source,
            "transaction snapshot replaced"
        );

        self.snapshot = Some(Snapshot {
            transactions,
            generation: ticket.0,
            source,
            extracted_at: Utc::now(),
        });
        true
    }

    /// Begin and immediately commit a pass
    pub fn replace(&mut self, source: impl Into<String>, transactions: Vec<Transaction>) {
        let ticket = self.begin_extraction();
        self.commit(ticket, source, transactions);
    }

    /// The current snapshot, if any pass has completed
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Current transactions, empty before the first pass
    pub fn transactions(&self) -> &[Transaction] {
        self.snapshot
            .as_ref()
            .map(|s| s.transactions.as_slice())
            .unwrap_or(&[])
    }

    /// Recompute results from the current snapshot
    ///
    /// `None` until an extraction has been committed.
    pub fn results(&self, settings: &Settings) -> Option<CalculationResults> {
        self.snapshot
            .as_ref()
            .map(|s| calculate(&s.transactions, settings))
    }
}
