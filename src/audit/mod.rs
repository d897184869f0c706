//! Settings audit log
//!
//! Settings change only through explicit user edits; every edit is appended
//! to a line-delimited JSON log with the value before and after.
//!
//! ```rust,ignore
//! use expense_split::audit::{AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::change(Operation::Update, "split_rate", &0.5, &0.4))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
