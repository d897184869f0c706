//! Service layer for expense-split
//!
//! The calculator is a pure function over transactions and settings; the
//! other services feed it (import, session) or edit what it reads (settings).

pub mod calculator;
pub mod import;
pub mod session;
pub mod settings;

pub use calculator::{calculate, classify_all, RowStatus, SplitRules};
pub use import::{ColumnMapping, Extraction, ImportReport, ImportService, InputFormat};
pub use session::{ExtractionTicket, Session, Snapshot};
pub use settings::SettingsService;
