//! Display formatting for terminal output
//!
//! Provides the results panel and the transaction listing.

pub mod report;
pub mod transaction;

pub use report::{format_breakdown, format_results};
pub use transaction::format_transaction_table;
