//! Core data models for expense-split
//!
//! Transactions as extracted from the accounting page, the yen amount type,
//! and the calculation result value object.

pub mod money;
pub mod results;
pub mod transaction;

pub use money::Yen;
pub use results::CalculationResults;
pub use transaction::{parse_flag, parse_memo_percentage, Transaction};
