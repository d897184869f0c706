//! expense-split - split shared household expenses with a partner
//!
//! Reads a Money Forward transaction export, filters it by the user's
//! exclusion lists and works out how much the partner owes for the month.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Transactions, yen amounts and calculation results
//! - `storage`: Atomic JSON file helpers
//! - `services`: Calculator, import, session and settings edits
//! - `audit`: Audit log of settings edits
//! - `display`: Terminal formatting
//! - `export`: File reports and the spreadsheet endpoint
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_split::config::{SplitPaths, Settings};
//! use expense_split::services::{calculate, ImportService};
//!
//! let paths = SplitPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let extraction = ImportService::new().import_file("august.csv".as_ref())?;
//! let results = calculate(&extraction.transactions, &settings);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
