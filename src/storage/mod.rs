//! Storage layer for expense-split
//!
//! Only settings are persisted; transactions are re-extracted every cycle and
//! results are always recomputed. This module provides the atomic JSON file
//! primitives the settings store is built on.

pub mod file_io;

pub use file_io::{read_json, read_json_required, write_json_atomic};
