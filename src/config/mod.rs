//! Configuration module for expense-split
//!
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SplitPaths;
pub use settings::{ExportEndpoint, ListKind, Settings};
