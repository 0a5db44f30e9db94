//! Core data types for the wallet watcher.

pub mod address;
pub mod format;
pub mod transaction;

pub use address::*;
pub use transaction::*;
