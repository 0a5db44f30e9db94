//! Change detection engine.
//!
//! This crate decides which fetched transactions are new for a wallet and
//! keeps the per-wallet markers that make that decision possible across
//! runs.

pub mod detector;
pub mod store;

pub use detector::*;
pub use store::*;
