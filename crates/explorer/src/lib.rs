//! Blockchain explorer client.
//!
//! This crate lists recent native and token transfers for a wallet from an
//! Etherscan-compatible REST API.
//!
//! ## Architecture
//!
//! - `client` - `TransactionSource` trait and the HTTP `ExplorerClient`
//! - `response` - Envelope decoding and per-field fallbacks
//! - `throttle` - Minimum interval between requests

pub mod client;
pub mod error;
pub mod mock;
pub mod response;
pub mod throttle;

pub use client::*;
pub use error::*;
pub use mock::MockTransactionSource;
pub use response::{decode_native_page, decode_token_page, NO_TRANSACTIONS};
pub use throttle::*;
