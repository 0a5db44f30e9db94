//! Telegram notifications for wallet activity.
//!
//! This crate provides:
//! - Message formatting for native and token transfers
//! - The `NotificationSink` trait and a Telegram Bot API implementation
//! - Logging and recording sinks for dry runs and tests

pub mod config;
pub mod message;
pub mod notifier;
pub mod telegram;

pub use config::TelegramConfig;
pub use message::MessageFormatter;
pub use notifier::{LogSink, NotificationSink, RecordingSink};
pub use telegram::{TelegramError, TelegramNotifier};
