//! New-activity detector.
//!
//! Given a freshly fetched page (most recent first) and the single marker
//! hash remembered from the previous run, decides which prefix of the page
//! is new and what the marker becomes.
//!
//! The marker is the only continuity cursor. When more activity happened
//! than one page can show, the old marker scrolls off the page and the
//! whole page is reported as new; older missed items are not recovered.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wallet_watch_core::Transaction;

/// Policy for a wallet/class pair that has never been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitMode {
    /// Record the current page as the baseline without announcing it.
    #[default]
    Silent,
    /// Announce the entire current page.
    Notify,
}

impl InitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InitMode::Silent => "silent",
            InitMode::Notify => "notify",
        }
    }
}

impl FromStr for InitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Ok(InitMode::Silent),
            "notify" => Ok(InitMode::Notify),
            other => Err(format!("unknown init mode: {}", other)),
        }
    }
}

/// Configuration for the change detector.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    /// Cold-start policy.
    pub init_mode: InitMode,
}

/// How a detection was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing fetched; marker untouched.
    Empty,
    /// No marker on record, page taken as baseline.
    ColdStartSilent,
    /// No marker on record, whole page announced.
    ColdStartNotify,
    /// Marker found at `index`; the `index` newer items are new.
    MarkerFound { index: usize },
    /// Marker not on the page; whole page announced.
    ScrolledOff,
}

/// Result of comparing one fetched page against the stored marker.
#[derive(Debug)]
pub struct Detection<'a, T> {
    pub outcome: Outcome,
    /// New items, oldest first.
    pub new_items: Vec<&'a T>,
    /// Marker to store. `None` only when the page was empty.
    pub marker: Option<String>,
}

impl<'a, T> Detection<'a, T> {
    /// True when the stored marker was not found on the page.
    pub fn is_gap(&self) -> bool {
        self.outcome == Outcome::ScrolledOff
    }

    /// Number of new items.
    pub fn len(&self) -> usize {
        self.new_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty()
    }
}

/// Detects new transactions relative to a stored marker.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    config: DetectorConfig,
}

impl ChangeDetector {
    /// Create a new detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Compare a page (most recent first) against the stored marker.
    ///
    /// Items with an empty hash are ignored. A blank stored marker counts
    /// as no marker. Whenever the page has at least one usable item the
    /// returned marker is the hash of the most recent one, even when
    /// nothing is announced.
    pub fn detect<'a, T: Transaction>(&self, fetched: &'a [T], marker: Option<&str>) -> Detection<'a, T> {
        let page: Vec<&'a T> = fetched.iter().filter(|t| !t.hash().is_empty()).collect();

        let Some(head) = page.first() else {
            return Detection {
                outcome: Outcome::Empty,
                new_items: Vec::new(),
                marker: None,
            };
        };
        let next_marker = Some(head.hash().to_string());

        let (outcome, newer): (Outcome, &[&'a T]) = match marker.filter(|m| !m.is_empty()) {
            None => match self.config.init_mode {
                InitMode::Silent => (Outcome::ColdStartSilent, &page[..0]),
                InitMode::Notify => (Outcome::ColdStartNotify, &page[..]),
            },
            Some(marker) => match page.iter().position(|t| t.hash() == marker) {
                Some(index) => (Outcome::MarkerFound { index }, &page[..index]),
                None => (Outcome::ScrolledOff, &page[..]),
            },
        };

        Detection {
            outcome,
            new_items: newer.iter().rev().copied().collect(),
            marker: next_marker,
        }
    }
}
