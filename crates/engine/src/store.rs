//! Durable per-wallet marker store.
//!
//! The store is a small JSON file:
//!
//! ```json
//! {
//!   "wallets": { "0xabc...": { "normal": "0x...", "token": "0x..." } },
//!   "updated_at": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! It is loaded once, mutated in memory, and rewritten in full by
//! [`StateStore::save`]. A missing or unreadable file yields an empty store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use wallet_watch_core::{TxClass, WalletAddress};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("State file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("State serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Last-seen markers for one wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Most recent native transaction hash observed.
    #[serde(rename = "normal", default, skip_serializing_if = "Option::is_none")]
    pub last_normal_hash: Option<String>,
    /// Most recent token transfer hash observed.
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub last_token_hash: Option<String>,
}

impl WalletState {
    /// Marker for a class.
    pub fn marker(&self, class: TxClass) -> Option<&str> {
        match class {
            TxClass::Native => self.last_normal_hash.as_deref(),
            TxClass::Token => self.last_token_hash.as_deref(),
        }
    }

    /// Replace the marker for a class.
    pub fn set_marker(&mut self, class: TxClass, hash: impl Into<String>) {
        let hash = Some(hash.into());
        match class {
            TxClass::Native => self.last_normal_hash = hash,
            TxClass::Token => self.last_token_hash = hash,
        }
    }
}

/// On-disk representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub wallets: BTreeMap<String, WalletState>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// In-memory marker store backed by a JSON file.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    snapshot: StateSnapshot,
}

impl StateStore {
    /// Create an empty store that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: StateSnapshot::default(),
        }
    }

    /// Load the store from `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty store; the
    /// problem is logged and the file is overwritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No state file yet, starting empty");
                return Self::new(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read state file, starting empty");
                return Self::new(path);
            }
        };

        let parsed: StateSnapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt state file, starting empty");
                return Self::new(path);
            }
        };

        // Keys written by hand may not be normalized. On a case-only
        // collision the first key in sorted order wins.
        let mut snapshot = StateSnapshot {
            wallets: BTreeMap::new(),
            updated_at: parsed.updated_at,
        };
        for (address, state) in parsed.wallets {
            match snapshot.wallets.entry(address.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(state);
                }
                Entry::Occupied(_) => {
                    warn!(
                        path = %path.display(),
                        wallet = %address,
                        "Duplicate wallet key differing only in case, entry ignored"
                    );
                }
            }
        }

        debug!(
            path = %path.display(),
            wallets = snapshot.wallets.len(),
            "Loaded state file"
        );
        Self { path, snapshot }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    /// Number of wallets on record.
    pub fn len(&self) -> usize {
        self.snapshot.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.wallets.is_empty()
    }

    /// Markers for a wallet; empty if the wallet was never seen.
    pub fn wallet(&self, address: &WalletAddress) -> WalletState {
        self.snapshot
            .wallets
            .get(address.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a wallet's markers in memory.
    pub fn update(&mut self, address: &WalletAddress, state: WalletState) {
        self.snapshot
            .wallets
            .insert(address.as_str().to_string(), state);
    }

    /// Stamp `updated_at` and rewrite the file.
    ///
    /// The JSON is written to a sibling temp file first and renamed over
    /// the target, so an interrupted save leaves the previous file intact.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.snapshot.updated_at = Some(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());
        let json = serde_json::to_string_pretty(&self.snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), wallets = self.len(), "Saved state file");
        Ok(())
    }
}
