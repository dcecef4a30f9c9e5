// 📒 Ledger - the key/value store the registry is built on
//
// The registry only ever needs two primitives:
// - get(key) -> latest bytes, or KeyNotFound
// - put(key, bytes)
//
// There is no compare-and-swap and no transaction spanning a get and a put.
// Ordering of concurrent writers is the ledger's business, not the registry's.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("ledger backend failure at '{key}': {reason}")]
    Backend { key: String, reason: String },
}

impl LedgerError {
    pub fn backend(key: &str, reason: impl ToString) -> Self {
        LedgerError::Backend {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Raw get/put of opaque byte blobs keyed by string
pub trait Ledger: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError>;

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }
}

// ============================================================================
// MEMORY LEDGER
// ============================================================================

/// In-process append-only ledger
///
/// Every put appends a new version for the key; nothing is ever removed.
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    versions: Arc<RwLock<HashMap<String, Vec<Vec<u8>>>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All versions written at a key, oldest first
    pub fn history(&self, key: &str) -> Result<Vec<Vec<u8>>, LedgerError> {
        let versions = self
            .versions
            .read()
            .map_err(|e| LedgerError::backend(key, e))?;
        Ok(versions.get(key).cloned().unwrap_or_default())
    }

    /// Every key with at least one version, sorted
    pub fn keys(&self) -> Vec<String> {
        let versions = match self.versions.read() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut keys: Vec<String> = versions.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let versions = self
            .versions
            .read()
            .map_err(|e| LedgerError::backend(key, e))?;

        versions
            .get(key)
            .and_then(|history| history.last())
            .cloned()
            .ok_or_else(|| LedgerError::KeyNotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let mut versions = self
            .versions
            .write()
            .map_err(|e| LedgerError::backend(key, e))?;

        versions.entry(key.to_string()).or_default().push(value.to_vec());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
