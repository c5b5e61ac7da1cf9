//! Preference storage abstraction.
//!
//! The stores persist plain string values under disjoint keys (see
//! `vitrine_types::keys`). Writes are single-threaded from the stores' point
//! of view, so backends only need interior mutability, not coordination.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Key-value persistence for visitor preferences.
///
/// Signatures are infallible on purpose: a preference that fails to persist
/// must not surface as an error to the visitor. Backends log failures and
/// keep serving the in-memory view.
pub trait Storage: Send + Sync {
    /// Read the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`.
    fn set(&self, key: &str, value: &str);

    /// Remove `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory storage for tests and sessions that opt out of persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
