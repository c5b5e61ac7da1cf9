//! Cookie-consent store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::info;

use vitrine_types::{ConsentState, keys};

use crate::storage::Storage;

/// Tracks the visitor's cookie-usage decision.
///
/// Banner visibility is latched at construction: the banner shows iff no
/// decision was persisted when the store was built, and recording a decision
/// hides it for good. [`ConsentStore::reset`] only clears the persisted
/// value - the banner reappears on the next construction, which is the
/// reload-equivalent re-initialization the reset flow goes through.
///
/// Purely local; no server round-trip, no retries.
pub struct ConsentStore {
    storage: Arc<dyn Storage>,
    decision: Mutex<ConsentState>,
    banner_visible: AtomicBool,
}

impl ConsentStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let decision = ConsentState::from_stored(storage.get(keys::COOKIE_CONSENT).as_deref());
        Self {
            storage,
            banner_visible: AtomicBool::new(!decision.decided()),
            decision: Mutex::new(decision),
        }
    }

    #[must_use]
    pub fn decision(&self) -> ConsentState {
        *self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn banner_visible(&self) -> bool {
        self.banner_visible.load(Ordering::Relaxed)
    }

    /// Record acceptance and hide the banner.
    pub fn accept(&self) {
        self.record(ConsentState::Accepted);
    }

    /// Record rejection and hide the banner.
    pub fn reject(&self) {
        self.record(ConsentState::Rejected);
    }

    /// Clear the persisted decision.
    ///
    /// The in-memory decision and banner state are left untouched; the
    /// banner reappears when the session is re-initialized.
    pub fn reset(&self) {
        self.storage.remove(keys::COOKIE_CONSENT);
        info!("Cookie consent reset; banner returns on next session");
    }

    fn record(&self, state: ConsentState) {
        if let Some(value) = state.stored_value() {
            self.storage.set(keys::COOKIE_CONSENT, value);
        }
        *self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = state;
        self.banner_visible.store(false, Ordering::Relaxed);
        info!(decision = ?state, "Cookie consent recorded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store_with(storage: Arc<MemoryStorage>) -> ConsentStore {
        ConsentStore::new(storage)
    }

    #[test]
    fn banner_shows_until_a_decision_is_recorded() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        assert_eq!(store.decision(), ConsentState::Undecided);
        assert!(store.banner_visible());

        store.accept();
        assert_eq!(store.decision(), ConsentState::Accepted);
        assert!(!store.banner_visible());
        assert_eq!(storage.get(keys::COOKIE_CONSENT).as_deref(), Some("true"));
    }

    #[test]
    fn persisted_decision_suppresses_banner_on_fresh_initialization() {
        let storage = Arc::new(MemoryStorage::new());
        store_with(Arc::clone(&storage)).accept();

        // Fresh mount with the key present: no banner.
        let store = store_with(Arc::clone(&storage));
        assert_eq!(store.decision(), ConsentState::Accepted);
        assert!(!store.banner_visible());
    }

    #[test]
    fn reject_persists_false() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));
        store.reject();
        assert_eq!(storage.get(keys::COOKIE_CONSENT).as_deref(), Some("false"));
        assert_eq!(store.decision(), ConsentState::Rejected);
    }

    #[test]
    fn reset_clears_storage_and_banner_returns_next_session() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));
        store.accept();

        store.reset();
        assert_eq!(storage.get(keys::COOKIE_CONSENT), None);
        // Current session keeps its decision until re-initialization.
        assert_eq!(store.decision(), ConsentState::Accepted);
        assert!(!store.banner_visible());

        let next_session = store_with(Arc::clone(&storage));
        assert_eq!(next_session.decision(), ConsentState::Undecided);
        assert!(next_session.banner_visible());
    }

    #[test]
    fn unrecognized_persisted_value_reads_as_undecided() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::COOKIE_CONSENT, "maybe");
        let store = store_with(storage);
        assert_eq!(store.decision(), ConsentState::Undecided);
        assert!(store.banner_visible());
    }
}
