//! Language store with broadcast-on-write.
//!
//! Several unrelated parts of the page render language-dependent content
//! without a shared parent, so the store owns its own publish/subscribe
//! registry: subscribers register a callback and are notified synchronously
//! on every change. There is no ambient event bus to forget to unhook from -
//! dropping the [`Subscription`] handle unsubscribes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::info;

use vitrine_types::{Language, keys};

use crate::storage::Storage;

type Callback = Arc<dyn Fn(Language) + Send + Sync>;

struct Subscriber {
    id: u64,
    callback: Callback,
}

type Registry = Mutex<Vec<Subscriber>>;

/// The active display language, persisted and broadcast on every change.
pub struct LanguageStore {
    storage: Arc<dyn Storage>,
    current: Mutex<Language>,
    subscribers: Arc<Registry>,
    next_id: AtomicU64,
}

/// RAII subscription handle returned by [`LanguageStore::subscribe`].
///
/// Dropping it removes the callback from the registry; a dropped subscriber
/// is never called again. Teardown-unsubscription is therefore structural,
/// not a convention callers can forget.
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|s| s.id != self.id);
        }
    }
}

impl LanguageStore {
    /// Build the store from the persisted value.
    ///
    /// An absent or unrecognized persisted value falls back to the default
    /// (`fr`) silently; a bad value is not worth surfacing to the visitor.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let current = storage
            .get(keys::LANGUAGE)
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default();
        Self {
            storage,
            current: Mutex::new(current),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a callback for language changes.
    ///
    /// The callback fires on every subsequent [`set_language`] until the
    /// returned handle is dropped. It is invoked outside the registry lock,
    /// so it may itself subscribe or drop other subscriptions.
    ///
    /// [`set_language`]: LanguageStore::set_language
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(Language) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                callback: Arc::new(callback),
            });
        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Persist and broadcast a new language.
    ///
    /// Validation is the type: only members of the closed [`Language`] set
    /// can reach this call. The notification pass is synchronous - by the
    /// time this returns, every live subscriber has observed `lang`, and a
    /// subscriber reading [`language`](LanguageStore::language) from inside
    /// its callback sees the new value, never a stale one. The store expects
    /// a single writer (the interaction thread).
    pub fn set_language(&self, lang: Language) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = lang;
        self.storage.set(keys::LANGUAGE, lang.as_str());
        info!(language = lang.as_str(), "Language changed");

        // Snapshot under the lock, invoke outside it.
        let snapshot: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| Arc::clone(&s.callback))
            .collect();
        for callback in snapshot {
            callback(lang);
        }
    }
}
