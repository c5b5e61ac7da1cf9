//! Session bootstrap.

use std::sync::Arc;

use tracing::warn;

use vitrine_remote::SiteApi;
use vitrine_store::{ConsentStore, LanguageStore, Storage, ThemeStore, ThemeTarget};

/// The per-page-load session: the three preference stores, constructed once
/// and handed to consumers explicitly.
///
/// There is no registry to resolve a store from; holding a `Session` is the
/// proof it was initialized. The stores stay independent - nothing here
/// orchestrates between them beyond construction order.
pub struct Session {
    pub consent: ConsentStore,
    pub language: LanguageStore,
    pub theme: ThemeStore,
}

impl Session {
    /// Construct the stores and resolve the theme from the remote
    /// configuration.
    ///
    /// A failed configuration fetch leaves the theme store on its
    /// provisional fallback and is logged; the session always comes up.
    /// Dropping this future mid-fetch cancels the request - a torn-down
    /// consumer is never updated late.
    pub async fn bootstrap(
        storage: Arc<dyn Storage>,
        target: Arc<dyn ThemeTarget>,
        api: &SiteApi,
    ) -> Self {
        let session = Self::offline(storage, target);
        match api.site_theme().await {
            Ok(config) => session.theme.initialize(&config),
            Err(e) => warn!("Site theme unavailable; keeping fallback: {e}"),
        }
        session
    }

    /// Stores without remote initialization.
    ///
    /// The theme store stays on its fallback until
    /// [`ThemeStore::initialize`] is called with a configuration.
    #[must_use]
    pub fn offline(storage: Arc<dyn Storage>, target: Arc<dyn ThemeTarget>) -> Self {
        Self {
            consent: ConsentStore::new(Arc::clone(&storage)),
            language: LanguageStore::new(Arc::clone(&storage)),
            theme: ThemeStore::new(storage, target),
        }
    }
}
