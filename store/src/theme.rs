//! Theme store and marker application.
//!
//! The remote configuration decides whether the visitor may switch themes;
//! until it resolves, the store reports a provisional fallback. Applying a
//! theme rewrites a marker set on the render target and is idempotent, so
//! it is safe to call on every change notification.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use vitrine_types::keys;
use vitrine_types::theme::{ActiveTheme, SiteTheme, ThemeResolution};

use crate::storage::Storage;

/// Where theme markers are applied.
///
/// Applying a theme must remove both theme markers from the target and add
/// exactly the active one; this is the sole mechanism of visual theme
/// application.
pub trait ThemeTarget: Send + Sync {
    fn apply(&self, theme: ActiveTheme);
}

/// A class-list-like set of markers.
///
/// Non-theme markers coexist with the theme marker and survive theme
/// application untouched.
#[derive(Debug, Default)]
pub struct MarkerSet {
    markers: Mutex<BTreeSet<String>>,
}

impl MarkerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unrelated marker (tests and the host page use this).
    pub fn insert(&self, marker: &str) {
        self.markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(marker.to_string());
    }

    #[must_use]
    pub fn contains(&self, marker: &str) -> bool {
        self.markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(marker)
    }

    /// Current markers, sorted.
    #[must_use]
    pub fn markers(&self) -> Vec<String> {
        self.markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl ThemeTarget for MarkerSet {
    fn apply(&self, theme: ActiveTheme) {
        let mut markers = self.markers.lock().unwrap_or_else(PoisonError::into_inner);
        markers.remove(ActiveTheme::Light.as_str());
        markers.remove(ActiveTheme::Dark.as_str());
        markers.insert(theme.as_str().to_string());
    }
}

enum Phase {
    /// Remote configuration not resolved yet; the fallback is provisional,
    /// not a persisted decision.
    Pending,
    Ready(ThemeResolution),
}

/// Pre-configuration fallback: light, with toggling nominally allowed.
const FALLBACK: ThemeResolution = ThemeResolution {
    theme: ActiveTheme::Light,
    can_toggle: true,
};

/// The active visual theme.
///
/// Construction applies the fallback and waits for
/// [`initialize`](ThemeStore::initialize) with the remote configuration.
/// Toggles arriving before that are ignored rather than persisted: an
/// override recorded during the window could contradict a configuration
/// that turns out to forbid switching.
pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    target: Arc<dyn ThemeTarget>,
    phase: Mutex<Phase>,
}

impl ThemeStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, target: Arc<dyn ThemeTarget>) -> Self {
        target.apply(FALLBACK.theme);
        Self {
            storage,
            target,
            phase: Mutex::new(Phase::Pending),
        }
    }

    /// The theme currently reported to the page.
    #[must_use]
    pub fn theme(&self) -> ActiveTheme {
        match *self.phase.lock().unwrap_or_else(PoisonError::into_inner) {
            Phase::Pending => FALLBACK.theme,
            Phase::Ready(res) => res.theme,
        }
    }

    /// Whether the visitor may switch themes.
    ///
    /// Reports the fallback (`true`) until the configuration resolves; see
    /// [`set_theme`](ThemeStore::set_theme) for how the window is handled.
    #[must_use]
    pub fn can_toggle(&self) -> bool {
        match *self.phase.lock().unwrap_or_else(PoisonError::into_inner) {
            Phase::Pending => FALLBACK.can_toggle,
            Phase::Ready(res) => res.can_toggle,
        }
    }

    /// Resolve against the remote configuration and apply the result.
    ///
    /// Runs whenever the configuration (re)loads: the persisted override is
    /// re-read and the resolution recomputed.
    pub fn initialize(&self, config: &SiteTheme) {
        let persisted = self
            .storage
            .get(keys::THEME)
            .as_deref()
            .and_then(ActiveTheme::parse);
        let resolution = config.resolve(persisted);

        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = Phase::Ready(resolution);
        self.target.apply(resolution.theme);
        info!(
            theme = resolution.theme.as_str(),
            can_toggle = resolution.can_toggle,
            "Theme resolved"
        );
    }

    /// Switch themes, when permitted.
    ///
    /// An explicit no-op (not an error) while switching is disallowed or the
    /// configuration has not resolved. A permitted switch persists the
    /// override and applies the marker.
    pub fn set_theme(&self, theme: ActiveTheme) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *phase {
            Phase::Pending => {
                debug!(
                    requested = theme.as_str(),
                    "Theme toggle ignored before configuration resolved"
                );
            }
            Phase::Ready(res) if !res.can_toggle => {
                debug!(
                    requested = theme.as_str(),
                    "Theme toggle ignored; switching disabled"
                );
            }
            Phase::Ready(res) => {
                res.theme = theme;
                self.storage.set(keys::THEME, theme.as_str());
                self.target.apply(theme);
                info!(theme = theme.as_str(), "Theme changed");
            }
        }
    }

    /// Convenience for a toggle control: switch to the other theme.
    pub fn toggle(&self) {
        self.set_theme(self.theme().toggled());
    }
}
