//! Core domain types for Vitrine.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the preference stores, the remote clients, and the binary.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

pub mod content;
pub mod theme;

use serde::{Deserialize, Serialize};

// ============================================================================
// Persisted Preference Keys
// ============================================================================

/// Persisted preference keys.
///
/// Each store owns exactly one key; no two stores share one, so writes never
/// need coordination. The spellings are load-bearing: they match the values
/// already persisted on returning visitors' machines.
pub mod keys {
    pub const COOKIE_CONSENT: &str = "cookieConsent";
    pub const LANGUAGE: &str = "language";
    pub const THEME: &str = "theme";
}

// ============================================================================
// Language
// ============================================================================

/// Display language for site content.
///
/// French is the default for first-time visitors and whenever the persisted
/// value cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Parse a language code. Returns `None` for anything outside the closed
    /// set; callers fall back to [`Language::default`] rather than erroring.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// All supported languages, in display order.
    #[must_use]
    pub const fn all() -> &'static [Language] {
        &[Language::Fr, Language::En]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cookie Consent
// ============================================================================

/// The visitor's cookie-usage decision.
///
/// Starts `Undecided`; transitions to `Accepted` or `Rejected` on explicit
/// user action and never expires on its own. Clearing the persisted value is
/// the only way back to `Undecided`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentState {
    #[default]
    Undecided,
    Accepted,
    Rejected,
}

impl ConsentState {
    /// Whether the visitor has made a decision either way.
    #[must_use]
    pub const fn decided(self) -> bool {
        !matches!(self, ConsentState::Undecided)
    }

    /// Decode the persisted representation.
    ///
    /// The stored codec is `"true"` / `"false"`; an absent or unrecognized
    /// value reads as `Undecided` (never an error).
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("true") => ConsentState::Accepted,
            Some("false") => ConsentState::Rejected,
            _ => ConsentState::Undecided,
        }
    }

    /// Encode for persistence. `Undecided` is represented by key absence.
    #[must_use]
    pub const fn stored_value(self) -> Option<&'static str> {
        match self {
            ConsentState::Undecided => None,
            ConsentState::Accepted => Some("true"),
            ConsentState::Rejected => Some("false"),
        }
    }
}

// ============================================================================
// Admin Visibility
// ============================================================================

/// Terminal payload of the admin-visibility probe.
///
/// `ip` is the resolved public address when resolution succeeded, regardless
/// of whether the allow-list granted access. On any failure the probe is
/// denied - there is no error variant by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccess {
    pub allowed: bool,
    pub ip: Option<String>,
}

impl AdminAccess {
    /// The fail-closed outcome: no access, no resolved address.
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            allowed: false,
            ip: None,
        }
    }

    /// Access denied, but the public address was resolved.
    #[must_use]
    pub const fn denied_for(ip: String) -> Self {
        Self {
            allowed: false,
            ip: Some(ip),
        }
    }

    /// Access granted for the resolved address.
    #[must_use]
    pub const fn granted(ip: String) -> Self {
        Self {
            allowed: true,
            ip: Some(ip),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_default_is_french() {
        assert_eq!(Language::default(), Language::Fr);
    }

    #[test]
    fn language_parse_accepts_known_codes() {
        assert_eq!(Language::parse("fr"), Some(Language::Fr));
        assert_eq!(Language::parse("en"), Some(Language::En));
        assert_eq!(Language::parse(" EN "), Some(Language::En));
    }

    #[test]
    fn language_parse_rejects_unknown_codes() {
        assert_eq!(Language::parse("de"), None);
        assert_eq!(Language::parse(""), None);
        assert_eq!(Language::parse("french"), None);
    }

    #[test]
    fn consent_codec_round_trips_decisions() {
        assert_eq!(ConsentState::Accepted.stored_value(), Some("true"));
        assert_eq!(ConsentState::Rejected.stored_value(), Some("false"));
        assert_eq!(ConsentState::Undecided.stored_value(), None);

        assert_eq!(
            ConsentState::from_stored(Some("true")),
            ConsentState::Accepted
        );
        assert_eq!(
            ConsentState::from_stored(Some("false")),
            ConsentState::Rejected
        );
    }

    #[test]
    fn consent_unrecognized_stored_value_reads_as_undecided() {
        assert_eq!(ConsentState::from_stored(None), ConsentState::Undecided);
        assert_eq!(
            ConsentState::from_stored(Some("yes")),
            ConsentState::Undecided
        );
        assert_eq!(ConsentState::from_stored(Some("")), ConsentState::Undecided);
    }

    #[test]
    fn admin_access_constructors() {
        assert_eq!(
            AdminAccess::denied(),
            AdminAccess {
                allowed: false,
                ip: None
            }
        );
        let denied = AdminAccess::denied_for("203.0.113.5".to_string());
        assert!(!denied.allowed);
        assert_eq!(denied.ip.as_deref(), Some("203.0.113.5"));

        let granted = AdminAccess::granted("203.0.113.5".to_string());
        assert!(granted.allowed);
        assert_eq!(granted.ip.as_deref(), Some("203.0.113.5"));
    }
}
