//! Site theme configuration and resolution.
//!
//! The hosted backend decides whether the site is forced light, forced dark,
//! or user-switchable. Raw deserialization structs (with `Option` fields)
//! stay private in this module; the remote fetch resolves them into
//! [`SiteTheme`] at the parse boundary, so downstream code never sees a
//! half-validated configuration.

use serde::{Deserialize, Serialize};

/// The theme currently applied to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTheme {
    #[default]
    Light,
    Dark,
}

impl ActiveTheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActiveTheme::Light => "light",
            ActiveTheme::Dark => "dark",
        }
    }

    /// Parse a persisted theme value. `None` for anything unrecognized;
    /// callers fall back to the configured default.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ActiveTheme::Light),
            "dark" => Some(ActiveTheme::Dark),
            _ => None,
        }
    }

    /// The other theme. Toggling is defined even when not permitted; the
    /// store decides whether to act on it.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            ActiveTheme::Light => ActiveTheme::Dark,
            ActiveTheme::Dark => ActiveTheme::Light,
        }
    }
}

impl std::fmt::Display for ActiveTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the site owner constrains the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Forced light; visitor overrides are ignored.
    Light,
    /// Forced dark; visitor overrides are ignored.
    Dark,
    /// Both themes exist; switching is governed by `allow_theme_switch`.
    Both,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Both => "both",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "both" => Some(ThemeMode::Both),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawSiteTheme {
    theme_mode: String,
    #[serde(default)]
    allow_theme_switch: bool,
    default_theme: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SiteThemeError {
    #[error("unknown theme_mode {0:?}")]
    UnknownMode(String),
    #[error("unknown default_theme {0:?}")]
    UnknownDefault(String),
}

/// Validated site theme configuration.
///
/// Invariant: toggling is permitted only when `mode == Both` and
/// `allow_switch` is set; [`SiteTheme::resolve`] is the single place that
/// invariant is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSiteTheme")]
pub struct SiteTheme {
    mode: ThemeMode,
    allow_switch: bool,
    default_theme: ActiveTheme,
}

impl TryFrom<RawSiteTheme> for SiteTheme {
    type Error = SiteThemeError;

    fn try_from(raw: RawSiteTheme) -> Result<Self, Self::Error> {
        let mode = ThemeMode::parse(&raw.theme_mode)
            .ok_or_else(|| SiteThemeError::UnknownMode(raw.theme_mode.clone()))?;
        let default_theme = match raw.default_theme {
            None => ActiveTheme::Light,
            Some(ref s) => {
                ActiveTheme::parse(s).ok_or_else(|| SiteThemeError::UnknownDefault(s.clone()))?
            }
        };
        Ok(Self {
            mode,
            allow_switch: raw.allow_theme_switch,
            default_theme,
        })
    }
}

/// Outcome of resolving a [`SiteTheme`] against a persisted override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeResolution {
    pub theme: ActiveTheme,
    pub can_toggle: bool,
}

impl SiteTheme {
    #[must_use]
    pub const fn new(mode: ThemeMode, allow_switch: bool, default_theme: ActiveTheme) -> Self {
        Self {
            mode,
            allow_switch,
            default_theme,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    #[must_use]
    pub const fn allow_switch(&self) -> bool {
        self.allow_switch
    }

    #[must_use]
    pub const fn default_theme(&self) -> ActiveTheme {
        self.default_theme
    }

    /// Resolve the active theme against an optional persisted override.
    ///
    /// A forced mode pins the theme and forbids toggling. In `Both` mode the
    /// override only counts when switching is actually allowed; otherwise
    /// the configured default wins and the override is ignored.
    #[must_use]
    pub fn resolve(&self, persisted: Option<ActiveTheme>) -> ThemeResolution {
        match self.mode {
            ThemeMode::Light => ThemeResolution {
                theme: ActiveTheme::Light,
                can_toggle: false,
            },
            ThemeMode::Dark => ThemeResolution {
                theme: ActiveTheme::Dark,
                can_toggle: false,
            },
            ThemeMode::Both => {
                if self.allow_switch {
                    ThemeResolution {
                        theme: persisted.unwrap_or(self.default_theme),
                        can_toggle: true,
                    }
                } else {
                    ThemeResolution {
                        theme: self.default_theme,
                        can_toggle: false,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_light_pins_theme_and_forbids_toggle() {
        // allow_theme_switch and any persisted override are irrelevant here
        let config = SiteTheme::new(ThemeMode::Light, true, ActiveTheme::Dark);
        let resolved = config.resolve(Some(ActiveTheme::Dark));
        assert_eq!(resolved.theme, ActiveTheme::Light);
        assert!(!resolved.can_toggle);
    }

    #[test]
    fn forced_dark_pins_theme_and_forbids_toggle() {
        let config = SiteTheme::new(ThemeMode::Dark, true, ActiveTheme::Light);
        let resolved = config.resolve(Some(ActiveTheme::Light));
        assert_eq!(resolved.theme, ActiveTheme::Dark);
        assert!(!resolved.can_toggle);
    }

    #[test]
    fn both_with_switch_prefers_persisted_override() {
        let config = SiteTheme::new(ThemeMode::Both, true, ActiveTheme::Light);
        let resolved = config.resolve(Some(ActiveTheme::Dark));
        assert_eq!(resolved.theme, ActiveTheme::Dark);
        assert!(resolved.can_toggle);
    }

    #[test]
    fn both_with_switch_falls_back_to_default_without_override() {
        let config = SiteTheme::new(ThemeMode::Both, true, ActiveTheme::Dark);
        let resolved = config.resolve(None);
        assert_eq!(resolved.theme, ActiveTheme::Dark);
        assert!(resolved.can_toggle);
    }

    #[test]
    fn both_without_switch_ignores_override() {
        let config = SiteTheme::new(ThemeMode::Both, false, ActiveTheme::Light);
        let resolved = config.resolve(Some(ActiveTheme::Dark));
        assert_eq!(resolved.theme, ActiveTheme::Light);
        assert!(!resolved.can_toggle);
    }

    #[test]
    fn raw_config_validates_at_parse_boundary() {
        let config: SiteTheme = serde_json::from_str(
            r#"{"theme_mode": "both", "allow_theme_switch": true, "default_theme": "dark"}"#,
        )
        .expect("valid config");
        assert_eq!(config.mode(), ThemeMode::Both);
        assert!(config.allow_switch());
        assert_eq!(config.default_theme(), ActiveTheme::Dark);
    }

    #[test]
    fn raw_config_rejects_unknown_mode() {
        let result: Result<SiteTheme, _> =
            serde_json::from_str(r#"{"theme_mode": "sepia", "default_theme": "light"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn raw_config_defaults_missing_fields() {
        let config: SiteTheme = serde_json::from_str(r#"{"theme_mode": "both"}"#).expect("valid");
        assert!(!config.allow_switch());
        assert_eq!(config.default_theme(), ActiveTheme::Light);
    }

    #[test]
    fn toggled_flips_both_ways() {
        assert_eq!(ActiveTheme::Light.toggled(), ActiveTheme::Dark);
        assert_eq!(ActiveTheme::Dark.toggled(), ActiveTheme::Light);
    }
}
