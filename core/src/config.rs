//! Endpoint configuration.
//!
//! Where the hosted backend lives. Every field has a default, so an absent
//! config file is a valid configuration; only an unreadable or malformed
//! file is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;
use url::Url;

use vitrine_remote::{Allowlist, PublicIp, RemoteError, SiteApi};

fn default_api_base() -> String {
    "https://content.vitrine.app/rest/".to_string()
}

fn default_ip_endpoint() -> String {
    "https://api.ipify.org/?format=json".to_string()
}

/// Remote endpoints, loadable from `~/.vitrine/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    /// REST root of the hosted content backend. Must end with a slash so
    /// table paths join under it.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Public-IP lookup service returning `{"ip": "..."}`.
    #[serde(default = "default_ip_endpoint")]
    pub ip_endpoint: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            ip_endpoint: default_ip_endpoint(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl Endpoints {
    /// The canonical config file location, when a home directory exists.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vitrine").join("config.toml"))
    }

    /// Load from the canonical location; defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. An absent file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The connected remote clients, sharing one HTTP client.
pub struct Remotes {
    pub api: SiteApi,
    pub ip: PublicIp,
    pub allowlist: Allowlist,
}

impl Remotes {
    /// Build the clients from the configured endpoints.
    pub fn connect(endpoints: &Endpoints) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let api_base = Url::parse(&endpoints.api_base)?;
        let ip_endpoint = Url::parse(&endpoints.ip_endpoint)?;

        Ok(Self {
            api: SiteApi::new(client.clone(), api_base.clone()),
            ip: PublicIp::new(client.clone(), ip_endpoint),
            allowlist: Allowlist::new(client, api_base),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let endpoints = Endpoints::load_from(&dir.path().join("config.toml")).expect("defaults");
        assert_eq!(endpoints.api_base, default_api_base());
        assert_eq!(endpoints.ip_endpoint, default_ip_endpoint());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = \"http://localhost:9090/rest/\"\n").expect("write");

        let endpoints = Endpoints::load_from(&path).expect("loads");
        assert_eq!(endpoints.api_base, "http://localhost:9090/rest/");
        assert_eq!(endpoints.ip_endpoint, default_ip_endpoint());
    }

    #[test]
    fn malformed_file_is_a_parse_error_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = [").expect("write");

        let err = Endpoints::load_from(&path).expect_err("malformed");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn connect_rejects_invalid_urls() {
        let endpoints = Endpoints {
            api_base: "not a url".to_string(),
            ..Endpoints::default()
        };
        assert!(Remotes::connect(&endpoints).is_err());
    }
}
