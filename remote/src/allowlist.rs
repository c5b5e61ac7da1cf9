//! Admin allow-list membership lookup.

use tracing::debug;
use url::Url;

use crate::error::RemoteError;

/// Equality lookup against the remote allow-list table.
///
/// The query is `ip=eq.{addr}` with `limit=1`: the table is keyed by
/// address, so at most one row can match and the row's columns are never
/// read. Single attempt - the admin-visibility probe fails closed instead
/// of retrying.
#[derive(Debug, Clone)]
pub struct Allowlist {
    client: reqwest::Client,
    base: Url,
}

const TABLE: &str = "admin_allowlist";

impl Allowlist {
    /// `base` is the REST root; it must end with a trailing slash for table
    /// paths to join correctly.
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Whether `ip` is present in the allow-list.
    ///
    /// Zero matching rows is a normal `false`, not an error.
    pub async fn contains(&self, ip: &str) -> Result<bool, RemoteError> {
        let mut url = self.base.join(TABLE)?;
        url.query_pairs_mut()
            .append_pair("ip", &format!("eq.{ip}"))
            .append_pair("limit", "1");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                context: "allowlist",
            });
        }

        let rows: Vec<serde_json::Value> = response.json().await?;
        debug!(ip, matches = rows.len(), "Allow-list lookup");
        Ok(!rows.is_empty())
    }
}
