//! Typed access to the site's content and configuration tables.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use vitrine_types::content::{AboutPage, ContactCard, GalleryItem, Project, Skill};
use vitrine_types::theme::SiteTheme;

use crate::error::RemoteError;
use crate::retry::{RetryPolicy, send_with_retry};

/// How long a fetched collection stays fresh in the in-process memo.
///
/// Long enough to absorb a burst of re-reads, short enough that content
/// edits show up on the next visit.
const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Upper bound on list reads; the site renders nowhere near this many rows.
const LIST_LIMIT: &str = "100";

struct Slot {
    fetched_at: Instant,
    rows: serde_json::Value,
}

/// REST client for the hosted content tables.
///
/// All reads share one retry policy and a per-table memo. Rows come back as
/// JSON arrays; `single`-row tables are read with `limit=1`.
pub struct SiteApi {
    client: reqwest::Client,
    base: Url,
    policy: RetryPolicy,
    ttl: Duration,
    memo: Mutex<HashMap<&'static str, Slot>>,
}

impl SiteApi {
    /// `base` is the REST root; it must end with a trailing slash for table
    /// paths to join correctly.
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self {
            client,
            base,
            policy: RetryPolicy::default(),
            ttl: DEFAULT_TTL,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Override the memo freshness window. `Duration::ZERO` disables the
    /// memo entirely (every read refetches).
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The validated site-theme configuration.
    ///
    /// The settings table is expected to hold exactly one row; an empty
    /// table is a deployment error surfaced as
    /// [`RemoteError::MissingSettings`].
    pub async fn site_theme(&self) -> Result<SiteTheme, RemoteError> {
        let rows: Vec<SiteTheme> = self.rows("site_settings", &[("limit", "1")]).await?;
        rows.into_iter().next().ok_or(RemoteError::MissingSettings)
    }

    pub async fn about(&self) -> Result<Option<AboutPage>, RemoteError> {
        self.single("about").await
    }

    pub async fn contact(&self) -> Result<Option<ContactCard>, RemoteError> {
        self.single("contact").await
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, RemoteError> {
        self.list("skills").await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, RemoteError> {
        self.list("projects").await
    }

    pub async fn gallery(&self) -> Result<Vec<GalleryItem>, RemoteError> {
        self.list("gallery").await
    }

    async fn single<T: DeserializeOwned>(
        &self,
        table: &'static str,
    ) -> Result<Option<T>, RemoteError> {
        let rows: Vec<T> = self.rows(table, &[("limit", "1")]).await?;
        Ok(rows.into_iter().next())
    }

    async fn list<T: DeserializeOwned>(&self, table: &'static str) -> Result<Vec<T>, RemoteError> {
        self.rows(table, &[("order", "order_index.asc"), ("limit", LIST_LIMIT)])
            .await
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, RemoteError> {
        if let Some(rows) = self.memo_lookup(table) {
            debug!(table, "Serving collection from memo");
            return decode(table, rows);
        }

        let mut url = self.base.join(table)?;
        url.query_pairs_mut().extend_pairs(query);

        let response =
            send_with_retry(table, &self.policy, || self.client.get(url.clone())).await?;
        let rows: serde_json::Value = response.json().await?;
        let decoded = decode(table, rows.clone())?;

        // Memoize only after a successful decode.
        if self.ttl > Duration::ZERO {
            self.memo
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(
                    table,
                    Slot {
                        fetched_at: Instant::now(),
                        rows,
                    },
                );
        }
        Ok(decoded)
    }

    fn memo_lookup(&self, table: &'static str) -> Option<serde_json::Value> {
        let memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = memo.get(table)?;
        if slot.fetched_at.elapsed() < self.ttl {
            Some(slot.rows.clone())
        } else {
            None
        }
    }
}

fn decode<T: DeserializeOwned>(
    table: &'static str,
    rows: serde_json::Value,
) -> Result<Vec<T>, RemoteError> {
    serde_json::from_value(rows).map_err(|e| RemoteError::Decode {
        context: table,
        message: e.to_string(),
    })
}
