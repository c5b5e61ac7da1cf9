//! Remote clients for the hosted site backend.
//!
//! Everything the site reads over the network goes through this crate: the
//! site-theme configuration, the content collections (about, contact,
//! skills, projects, gallery), the public-IP lookup, and the admin
//! allow-list. Content and configuration reads share one retry policy and a
//! brief in-process memo; the admin-visibility probe's two calls are
//! single-attempt by design and bypass both.
//!
//! The hosted backend speaks a PostgREST-style dialect: collections are
//! `GET {base}/{table}` with `order`, `limit`, and `column=eq.value`
//! filters, returning JSON arrays.

mod allowlist;
mod error;
mod ip;
mod retry;
mod site;

pub use allowlist::Allowlist;
pub use error::RemoteError;
pub use ip::PublicIp;
pub use retry::{RetryPolicy, send_with_retry};
pub use site::SiteApi;
