//! Session orchestration for Vitrine.
//!
//! This crate wires the preference stores to the remote backend: endpoint
//! configuration, the one-time session bootstrap (explicit dependency
//! injection - stores are constructed here and handed to consumers), and
//! the admin-visibility gate.

mod admin;
mod config;
mod session;

pub use admin::{AdminGate, ProbeHandle, ProbeState};
pub use config::{ConfigError, Endpoints, Remotes};
pub use session::Session;
