//! Admin-visibility gate.
//!
//! Whether the current network identity may see the admin link. Two
//! sequential network steps: resolve the public IP, then look it up in the
//! remote allow-list. Every error path fails closed; a probe always reaches
//! its terminal state exactly once.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use vitrine_remote::{Allowlist, PublicIp};
use vitrine_types::AdminAccess;

/// Observable probe lifecycle: `Pending` until the terminal `Resolved`,
/// which is published exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeState {
    Pending,
    Resolved(AdminAccess),
}

/// The gate itself. Holds the two clients and nothing else: there is no
/// cache and no rate limit, so every check re-resolves the address and
/// re-queries the allow-list.
#[derive(Clone)]
pub struct AdminGate {
    ip: PublicIp,
    allowlist: Allowlist,
}

impl AdminGate {
    #[must_use]
    pub fn new(ip: PublicIp, allowlist: Allowlist) -> Self {
        Self { ip, allowlist }
    }

    /// Run the probe to its terminal state.
    ///
    /// Fail-closed on every path: an IP-resolution failure denies with no
    /// address; an allow-list failure or a zero-row result denies with the
    /// resolved address. Neither step retries. Dropping the returned future
    /// cancels whichever call is in flight.
    pub async fn check(&self) -> AdminAccess {
        let ip = match self.ip.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Public IP resolution failed; admin link hidden: {e}");
                return AdminAccess::denied();
            }
        };

        match self.allowlist.contains(&ip).await {
            Ok(true) => {
                info!(ip, "Admin access granted");
                AdminAccess::granted(ip)
            }
            Ok(false) => AdminAccess::denied_for(ip),
            Err(e) => {
                warn!(ip, "Allow-list lookup failed; admin link hidden: {e}");
                AdminAccess::denied_for(ip)
            }
        }
    }

    /// Spawn the probe on the runtime.
    ///
    /// The returned handle observes `Pending -> Resolved` through a watch
    /// channel and aborts the in-flight task when dropped, so a consumer
    /// torn down mid-probe can never be updated late.
    #[must_use]
    pub fn spawn_check(&self) -> ProbeHandle {
        let (tx, rx) = watch::channel(ProbeState::Pending);
        let gate = self.clone();
        let task = tokio::spawn(async move {
            let access = gate.check().await;
            let _ = tx.send(ProbeState::Resolved(access));
        });
        ProbeHandle { state: rx, task }
    }
}

/// Handle to an in-flight probe.
pub struct ProbeHandle {
    state: watch::Receiver<ProbeState>,
    task: JoinHandle<()>,
}

impl ProbeHandle {
    /// The probe state as of now.
    #[must_use]
    pub fn state(&self) -> ProbeState {
        self.state.borrow().clone()
    }

    /// Wait for the terminal state.
    ///
    /// If the probe task was aborted before resolving, this returns the
    /// fail-closed outcome.
    pub async fn resolved(&mut self) -> AdminAccess {
        loop {
            if let ProbeState::Resolved(access) = &*self.state.borrow_and_update() {
                return access.clone();
            }
            if self.state.changed().await.is_err() {
                return AdminAccess::denied();
            }
        }
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
