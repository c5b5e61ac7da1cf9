//! Error type shared by the remote clients.

use reqwest::StatusCode;

/// Failure of a remote read.
///
/// Callers in the session layer catch these at the call site and resolve to
/// safe defaults (fallback theme, no admin access, empty content); nothing
/// here reaches the visitor as an error.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {context}")]
    Status {
        status: StatusCode,
        context: &'static str,
    },

    #[error("invalid response body from {context}: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    #[error("site settings returned no rows")]
    MissingSettings,

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl RemoteError {
    /// Whether this failure came from the network rather than the payload.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }
}
