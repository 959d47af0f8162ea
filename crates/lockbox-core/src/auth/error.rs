use thiserror::Error;

use crate::client::ClientError;

/// Errors surfaced by the browser-based login flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to authorize role {role:?}; check the server logs for more information")]
    MissingAuthUrl { role: String },
    #[error("interrupted")]
    Interrupted,
    #[error("callback listener terminated before receiving the redirect")]
    ListenerClosed,
    #[error("invalid callback request: {0}")]
    InvalidCallback(String),
    #[error("callback exchange returned no credential")]
    EmptyCredential,
    #[error("failed to launch system browser: {0}")]
    BrowserLaunch(String),
}
