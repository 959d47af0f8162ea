use std::future::Future;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::authorize::fetch_auth_url;
use super::callback::serve_callbacks;
use super::{browser, AuthError, LoginOptions};
use crate::client::{LockboxClient, Secret};

/// Run the browser-based OIDC login flow to completion.
///
/// Fetches the authorization URL, binds the local callback listener, hands
/// the URL to `notify` (and the browser, unless `open_browser` is false), and
/// then races the provider callback against Ctrl-C. Exactly one outcome is
/// returned, and the listener is released on every exit path.
pub async fn login<F>(
    client: &LockboxClient,
    options: &LoginOptions,
    open_browser: bool,
    notify: F,
) -> Result<Secret, AuthError>
where
    F: Fn(&str) -> Result<(), AuthError>,
{
    login_with_interrupt(client, options, open_browser, notify, tokio::signal::ctrl_c()).await
}

/// [`login`] with the interrupt source injected, for deterministic tests.
pub(crate) async fn login_with_interrupt<F, I>(
    client: &LockboxClient,
    options: &LoginOptions,
    open_browser: bool,
    notify: F,
    interrupt: I,
) -> Result<Secret, AuthError>
where
    F: Fn(&str) -> Result<(), AuthError>,
    I: Future<Output = std::io::Result<()>>,
{
    let auth_url = fetch_auth_url(client, options).await?;

    // A port already in use (or an unparseable port string) is terminal.
    let listener = TcpListener::bind(options.listen_addr()).await?;

    notify(&auth_url)?;
    if open_browser {
        if let Err(err) = browser::open_url(&auth_url) {
            tracing::warn!(%err, "could not launch a browser; open the authorization URL manually");
        }
    }

    let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
    let server = tokio::spawn(serve_callbacks(
        listener,
        client.clone(),
        options.mount.clone(),
        outcome_tx,
    ));

    tokio::pin!(interrupt);
    let outcome = tokio::select! {
        outcome = outcome_rx.recv() => outcome.unwrap_or(Err(AuthError::ListenerClosed)),
        result = &mut interrupt => match result {
            Ok(()) => Err(AuthError::Interrupted),
            Err(err) => Err(AuthError::Io(err)),
        },
    };

    // Tear the listener down before returning so the port is immediately
    // reusable. A connection task mid-exchange keeps running; its late send
    // lands in the unread channel slot or is discarded.
    server.abort();
    let _ = server.await;

    outcome
}
