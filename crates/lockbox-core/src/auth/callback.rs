use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::Url;

use super::{classify, html, AuthError, CALLBACK_PATH};
use crate::client::{LockboxClient, Secret};

pub(crate) type LoginOutcome = Result<Secret, AuthError>;

/// Accept connections until the listener is torn down by the orchestrator.
///
/// Every connection is handled on its own task, so an exchange that is still
/// in flight when the flow is interrupted runs to completion on its own and
/// its late outcome is discarded.
pub(crate) async fn serve_callbacks(
    listener: TcpListener,
    client: LockboxClient,
    mount: String,
    outcome_tx: mpsc::Sender<LoginOutcome>,
) {
    loop {
        let (stream, _addr) = match listener.accept().await {
            Ok(connection) => connection,
            Err(err) => {
                // Not our own teardown (that aborts this task outright), so
                // the flow cannot complete; report and stop serving.
                let _ = outcome_tx.try_send(Err(AuthError::Io(err)));
                return;
            }
        };
        let client = client.clone();
        let mount = mount.clone();
        let outcome_tx = outcome_tx.clone();
        tokio::spawn(async move {
            handle_connection(stream, client, mount, outcome_tx).await;
        });
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    client: LockboxClient,
    mount: String,
    outcome_tx: mpsc::Sender<LoginOutcome>,
) {
    let query = match read_callback_query(&mut stream).await {
        Ok(Some(query)) => query,
        // Unrelated request (favicon fetch, stale tab); answer it without
        // resolving the flow.
        Ok(None) => {
            let _ = respond(&mut stream, 404, "").await;
            return;
        }
        Err(_) => {
            let _ = respond(&mut stream, 400, &html::error_html("", "")).await;
            return;
        }
    };

    let outcome = exchange(&client, &mount, &query).await;

    // The page must reach the browser before the outcome is delivered; the
    // orchestrator may return to its caller the instant the send lands.
    let (status, page) = match &outcome {
        Ok(_) => (200, html::SUCCESS_HTML.to_owned()),
        Err(err) => {
            let parsed = classify::classify(&err.to_string());
            (400, html::error_html(&parsed.summary, &parsed.detail))
        }
    };
    let _ = respond(&mut stream, status, &page).await;
    let _ = stream.shutdown().await;

    // The capacity-1 channel is read at most once; a duplicate or
    // post-interruption delivery is dropped here instead of blocking.
    let _ = outcome_tx.try_send(outcome);
}

async fn exchange(client: &LockboxClient, mount: &str, query: &CallbackQuery) -> LoginOutcome {
    let secret = client
        .read_with_data(
            &format!("auth/{mount}/oidc/callback"),
            &[("code", query.code.as_str()), ("state", query.state.as_str())],
        )
        .await?;
    secret.ok_or(AuthError::EmptyCredential)
}

/// Query parameters of the provider redirect, passed through verbatim.
#[derive(Debug, Default)]
struct CallbackQuery {
    code: String,
    state: String,
}

async fn read_callback_query(stream: &mut TcpStream) -> Result<Option<CallbackQuery>, AuthError> {
    let mut buffer = [0u8; 4096];
    let n = stream.read(&mut buffer).await?;
    let request = String::from_utf8_lossy(&buffer[..n]);
    let target = parse_request_target(&request)?;
    let url = Url::parse(&format!("http://localhost{target}"))
        .map_err(|err| AuthError::InvalidCallback(err.to_string()))?;

    if url.path() != CALLBACK_PATH {
        return Ok(None);
    }

    let mut query = CallbackQuery::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => query.code = value.into_owned(),
            "state" => query.state = value.into_owned(),
            _ => {}
        }
    }
    Ok(Some(query))
}

fn parse_request_target(request: &str) -> Result<&str, AuthError> {
    let first_line = request
        .lines()
        .next()
        .ok_or_else(|| AuthError::InvalidCallback("missing request line".into()))?;
    let mut parts = first_line.split_whitespace();
    let _method = parts
        .next()
        .ok_or_else(|| AuthError::InvalidCallback("missing method".into()))?;
    parts
        .next()
        .ok_or_else(|| AuthError::InvalidCallback("missing request target".into()))
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) -> Result<(), AuthError> {
    let status_line = match status {
        200 => "HTTP/1.1 200 OK",
        400 => "HTTP/1.1 400 Bad Request",
        404 => "HTTP/1.1 404 Not Found",
        _ => "HTTP/1.1 500 Internal Server Error",
    };
    let response = format!(
        "{status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_target_extracted_from_request_line() {
        let target = parse_request_target(
            "GET /oidc/callback?code=abc&state=xyz HTTP/1.1\r\nHost: localhost\r\n\r\n",
        )
        .unwrap();
        assert_eq!(target, "/oidc/callback?code=abc&state=xyz");
    }

    #[test]
    fn empty_request_is_invalid() {
        let err = parse_request_target("").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCallback(_)));
    }

    #[test]
    fn request_line_without_target_is_invalid() {
        let err = parse_request_target("GET").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCallback(_)));
    }
}
