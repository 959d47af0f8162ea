use serde_json::json;

use super::{AuthError, LoginOptions};
use crate::client::LockboxClient;

/// Request a provider authorization URL for the configured role.
///
/// A transport or server error propagates as-is. A successful call that
/// carries no usable `auth_url` means the role is misconfigured server-side
/// and is reported as such, naming the role.
pub async fn fetch_auth_url(
    client: &LockboxClient,
    options: &LoginOptions,
) -> Result<String, AuthError> {
    let body = json!({
        "role": options.role,
        "redirect_uri": options.redirect_uri(),
    });
    let secret = client
        .write(&format!("auth/{}/oidc/auth_url", options.mount), &body)
        .await?;

    let auth_url = secret
        .as_ref()
        .and_then(|secret| secret.data_str("auth_url"))
        .unwrap_or_default();
    if auth_url.is_empty() {
        return Err(AuthError::MissingAuthUrl {
            role: options.role.clone(),
        });
    }
    Ok(auth_url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn options() -> LoginOptions {
        LoginOptions::new("engineering")
    }

    #[tokio::test]
    async fn returns_auth_url_and_sends_redirect_uri() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/auth/oidc/oidc/auth_url")
                .json_body_obj(&serde_json::json!({
                    "role": "engineering",
                    "redirect_uri": "http://localhost:8250/oidc/callback"
                }));
            then.status(200).json_body_obj(&serde_json::json!({
                "data": {"auth_url": "https://provider.example/authorize?client_id=abc"}
            }));
        });

        let client = LockboxClient::new(&server.base_url()).unwrap();
        let auth_url = fetch_auth_url(&client, &options()).await.unwrap();
        mock.assert();
        assert_eq!(auth_url, "https://provider.example/authorize?client_id=abc");
    }

    #[tokio::test]
    async fn missing_auth_url_names_the_role() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/auth/oidc/oidc/auth_url");
            then.status(200)
                .json_body_obj(&serde_json::json!({"data": {}}));
        });

        let client = LockboxClient::new(&server.base_url()).unwrap();
        let err = fetch_auth_url(&client, &options()).await.unwrap_err();
        assert!(matches!(&err, AuthError::MissingAuthUrl { role } if role == "engineering"));
        assert!(err.to_string().contains("engineering"));
    }

    #[tokio::test]
    async fn non_string_auth_url_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/auth/oidc/oidc/auth_url");
            then.status(200)
                .json_body_obj(&serde_json::json!({"data": {"auth_url": 42}}));
        });

        let client = LockboxClient::new(&server.base_url()).unwrap();
        let err = fetch_auth_url(&client, &options()).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthUrl { .. }));
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/auth/oidc/oidc/auth_url");
            then.status(400)
                .json_body_obj(&serde_json::json!({"errors": ["role not found"]}));
        });

        let client = LockboxClient::new(&server.base_url()).unwrap();
        let err = fetch_auth_url(&client, &options()).await.unwrap_err();
        assert!(matches!(&err, AuthError::Client(_)));
        assert!(err.to_string().contains("role not found"));
    }
}
