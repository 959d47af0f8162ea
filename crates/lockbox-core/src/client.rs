use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

const API_VERSION: &str = "v1";
const USER_AGENT: &str = "lockbox-rs/0.1.0";
const TOKEN_HEADER: &str = "X-Lockbox-Token";

/// Errors returned by the Lockbox HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server address: {0}")]
    InvalidAddress(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode server response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("error response from server (status {}). Errors:\n\n* {}", .status, .errors.join("\n* "))]
    Api {
        status: StatusCode,
        errors: Vec<String>,
    },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Raw secret payload returned by the Lockbox API.
///
/// Endpoint-specific fields live in the dynamic `data` map; consumers pull
/// them out with [`Secret::data_str`] rather than trusting a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub auth: Option<AuthInfo>,
}

impl Secret {
    /// Fetch a string field out of `data`.
    ///
    /// Returns `None` when the field is absent or not a string.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Token grant attached to a secret returned from a login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    pub client_token: String,
    #[serde(default)]
    pub accessor: String,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Minimal client for the logical read/write surface of a Lockbox server.
#[derive(Debug, Clone)]
pub struct LockboxClient {
    http: Client,
    address: Url,
    token: Option<String>,
}

impl LockboxClient {
    /// Build a client for the server at `address` (scheme + host + port).
    pub fn new(address: &str) -> ClientResult<Self> {
        let address = Url::parse(address)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            address,
            token: None,
        })
    }

    /// Attach an authentication token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// POST a logical write to `path` and decode the returned secret, if any.
    pub async fn write(&self, path: &str, body: &Value) -> ClientResult<Option<Secret>> {
        let request = self.http.post(self.endpoint(path)?).json(body);
        self.send(request).await
    }

    /// GET a logical read from `path` with the given query string.
    pub async fn read_with_data(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<Option<Secret>> {
        let request = self.http.get(self.endpoint(path)?).query(query);
        self.send(request).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.address.join(&format!("/{API_VERSION}/{path}"))?)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Option<Secret>> {
        let request = match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The server reports failures as {"errors": [...]}; keep the raw
            // body as a single entry when it is anything else.
            let errors = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.errors)
                .unwrap_or_else(|_| vec![body.trim().to_owned()]);
            return Err(ClientError::Api { status, errors });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}
