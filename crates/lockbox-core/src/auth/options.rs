use std::collections::HashMap;

pub const DEFAULT_MOUNT: &str = "oidc";
pub const DEFAULT_LISTEN_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: &str = "8250";
pub const DEFAULT_CALLBACK_HOST: &str = "localhost";
pub const DEFAULT_CALLBACK_METHOD: &str = "http";

/// Path the provider redirects back to on the local listener.
pub const CALLBACK_PATH: &str = "/oidc/callback";

/// Resolved login settings.
///
/// Ports are kept as strings; validity is enforced where they are consumed,
/// at listener bind and redirect-URI construction time. The callback port may
/// legitimately differ from the listen port (port forwarding, NAT).
#[derive(Debug, Clone)]
pub struct LoginOptions {
    pub role: String,
    pub mount: String,
    pub listen_address: String,
    pub port: String,
    pub callback_method: String,
    pub callback_host: String,
    pub callback_port: String,
}

impl LoginOptions {
    /// Options for `role` with every other setting at its default.
    pub fn new(role: impl Into<String>) -> Self {
        Self::from_map(&HashMap::from([("role".to_owned(), role.into())]))
    }

    /// Resolve a flat key/value mapping against the documented defaults.
    ///
    /// Unrecognized keys are ignored; a missing `role` resolves to the empty
    /// string and is left to the server to reject.
    pub fn from_map(settings: &HashMap<String, String>) -> Self {
        let get = |key: &str, default: &str| {
            settings
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_owned())
        };
        let port = get("port", DEFAULT_PORT);
        let callback_port = get("callbackport", &port);
        Self {
            role: get("role", ""),
            mount: get("mount", DEFAULT_MOUNT),
            listen_address: get("listenaddress", DEFAULT_LISTEN_ADDRESS),
            callback_method: get("callbackmethod", DEFAULT_CALLBACK_METHOD),
            callback_host: get("callbackhost", DEFAULT_CALLBACK_HOST),
            callback_port,
            port,
        }
    }

    /// Redirect URI advertised to the provider.
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}://{}:{}{CALLBACK_PATH}",
            self.callback_method, self.callback_host, self.callback_port
        )
    }

    /// Address the local listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}
