//! Config schema types (HTTP client, alerts).
use std::collections::HashMap;

use {
    secrecy::Secret,
    serde::{Deserialize, Serialize, Serializer},
};

/// Message shown when the server answers with an internal error.
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str =
    "Oops! Something went wrong on the server. Please try again.";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    pub http: HttpConfig,
    pub alerts: AlertsConfig,
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL that relative request URLs are resolved against,
    /// e.g. `https://forum.example.com/api/`.
    pub base_url: Option<String>,

    /// Transport timeout in seconds. `0` disables the timeout.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// API token, sent as `Authorization: Token <token>`.
    #[serde(serialize_with = "serialize_redacted")]
    pub api_token: Option<Secret<String>>,

    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            user_agent: concat!("forum/", env!("CARGO_PKG_VERSION")).into(),
            api_token: None,
            headers: HashMap::new(),
        }
    }
}

/// Alert presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Text of the warning shown when a request hits a server fault.
    pub server_error_message: String,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            server_error_message: DEFAULT_SERVER_ERROR_MESSAGE.into(),
        }
    }
}

fn serialize_redacted<S: Serializer>(
    value: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_some("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg: ForumConfig =
            toml::from_str("[http]\nbase_url = \"https://forum.test/api\"\n").unwrap();
        assert_eq!(cfg.http.base_url.as_deref(), Some("https://forum.test/api"));
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.alerts.server_error_message, DEFAULT_SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn api_token_is_redacted_when_serialized() {
        let cfg: ForumConfig =
            serde_json::from_str(r#"{"http": {"api_token": "hunter2"}}"#).unwrap();
        assert_eq!(
            cfg.http.api_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("hunter2")
        );

        let out = serde_json::to_string(&cfg).unwrap();
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("hunter2"));
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
