//! HTTP transport behind the gateway.

use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::{
        Client,
        header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
    },
    secrecy::ExposeSecret,
    tracing::trace,
    url::Url,
};

use {
    crate::{
        error::TransportError,
        request::{RawResponse, RequestSpec},
    },
    forum_config::HttpConfig,
};

/// Sends a request and returns the raw response, whatever its status.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, spec: &RequestSpec) -> Result<RawResponse, TransportError>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    base_url: Option<Url>,
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    /// Build a client with the timeout, user agent, token and headers from
    /// `config`.
    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        if let Some(token) = &config.api_token {
            let mut value = header_value(
                AUTHORIZATION.as_str(),
                &format!("Token {}", token.expose_secret()),
            )?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let mut client = Self {
            client: builder.build()?,
            base_url: None,
        };
        if let Some(base) = &config.base_url {
            client = client.with_base_url(base)?;
        }
        Ok(client)
    }

    /// Resolve relative request URLs against `base`. A trailing slash is
    /// implied, so `https://forum.test/api` + `discussions` is
    /// `https://forum.test/api/discussions`.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, TransportError> {
        let mut url = Url::parse(base).map_err(|e| TransportError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Turn a request URL into an absolute one.
    pub fn resolve_url(&self, raw: &str) -> Result<Url, TransportError> {
        let invalid = |e: url::ParseError| TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        };
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(raw.trim_start_matches('/')).map_err(invalid),
                None => Err(invalid(url::ParseError::RelativeUrlWithoutBase)),
            },
            Err(e) => Err(invalid(e)),
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, spec: &RequestSpec) -> Result<RawResponse, TransportError> {
        let url = self.resolve_url(&spec.url)?;
        trace!(method = %spec.method, %url, "client -> server");

        let mut builder = self.client.request(spec.method.clone(), url);
        for (name, value) in &spec.headers {
            builder = builder.header(header_name(name)?, header_value(name, value)?);
        }
        if let Some(params) = &spec.params {
            builder = if spec.params_in_query() {
                builder.query(&query_pairs(params)?)
            } else {
                builder.json(params)
            };
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let response_text = response.text().await?;
        trace!(status, len = response_text.len(), "server -> client");

        Ok(RawResponse {
            status,
            response_text,
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| TransportError::InvalidHeader {
        name: name.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader {
        name: name.to_string(),
    })
}

/// Flatten a JSON object into query pairs using bracket keys: nested objects
/// become `key[sub]` and array items `key[]`. `null` members are dropped and
/// non-string scalars use their JSON text.
fn query_pairs(params: &serde_json::Value) -> Result<Vec<(String, String)>, TransportError> {
    let object = params
        .as_object()
        .ok_or_else(|| TransportError::InvalidParams(params.to_string()))?;
    let mut pairs = Vec::new();
    for (key, value) in object {
        push_query_pair(&mut pairs, key.clone(), value);
    }
    Ok(pairs)
}

fn push_query_pair(pairs: &mut Vec<(String, String)>, key: String, value: &serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Null => {},
        Value::Object(members) => {
            for (sub, v) in members {
                push_query_pair(pairs, format!("{key}[{sub}]"), v);
            }
        },
        Value::Array(items) => {
            for v in items {
                push_query_pair(pairs, format!("{key}[]"), v);
            }
        },
        Value::String(s) => pairs.push((key, s.clone())),
        other => pairs.push((key, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn resolves_relative_urls_against_base() {
        let client = ReqwestClient::new()
            .with_base_url("https://forum.test/api")
            .unwrap();
        assert_eq!(client.base_url().unwrap().as_str(), "https://forum.test/api/");
        assert_eq!(
            client.resolve_url("discussions").unwrap().as_str(),
            "https://forum.test/api/discussions"
        );
        assert_eq!(
            client.resolve_url("/discussions/1").unwrap().as_str(),
            "https://forum.test/api/discussions/1"
        );
        assert_eq!(
            client.resolve_url("https://other.test/x").unwrap().as_str(),
            "https://other.test/x"
        );
    }

    #[test]
    fn relative_url_without_base_is_rejected() {
        let err = ReqwestClient::new().resolve_url("discussions").unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[test]
    fn query_pairs_flatten_scalars() {
        let mut pairs = query_pairs(&json!({
            "filter[q]": "rust",
            "page[limit]": 20,
            "include": null,
            "sticky": true,
        }))
        .unwrap();
        pairs.sort();
        assert_eq!(pairs, vec![
            ("filter[q]".to_string(), "rust".to_string()),
            ("page[limit]".to_string(), "20".to_string()),
            ("sticky".to_string(), "true".to_string()),
        ]);
    }

    #[test]
    fn query_pairs_use_bracket_keys_for_nesting() {
        let mut pairs = query_pairs(&json!({
            "filter": {"q": "rust", "tag": null},
            "page": {"offset": 20},
            "include": ["user", "tags"],
        }))
        .unwrap();
        pairs.sort();
        assert_eq!(pairs, vec![
            ("filter[q]".to_string(), "rust".to_string()),
            ("include[]".to_string(), "tags".to_string()),
            ("include[]".to_string(), "user".to_string()),
            ("page[offset]".to_string(), "20".to_string()),
        ]);
    }

    #[test]
    fn query_params_must_be_an_object() {
        assert!(matches!(
            query_pairs(&json!([1, 2])),
            Err(TransportError::InvalidParams(_))
        ));
    }

    #[test]
    fn from_config_rejects_bad_header() {
        let mut config = HttpConfig::default();
        config.headers.insert("bad header".into(), "x".into());
        let err = ReqwestClient::from_config(&config).unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeader { name } if name == "bad header"));
    }
}
