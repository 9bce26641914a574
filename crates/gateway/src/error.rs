use thiserror::Error;

/// Failure to get any response from the server.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {name}")]
    InvalidHeader { name: String },

    #[error("query parameters must be a JSON object, got {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Every failure that is not a server fault. These never raise an alert in
/// the gateway; callers decide how to surface them.
#[derive(Debug, Error)]
pub enum OtherFault {
    /// Non-success status other than 500. `body` is the response text, or
    /// `None` when the body was empty.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Option<String> },

    #[error("request could not be completed: {0}")]
    Transport(#[from] TransportError),

    /// The caller's extractor rejected a successful response. The extractor's
    /// error is kept as-is so callers can downcast it.
    #[error("failed to extract response")]
    Extract(#[source] anyhow::Error),
}

/// Error returned by [`crate::RequestGateway`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with an internal error (status 500).
    #[error("server returned an internal error")]
    ServerFault,

    #[error(transparent)]
    Other(#[from] OtherFault),
}

impl RequestError {
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::ServerFault)
    }

    /// HTTP status behind the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerFault => Some(crate::extract::SERVER_ERROR_STATUS),
            Self::Other(OtherFault::Status { status, .. }) => Some(*status),
            Self::Other(_) => None,
        }
    }

    /// Response body carried by a status failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Other(OtherFault::Status { body, .. }) => body.as_deref(),
            _ => None,
        }
    }
}

impl From<TransportError> for RequestError {
    fn from(e: TransportError) -> Self {
        Self::Other(OtherFault::Transport(e))
    }
}
