use std::sync::Arc;

use {
    forum_alerts::{Alert, AlertHandle, AlertQueue},
    forum_config::{DEFAULT_SERVER_ERROR_MESSAGE, ForumConfig},
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
};

use crate::{
    error::{RequestError, TransportError},
    extract::{compose, default_extract},
    http::{HttpClient, ReqwestClient},
    request::RequestSpec,
    slot::PendingAlertSlot,
};

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    /// Status 500; an alert is shown.
    ServerFault,
    /// Any other failure; no alert is shown.
    OtherFault,
}

impl RequestOutcome {
    fn of<T>(result: &Result<T, RequestError>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(RequestError::ServerFault) => Self::ServerFault,
            Err(RequestError::Other(_)) => Self::OtherFault,
        }
    }
}

/// Performs requests and keeps at most one server-fault alert on screen.
///
/// Every completed request dismisses the alert left by the previous server
/// fault. A new server fault shows a fresh warning. Errors are always handed
/// back to the caller unchanged.
pub struct RequestGateway {
    client: Arc<dyn HttpClient>,
    alerts: Arc<dyn AlertQueue>,
    slot: PendingAlertSlot,
    server_error_message: String,
}

impl RequestGateway {
    pub fn new(client: Arc<dyn HttpClient>, alerts: Arc<dyn AlertQueue>) -> Self {
        Self {
            client,
            alerts,
            slot: PendingAlertSlot::new(),
            server_error_message: DEFAULT_SERVER_ERROR_MESSAGE.into(),
        }
    }

    /// Build a gateway over a [`ReqwestClient`] configured from `config`.
    pub fn from_config(
        config: &ForumConfig,
        alerts: Arc<dyn AlertQueue>,
    ) -> Result<Self, TransportError> {
        let client = ReqwestClient::from_config(&config.http)?;
        Ok(Self::new(Arc::new(client), alerts)
            .with_server_error_message(config.alerts.server_error_message.clone()))
    }

    #[must_use]
    pub fn with_server_error_message(mut self, message: impl Into<String>) -> Self {
        self.server_error_message = message.into();
        self
    }

    /// The server-fault alert this gateway currently shows, if any.
    pub fn pending_alert(&self) -> Option<AlertHandle> {
        self.slot.current()
    }

    /// Send with the default extraction: an empty body resolves to `None`,
    /// any other body is returned as-is.
    pub async fn send(&self, spec: RequestSpec) -> Result<Option<String>, RequestError> {
        self.send_with(spec, |text| Ok(default_extract(text))).await
    }

    /// Send and parse a successful body as JSON.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<T, RequestError> {
        self.send_with(spec, |text| Ok(serde_json::from_str(text)?)).await
    }

    /// Send and map a successful body with `extract`.
    ///
    /// `extract` is not called for a 500 response, which fails with
    /// [`RequestError::ServerFault`] instead. Other non-2xx responses skip it
    /// too: their body stays raw in [`crate::OtherFault::Status`].
    pub async fn send_with<T, F>(&self, spec: RequestSpec, extract: F) -> Result<T, RequestError>
    where
        F: FnOnce(&str) -> anyhow::Result<T> + Send,
    {
        let extract = compose(extract);

        debug!(method = %spec.method, url = %spec.url, "request sent");
        let result = match self.client.request(&spec).await {
            Ok(raw) => extract(&raw),
            Err(e) => Err(e.into()),
        };

        self.settle(&spec, &result);
        result
    }

    /// Alert bookkeeping on completion: drop the previous alert, and show a
    /// new one if this request hit a server fault.
    fn settle<T>(&self, spec: &RequestSpec, result: &Result<T, RequestError>) {
        let outcome = RequestOutcome::of(result);
        let next = match outcome {
            RequestOutcome::ServerFault => {
                warn!(method = %spec.method, url = %spec.url, "server fault");
                Some(Alert::warning(self.server_error_message.as_str()))
            },
            RequestOutcome::OtherFault => {
                if let Err(e) = result {
                    debug!(method = %spec.method, url = %spec.url, error = %e, "request failed");
                }
                None
            },
            RequestOutcome::Succeeded => {
                debug!(method = %spec.method, url = %spec.url, "request succeeded");
                None
            },
        };

        if let Some(handle) = self.slot.replace(self.alerts.as_ref(), next) {
            debug!(%handle, "server fault alert shown");
        }
    }
}
