//! Request gateway: outbound HTTP with a uniform extraction policy and a
//! single server-fault alert.
//!
//! Lifecycle of one request:
//! 1. Compose the extractor (500 short-circuits to a server fault)
//! 2. Dispatch through the [`HttpClient`]
//! 3. Dismiss the alert left by the previous server fault
//! 4. On a server fault, show a fresh warning and remember it
//! 5. Hand the result back unchanged
//!
//! Alerts themselves live in `forum-alerts`; transport configuration comes
//! from `forum-config`.

pub mod error;
pub mod extract;
pub mod gateway;
pub mod http;
pub mod request;
pub mod slot;

pub use {
    error::{OtherFault, RequestError, TransportError},
    extract::{SERVER_ERROR_STATUS, default_extract},
    gateway::{RequestGateway, RequestOutcome},
    http::{HttpClient, ReqwestClient},
    request::{RawResponse, RequestSpec},
    slot::PendingAlertSlot,
};

pub use reqwest::Method;
