//! Transient user-facing notifications.
//!
//! Alerts are shown through an [`AlertQueue`]. The request gateway uses one to
//! surface server faults; [`api_errors`] uses one to surface validation errors
//! returned by the forum API.

pub mod alert;
pub mod api_errors;
pub mod queue;

pub use {
    alert::{Alert, AlertLevel},
    api_errors::report_api_errors,
    queue::{AlertHandle, AlertQueue, AlertStack},
};
