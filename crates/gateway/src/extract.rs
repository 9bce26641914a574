//! Response extraction policy.
//!
//! Extraction is composed before a request is dispatched and runs on the raw
//! response before the success/failure decision. A server fault short-circuits
//! it: the caller's extractor never sees a 500 response.

use crate::{
    error::{OtherFault, RequestError},
    request::RawResponse,
};

/// The one status treated as a server fault. Other 5xx codes are ordinary
/// status failures.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Extraction used when the caller supplies none: an empty body is no value,
/// anything else passes through unchanged.
pub fn default_extract(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

/// Wrap a caller extractor with the server-fault check and the status policy.
///
/// The returned function yields
/// - [`RequestError::ServerFault`] for status 500,
/// - [`OtherFault::Status`] for any other non-2xx status, carrying the body
///   as [`default_extract`] sees it,
/// - [`OtherFault::Extract`] if `extract` fails,
/// - and `extract(body)` otherwise.
pub fn compose<T, F>(extract: F) -> impl FnOnce(&RawResponse) -> Result<T, RequestError>
where
    F: FnOnce(&str) -> anyhow::Result<T>,
{
    move |raw| {
        if raw.status == SERVER_ERROR_STATUS {
            return Err(RequestError::ServerFault);
        }
        if !raw.is_success() {
            return Err(OtherFault::Status {
                status: raw.status,
                body: default_extract(&raw.response_text),
            }
            .into());
        }
        extract(&raw.response_text).map_err(|e| OtherFault::Extract(e).into())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, std::cell::Cell};

    #[test]
    fn server_fault_skips_caller_extractor() {
        let called = Cell::new(false);
        let extract = compose(|text: &str| {
            called.set(true);
            Ok(text.len())
        });

        let result = extract(&RawResponse::new(500, "{\"data\": 1}"));
        assert!(matches!(result, Err(RequestError::ServerFault)));
        assert!(!called.get());
    }

    #[rstest]
    #[case(502)]
    #[case(503)]
    #[case(504)]
    fn other_5xx_is_not_a_server_fault(#[case] status: u16) {
        let extract = compose(|t: &str| Ok(default_extract(t)));
        let result = extract(&RawResponse::new(status, "bad gateway"));
        match result {
            Err(RequestError::Other(OtherFault::Status { status: s, body })) => {
                assert_eq!(s, status);
                assert_eq!(body.as_deref(), Some("bad gateway"));
            },
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[test]
    fn default_extract_treats_empty_body_as_none() {
        assert_eq!(default_extract(""), None);
        assert_eq!(default_extract("{}"), Some("{}".to_string()));
        assert_eq!(default_extract(" "), Some(" ".to_string()));
    }

    #[test]
    fn caller_extractor_receives_raw_body() {
        let extract = compose(|text: &str| Ok(serde_json::from_str::<serde_json::Value>(text)?));
        let value = extract(&RawResponse::new(200, r#"{"data": {"id": "1"}}"#)).unwrap();
        assert_eq!(value["data"]["id"], "1");
    }

    #[test]
    fn failing_extractor_is_an_extract_fault() {
        let extract = compose(|text: &str| Ok(serde_json::from_str::<serde_json::Value>(text)?));
        let err = extract(&RawResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, RequestError::Other(OtherFault::Extract(_))));
    }

    #[derive(Debug, PartialEq)]
    struct MissingField(&'static str);

    impl std::fmt::Display for MissingField {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "missing field {}", self.0)
        }
    }

    impl std::error::Error for MissingField {}

    #[test]
    fn extractor_error_can_be_downcast() {
        let extract = compose(|_: &str| -> anyhow::Result<()> { Err(MissingField("id").into()) });
        let err = extract(&RawResponse::new(200, "{}")).unwrap_err();

        let source = std::error::Error::source(&err).and_then(|e| e.downcast_ref::<MissingField>());
        assert_eq!(source, Some(&MissingField("id")));

        match err {
            RequestError::Other(OtherFault::Extract(inner)) => {
                assert_eq!(inner.downcast_ref::<MissingField>(), Some(&MissingField("id")));
            },
            other => panic!("expected extract fault, got {other:?}"),
        }
    }
}
