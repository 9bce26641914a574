//! Surface validation errors from a JSON:API error document as alerts.

use {serde::Deserialize, tracing::debug};

use crate::{
    alert::Alert,
    queue::{AlertHandle, AlertQueue},
};

#[derive(Debug, Default, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiError {
    fn message(self) -> Option<String> {
        self.detail.or(self.title).or(self.code)
    }
}

/// Clear `queue` and show one warning per error in `document`.
///
/// Each error is described by its `detail`, falling back to `title` and then
/// `code`. Errors carrying none of these are skipped. Returns the handles of
/// the alerts shown.
pub fn report_api_errors(
    queue: &dyn AlertQueue,
    document: &serde_json::Value,
) -> Vec<AlertHandle> {
    queue.clear();

    let document = match ErrorDocument::deserialize(document) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "response is not an error document");
            return Vec::new();
        },
    };

    document
        .errors
        .into_iter()
        .filter_map(ApiError::message)
        .map(|message| queue.show(Alert::warning(message)))
        .collect()
}

#[cfg(test)]
mod tests {
    use {super::*, crate::queue::AlertStack, serde_json::json};

    #[test]
    fn shows_one_alert_per_error() {
        let stack = AlertStack::new();
        let doc = json!({
            "errors": [
                {
                    "detail": "The title field is required.",
                    "source": {"pointer": "/data/attributes/title"}
                },
                {"detail": "The content must be at least 2 characters."}
            ]
        });

        let handles = report_api_errors(&stack, &doc);
        assert_eq!(handles.len(), 2);

        let messages: Vec<_> = stack.visible().into_iter().map(|(_, a)| a.message).collect();
        assert_eq!(messages, vec![
            "The title field is required.",
            "The content must be at least 2 characters.",
        ]);
    }

    #[test]
    fn clears_existing_alerts_first() {
        let stack = AlertStack::new();
        let old = stack.show(Alert::warning("stale"));
        report_api_errors(&stack, &json!({"errors": [{"detail": "fresh"}]}));
        assert!(!stack.contains(old));
        assert_eq!(stack.len(), 1);
    }

    #[rstest::rstest]
    #[case(json!({"title": "Not Found", "code": "not_found"}), Some("Not Found"))]
    #[case(json!({"code": "permission_denied"}), Some("permission_denied"))]
    #[case(json!({"status": "422"}), None)]
    fn falls_back_from_detail(#[case] error: serde_json::Value, #[case] expected: Option<&str>) {
        let stack = AlertStack::new();
        report_api_errors(&stack, &json!({ "errors": [error] }));
        let messages: Vec<_> = stack.visible().into_iter().map(|(_, a)| a.message).collect();
        assert_eq!(messages.first().map(String::as_str), expected);
    }

    #[test]
    fn non_document_only_clears() {
        let stack = AlertStack::new();
        stack.show(Alert::warning("stale"));
        let handles = report_api_errors(&stack, &json!("oops"));
        assert!(handles.is_empty());
        assert!(stack.is_empty());
    }
}
