//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
fn validation_keeps_every_message_in_order() {
    let err = Error::validation(vec![
        "You must provide a title.".to_owned(),
        "You must provide post content.".to_owned(),
    ]);

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.errors(),
        ["You must provide a title.", "You must provide post content."]
    );
    assert_eq!(
        err.to_string(),
        "Validation failed.: You must provide a title.; You must provide post content."
    );
}

#[rstest]
#[case(Error::authentication(), ErrorCode::Unauthorized, INVALID_CREDENTIALS_MESSAGE)]
#[case(Error::authorization(), ErrorCode::Forbidden, NOT_ALLOWED_MESSAGE)]
#[case(Error::service_unavailable(), ErrorCode::ServiceUnavailable, RETRY_LATER_MESSAGE)]
fn fixed_message_constructors(
    #[case] err: Error,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    assert_eq!(err.code(), code);
    assert_eq!(err.message(), message);
    assert!(err.errors().is_empty());
}

#[rstest]
fn blank_messages_fall_back_to_code_defaults() {
    let err = Error::not_found("   ");
    assert_eq!(err.message(), "Not found.");
}

#[rstest]
fn only_store_outages_are_retryable() {
    assert!(Error::service_unavailable().is_retryable());
    assert!(!Error::internal("boom").is_retryable());
    assert!(!Error::authorization().is_retryable());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("fixture trace id");
    let err = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;

    assert_eq!(err.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_errors_list_only_when_present() {
    let plain = serde_json::to_value(Error::not_found("missing")).expect("serialise");
    assert_eq!(plain, json!({ "code": "not_found", "message": "missing" }));

    let validation = serde_json::to_value(Error::validation(vec!["bad".to_owned()]))
        .expect("serialise");
    assert_eq!(validation.get("errors"), Some(&json!(["bad"])));
    assert_eq!(validation.get("traceId"), None::<&Value>);
}
