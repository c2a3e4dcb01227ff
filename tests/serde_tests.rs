//! Integration tests for the JSON shape of outcomes.

use composables::combinator::Branched;
use composables::outcome::{ErrorData, ErrorWithMessage, Outcome, SchemaError};
use rstest::rstest;
use serde_json::json;

// =============================================================================
// Outcome
// =============================================================================

#[rstest]
fn test_success_has_empty_error_arrays() {
    let outcome = Outcome::success(2);

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "success": true,
            "data": 2,
            "errors": [],
            "inputErrors": [],
            "environmentErrors": []
        })
    );
}

#[rstest]
fn test_failure_has_no_data() {
    let outcome: Outcome<i32> = Outcome::failure(ErrorData::from_input_errors(vec![
        SchemaError::new(["id"], "Required"),
    ]));

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "success": false,
            "errors": [],
            "inputErrors": [{ "path": ["id"], "message": "Required" }],
            "environmentErrors": []
        })
    );
}

#[rstest]
fn test_error_entries_serialize_message_only() {
    let cause: composables::outcome::BoxError = "connection refused".into();
    let outcome: Outcome<()> = Outcome::failure(ErrorData::from_errors(vec![
        ErrorWithMessage::from_exception(cause),
    ]));

    assert_eq!(
        serde_json::to_value(&outcome).unwrap()["errors"],
        json!([{ "message": "connection refused" }])
    );
}

// =============================================================================
// ErrorData and Branched
// =============================================================================

#[rstest]
fn test_error_data_uses_camel_case_fields() {
    let error_data = ErrorData::from_environment_errors(vec![SchemaError::at_root("Required")]);

    assert_eq!(
        serde_json::to_value(&error_data).unwrap(),
        json!({
            "errors": [],
            "inputErrors": [],
            "environmentErrors": [{ "path": [], "message": "Required" }]
        })
    );
}

#[rstest]
fn test_branched_data_serializes_untagged() {
    let kept: Outcome<Branched<i32, String>> = Outcome::success(Branched::Kept(1));
    let continued: Outcome<Branched<i32, String>> =
        Outcome::success(Branched::Continued("next".to_string()));

    assert_eq!(serde_json::to_value(&kept).unwrap()["data"], json!(1));
    assert_eq!(serde_json::to_value(&continued).unwrap()["data"], json!("next"));
}
