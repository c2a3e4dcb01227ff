//! Integration tests for `map_error` and `map_error_async`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use composables::combinator::{map_error, map_error_async};
use composables::composable::{Composable, composable};
use composables::outcome::{BoxError, ErrorData, ErrorWithMessage, Outcome, SchemaError};
use composables::parser::Deserialized;
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct Identifier {
    id: i64,
}

fn increment() -> Composable<i64> {
    composable(Deserialized::<Identifier>::new()).handle(|Identifier { id }, _| Ok(id + 1))
}

fn count_input_errors(error_data: ErrorData) -> Result<ErrorData, BoxError> {
    Ok(ErrorData::from_errors(vec![ErrorWithMessage::new(format!(
        "Number of errors: {}",
        error_data.input_errors.len()
    ))]))
}

#[rstest]
#[tokio::test]
async fn test_mapper_replaces_failure_payload() {
    let summarized = map_error(increment(), count_input_errors);

    let outcome = summarized.call(json!({ "invalidInput": "1" }), Value::Null).await;

    assert_eq!(
        outcome,
        Outcome::failure(ErrorData::from_errors(vec![ErrorWithMessage::new(
            "Number of errors: 1"
        )]))
    );
    assert!(outcome.input_errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_mapper_is_not_called_on_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let summarized = map_error(increment(), move |error_data| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(error_data)
    });

    assert_eq!(
        summarized.call(json!({ "id": 1 }), Value::Null).await,
        Outcome::success(2)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_fields_left_out_by_mapper_are_empty() {
    let relocated = increment().map_error(|error_data| {
        Ok(ErrorData {
            environment_errors: error_data.input_errors,
            ..ErrorData::default()
        })
    });

    let outcome = relocated.call(json!({}), Value::Null).await;

    assert!(outcome.input_errors().is_empty());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.environment_errors().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_async_mapper_is_awaited() {
    let summarized = map_error_async(increment(), |error_data| async move {
        tokio::task::yield_now().await;
        count_input_errors(error_data)
    });

    let outcome = summarized.call(json!("not an object"), Value::Null).await;

    assert_eq!(outcome.errors(), &[ErrorWithMessage::new("Number of errors: 1")]);
}

#[rstest]
#[tokio::test]
async fn test_mapper_error_replaces_original_payload() {
    let failing = map_error(increment(), |_| Err("failed to map".into()));

    let outcome = failing.call(json!({}), Value::Null).await;

    assert_eq!(
        outcome,
        Outcome::failure(ErrorData::from_errors(vec![ErrorWithMessage::new(
            "failed to map"
        )]))
    );
}

#[rstest]
#[tokio::test]
async fn test_async_mapper_rejection_replaces_original_payload() {
    let failing = increment().map_error_async(|_| async { Err::<ErrorData, BoxError>("failed to map".into()) });

    let outcome = failing.call(json!({}), Value::Null).await;

    assert_eq!(outcome.errors(), &[ErrorWithMessage::new("failed to map")]);
    assert!(outcome.input_errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_mapper_panic_replaces_original_payload() {
    let failing = map_error(increment(), |_| panic!("failed to map"));

    let outcome = failing.call(json!({}), Value::Null).await;

    assert_eq!(outcome.errors(), &[ErrorWithMessage::new("failed to map")]);
    assert!(outcome.input_errors().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_mapper_may_keep_payload() {
    let untouched = map_error(increment(), Ok);

    assert_eq!(
        untouched.call(json!({}), Value::Null).await.input_errors(),
        &[SchemaError::at_root("missing field `id`")]
    );
}
