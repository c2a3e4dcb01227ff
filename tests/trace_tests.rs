//! Integration tests for `trace`.

use std::sync::{Arc, Mutex};

use composables::combinator::trace;
use composables::composable::{Composable, composable};
use composables::outcome::{ErrorWithMessage, Outcome};
use composables::parser::Deserialized;
use rstest::rstest;
use serde_json::{Value, json};

fn increment() -> Composable<i64> {
    composable(Deserialized::<i64>::new()).handle(|number, _| Ok(number + 1))
}

#[rstest]
#[tokio::test]
async fn test_observer_sees_every_invocation() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let traced = trace(increment(), move |outcome, input, environment| {
        recorder
            .lock()
            .unwrap()
            .push((outcome.is_success(), input.clone(), environment.clone()));
    });

    assert_eq!(traced.call(json!(1), json!("env")).await, Outcome::success(2));
    assert!(traced.call(json!("x"), Value::Null).await.is_failure());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (true, json!(1), json!("env")),
            (false, json!("x"), Value::Null)
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_outcome_is_returned_unchanged() {
    let traced = increment().trace(|_, _, _| {});

    assert_eq!(
        traced.call(json!("x"), Value::Null).await,
        increment().call(json!("x"), Value::Null).await
    );
}

#[rstest]
#[tokio::test]
async fn test_panicking_observer_turns_success_into_failure() {
    let traced = increment().trace(|outcome, _, _| {
        if outcome.is_success() {
            panic!("observer rejected the outcome");
        }
    });

    assert_eq!(
        traced.call(json!(1), Value::Null).await.errors(),
        &[ErrorWithMessage::new("observer rejected the outcome")]
    );
}
