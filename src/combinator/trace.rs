//! Observation of invocations.

use std::sync::Arc;

use serde_json::Value;

use crate::composable::Composable;
use crate::outcome::Outcome;
use crate::outcome::fault::{catch, fault};

/// Calls `observer` after every invocation of `composable`, with the outcome,
/// the input and the environment.
///
/// The outcome is returned unchanged. If the observer panics, the result is a
/// failure carrying that panic in `errors` instead.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::trace;
/// use composables::composable::Composable;
/// use serde_json::{json, Value};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let recorder = Arc::clone(&seen);
/// let traced = trace(Composable::success(1), move |outcome, input, _environment| {
///     recorder.lock().unwrap().push((outcome.is_success(), input.clone()));
/// });
///
/// futures::executor::block_on(traced.call(json!("request"), Value::Null));
/// assert_eq!(*seen.lock().unwrap(), vec![(true, json!("request"))]);
/// ```
pub fn trace<O, F>(composable: Composable<O>, observer: F) -> Composable<O>
where
    O: Send + 'static,
    F: Fn(&Outcome<O>, &Value, &Value) + Send + Sync + 'static,
{
    let observer = Arc::new(observer);
    Composable::from_fn(move |input: Value, environment: Value| {
        let source = composable.call(input.clone(), environment.clone());
        let observer = Arc::clone(&observer);
        async move {
            let outcome = source.await;
            match catch(|| observer(&outcome, &input, &environment)) {
                Ok(()) => outcome,
                Err(error) => fault(error),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{ErrorData, ErrorWithMessage};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[tokio::test]
    async fn observer_sees_failures_too() {
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&failures);
        let failure = ErrorData::from_errors(vec![ErrorWithMessage::new("failed")]);
        let traced = trace(Composable::<i32>::failure(failure.clone()), move |outcome, _, _| {
            if outcome.is_failure() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(traced.call(Value::Null, Value::Null).await, Outcome::failure(failure));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn observer_receives_environment() {
        let seen = Arc::new(std::sync::Mutex::new(Value::Null));
        let recorder = Arc::clone(&seen);
        let traced = trace(Composable::success(1), move |_, _, environment| {
            *recorder.lock().unwrap() = environment.clone();
        });

        traced.call(Value::Null, json!({ "user": "alice" })).await;

        assert_eq!(*seen.lock().unwrap(), json!({ "user": "alice" }));
    }

    #[rstest]
    #[tokio::test]
    async fn observer_panic_becomes_failure() {
        let traced = trace(Composable::success(1), |_, _, _| panic!("observer exploded"));

        assert_eq!(
            traced.call(Value::Null, Value::Null).await.errors(),
            &[ErrorWithMessage::new("observer exploded")]
        );
    }
}
