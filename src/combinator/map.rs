//! Post-processing of a composable's success or failure.

use std::future::Future;
use std::sync::Arc;

use crate::composable::Composable;
use crate::outcome::fault::{catch, catch_async, fault, settle};
use crate::outcome::{BoxError, ErrorData, Outcome};

/// Transforms the data of a successful invocation.
///
/// A failure of `composable` is returned unchanged and `function` is not
/// called. A panic in `function` becomes a failure with one entry in
/// `errors`.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::map;
/// use composables::composable::Composable;
/// use composables::outcome::Outcome;
/// use serde_json::Value;
///
/// let two = map(Composable::success(1), |number| number + 1);
///
/// let outcome = futures::executor::block_on(two.call(Value::Null, Value::Null));
/// assert_eq!(outcome, Outcome::success(2));
/// ```
pub fn map<O, P, F>(composable: Composable<O>, function: F) -> Composable<P>
where
    O: Send + 'static,
    P: Send + 'static,
    F: Fn(O) -> P + Send + Sync + 'static,
{
    let function = Arc::new(function);
    Composable::from_fn(move |input, environment| {
        let source = composable.call(input, environment);
        let function = Arc::clone(&function);
        async move {
            match source.await {
                Outcome::Success(data) => match catch(|| function(data)) {
                    Ok(mapped) => Outcome::Success(mapped),
                    Err(error) => fault(error),
                },
                Outcome::Failure(error_data) => Outcome::Failure(error_data),
            }
        }
    })
}

/// Like [`map`], with a function that may fail.
///
/// An `Err` from `function` becomes a failure with one entry in `errors`.
pub fn try_map<O, P, F>(composable: Composable<O>, function: F) -> Composable<P>
where
    O: Send + 'static,
    P: Send + 'static,
    F: Fn(O) -> Result<P, BoxError> + Send + Sync + 'static,
{
    let function = Arc::new(function);
    Composable::from_fn(move |input, environment| {
        let source = composable.call(input, environment);
        let function = Arc::clone(&function);
        async move {
            match source.await {
                Outcome::Success(data) => match settle(catch(|| function(data))) {
                    Ok(mapped) => Outcome::Success(mapped),
                    Err(error) => fault(error),
                },
                Outcome::Failure(error_data) => Outcome::Failure(error_data),
            }
        }
    })
}

/// Replaces the error payload of a failed invocation.
///
/// `mapper` receives the whole [`ErrorData`] and returns its replacement.
/// The replacement is taken as is: a list the mapper leaves empty is empty in
/// the result, even if the original had entries there. A success is returned
/// unchanged and the mapper is not called.
///
/// If `mapper` returns `Err` or panics, the result is a failure whose only
/// entry is that fault, in `errors`.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::map_error;
/// use composables::composable::Composable;
/// use composables::outcome::{ErrorData, ErrorWithMessage, SchemaError};
/// use serde_json::Value;
///
/// let rejected = Composable::<i32>::failure(ErrorData::from_input_errors(vec![
///     SchemaError::new(["id"], "Required"),
/// ]));
/// let summarized = map_error(rejected, |error_data| {
///     Ok(ErrorData::from_errors(vec![ErrorWithMessage::new(format!(
///         "Number of errors: {}",
///         error_data.input_errors.len()
///     ))]))
/// });
///
/// let outcome = futures::executor::block_on(summarized.call(Value::Null, Value::Null));
/// assert_eq!(outcome.errors()[0].message, "Number of errors: 1");
/// assert!(outcome.input_errors().is_empty());
/// ```
pub fn map_error<O, F>(composable: Composable<O>, mapper: F) -> Composable<O>
where
    O: Send + 'static,
    F: Fn(ErrorData) -> Result<ErrorData, BoxError> + Send + Sync + 'static,
{
    let mapper = Arc::new(mapper);
    Composable::from_fn(move |input, environment| {
        let source = composable.call(input, environment);
        let mapper = Arc::clone(&mapper);
        async move {
            match source.await {
                Outcome::Success(data) => Outcome::Success(data),
                Outcome::Failure(error_data) => match settle(catch(|| mapper(error_data))) {
                    Ok(replacement) => Outcome::Failure(replacement),
                    Err(error) => fault(error),
                },
            }
        }
    })
}

/// Like [`map_error`], with an asynchronous mapper.
pub fn map_error_async<O, F, Fut>(composable: Composable<O>, mapper: F) -> Composable<O>
where
    O: Send + 'static,
    F: Fn(ErrorData) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ErrorData, BoxError>> + Send + 'static,
{
    let mapper = Arc::new(mapper);
    Composable::from_fn(move |input, environment| {
        let source = composable.call(input, environment);
        let mapper = Arc::clone(&mapper);
        async move {
            let error_data = match source.await {
                Outcome::Success(data) => return Outcome::Success(data),
                Outcome::Failure(error_data) => error_data,
            };
            let replacement = match catch(|| mapper(error_data)) {
                Ok(future) => settle(catch_async(future).await),
                Err(error) => Err(error),
            };
            match replacement {
                Ok(replacement) => Outcome::Failure(replacement),
                Err(error) => fault(error),
            }
        }
    })
}
