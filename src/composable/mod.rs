//! Composables: functions that validate, execute and never fail loudly.
//!
//! A [`Composable<O>`] is called with an input and an environment, both
//! unknown JSON values, and always resolves to an [`Outcome<O>`]. It is built
//! either from a handler with [`composable`], which validates both arguments
//! before running it, or from a raw function speaking the `Outcome`
//! convention with [`Composable::from_fn`].
//!
//! # Examples
//!
//! ```rust
//! use composables::composable::composable;
//! use composables::outcome::Outcome;
//! use composables::parser::schema::{number, object};
//! use serde::Deserialize;
//! use serde_json::{json, Value};
//!
//! #[derive(Deserialize)]
//! struct Identifier {
//!     id: i64,
//! }
//!
//! let increment = composable(object([("id", number())]).deserialize::<Identifier>())
//!     .handle(|Identifier { id }, _environment| Ok(id + 1));
//!
//! let outcome = futures::executor::block_on(increment.call(json!({ "id": 1 }), Value::Null));
//! assert_eq!(outcome, Outcome::success(2));
//!
//! let outcome = futures::executor::block_on(increment.call(json!({ "invalidInput": "1" }), Value::Null));
//! assert_eq!(outcome.input_errors()[0].path, vec!["id".to_string()]);
//! assert_eq!(outcome.input_errors()[0].message, "Required");
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::outcome::fault::{catch, catch_async, fault, settle};
use crate::outcome::{BoxError, ErrorData, ErrorWithMessage, Outcome};
use crate::parser::{ParserResult, ParserSchema, Unknown};

type Run<O> = dyn Fn(Value, Value) -> BoxFuture<'static, Outcome<O>> + Send + Sync;

// =============================================================================
// Composable
// =============================================================================

/// A unit with the uniform `(input, environment) -> Outcome` calling convention.
///
/// Cloning is cheap and every clone calls the same function. A composable
/// holds no state between invocations.
///
/// # Type Parameters
///
/// * `O` - The type of the data produced on success.
pub struct Composable<O> {
    run: Arc<Run<O>>,
}

impl<O> Clone for Composable<O> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<O> fmt::Debug for Composable<O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Composable<{}>", std::any::type_name::<O>())
    }
}

impl<O: Send + 'static> Composable<O> {
    /// Creates a composable from a function that already returns an [`Outcome`].
    ///
    /// No validation and no fault capture is added: the function is trusted
    /// to keep the convention. Combinators are written with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use composables::composable::Composable;
    /// use composables::outcome::Outcome;
    /// use serde_json::{json, Value};
    ///
    /// let echo = Composable::from_fn(|input, _environment| async move { Outcome::success(input) });
    ///
    /// let outcome = futures::executor::block_on(echo.call(json!("hello"), Value::Null));
    /// assert_eq!(outcome, Outcome::success(json!("hello")));
    /// ```
    pub fn from_fn<F, Fut>(function: F) -> Self
    where
        F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<O>> + Send + 'static,
    {
        Self {
            run: Arc::new(move |input, environment| function(input, environment).boxed()),
        }
    }

    /// A composable that always succeeds with a clone of `data`.
    pub fn success(data: O) -> Self
    where
        O: Clone + Sync,
    {
        Self::from_fn(move |_, _| futures::future::ready(Outcome::Success(data.clone())))
    }

    /// A composable that always fails with a clone of `error_data`.
    pub fn failure(error_data: ErrorData) -> Self {
        Self::from_fn(move |_, _| futures::future::ready(Outcome::Failure(error_data.clone())))
    }
}

impl<O> Composable<O> {
    /// Invokes the composable.
    ///
    /// Pass `Value::Null` for an absent input or environment.
    pub fn call(&self, input: Value, environment: Value) -> BoxFuture<'static, Outcome<O>> {
        (self.run)(input, environment)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Runs a validator, converting a panic inside it into an error entry.
async fn validate<S: ParserSchema>(
    schema: &S,
    value: Value,
) -> Result<ParserResult<S::Output>, ErrorWithMessage> {
    match catch(|| schema.safe_parse(value)) {
        Ok(parsing) => catch_async(parsing).await,
        Err(error) => Err(error),
    }
}

/// Starts building a composable whose input is validated by `input_schema`.
///
/// The environment accepts anything until [`ComposableBuilder::environment`]
/// sets a validator for it. A validator that panics does not reject the
/// value: the panic becomes a failure with one entry in `errors`.
pub const fn composable<I: ParserSchema>(input_schema: I) -> ComposableBuilder<I, Unknown> {
    ComposableBuilder {
        input_schema,
        environment_schema: Unknown,
    }
}

/// Collects the validators of a composable before its handler is given.
#[derive(Debug, Clone)]
pub struct ComposableBuilder<I, E> {
    input_schema: I,
    environment_schema: E,
}

impl<I, E> ComposableBuilder<I, E>
where
    I: ParserSchema,
    E: ParserSchema,
{
    /// Validates the environment with `environment_schema`.
    pub fn environment<Env: ParserSchema>(self, environment_schema: Env) -> ComposableBuilder<I, Env> {
        ComposableBuilder {
            input_schema: self.input_schema,
            environment_schema,
        }
    }

    /// Finishes the composable with a synchronous handler.
    ///
    /// `Ok` becomes a success. `Err` and panics become a failure with one
    /// entry in `errors`.
    pub fn handle<O, H>(self, handler: H) -> Composable<O>
    where
        O: Send + 'static,
        H: Fn(I::Output, E::Output) -> Result<O, BoxError> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.build(move |input, environment| {
            let handler = Arc::clone(&handler);
            async move { settle(catch(|| handler(input, environment))) }
        })
    }

    /// Finishes the composable with an asynchronous handler.
    ///
    /// A panic raised while creating or polling the handler's future is
    /// captured like an `Err`.
    pub fn handle_async<O, H, Fut>(self, handler: H) -> Composable<O>
    where
        O: Send + 'static,
        H: Fn(I::Output, E::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, BoxError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        self.build(move |input, environment| {
            let handler = Arc::clone(&handler);
            async move {
                match catch(|| handler(input, environment)) {
                    Ok(future) => settle(catch_async(future).await),
                    Err(error) => Err(error),
                }
            }
        })
    }

    fn build<O, Execute, Fut>(self, execute: Execute) -> Composable<O>
    where
        O: Send + 'static,
        Execute: Fn(I::Output, E::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ErrorWithMessage>> + Send + 'static,
    {
        let input_schema = Arc::new(self.input_schema);
        let environment_schema = Arc::new(self.environment_schema);
        let execute = Arc::new(execute);

        Composable::from_fn(move |input, environment| {
            let input_schema = Arc::clone(&input_schema);
            let environment_schema = Arc::clone(&environment_schema);
            let execute = Arc::clone(&execute);
            async move {
                let input = match validate(input_schema.as_ref(), input).await {
                    Ok(Ok(parsed)) => parsed,
                    Ok(Err(error)) => {
                        tracing::debug!(issues = error.issues.len(), "input rejected by schema");
                        return Outcome::Failure(ErrorData::from_input_errors(
                            error.into_schema_errors(),
                        ));
                    }
                    Err(error) => return fault(error),
                };
                let environment = match validate(environment_schema.as_ref(), environment).await {
                    Ok(Ok(parsed)) => parsed,
                    Ok(Err(error)) => {
                        tracing::debug!(
                            issues = error.issues.len(),
                            "environment rejected by schema"
                        );
                        return Outcome::Failure(ErrorData::from_environment_errors(
                            error.into_schema_errors(),
                        ));
                    }
                    Err(error) => return fault(error),
                };
                match execute(input, environment).await {
                    Ok(data) => Outcome::Success(data),
                    Err(error) => fault(error),
                }
            }
        })
    }
}
