//! Partial application of the environment.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::composable::Composable;
use crate::outcome::Outcome;

/// A composable with its environment fixed; see [`apply_environment`].
pub struct Applied<O> {
    composable: Composable<O>,
    environment: Value,
}

impl<O> Clone for Applied<O> {
    fn clone(&self) -> Self {
        Self {
            composable: self.composable.clone(),
            environment: self.environment.clone(),
        }
    }
}

impl<O> std::fmt::Debug for Applied<O> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Applied")
            .field("composable", &self.composable)
            .field("environment", &self.environment)
            .finish()
    }
}

impl<O> Applied<O> {
    /// Invokes the wrapped composable with `input` and the fixed environment.
    pub fn call(&self, input: Value) -> BoxFuture<'static, Outcome<O>> {
        self.composable.call(input, self.environment.clone())
    }

    /// The fixed environment.
    pub const fn environment(&self) -> &Value {
        &self.environment
    }
}

impl<O: Send + 'static> Applied<O> {
    /// Turns back into a composable that ignores the environment it is given.
    pub fn into_composable(self) -> Composable<O> {
        Composable::from_fn(move |input, _| self.call(input))
    }
}

/// Fixes the environment of `composable`, leaving only the input to supply.
///
/// Nothing is validated here: the wrapped composable validates the fixed
/// environment on every call, exactly as it would validate one passed in.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::apply_environment;
/// use composables::composable::composable;
/// use composables::outcome::Outcome;
/// use composables::parser::Unknown;
/// use serde_json::json;
///
/// let get_environment = composable(Unknown).handle(|_, environment| Ok(environment));
/// let fixed = apply_environment(get_environment, json!("constant environment"));
///
/// let outcome = futures::executor::block_on(fixed.call(json!("some input")));
/// assert_eq!(outcome, Outcome::success(json!("constant environment")));
/// ```
pub const fn apply_environment<O>(composable: Composable<O>, environment: Value) -> Applied<O> {
    Applied {
        composable,
        environment,
    }
}
