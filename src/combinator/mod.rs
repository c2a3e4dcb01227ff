//! Combinators: composables built out of other composables.
//!
//! Every combinator takes composables and returns a composable, so results
//! can be passed on to any other combinator. Failures of the wrapped
//! composables are propagated unchanged; a combinator only adds an `errors`
//! entry for a fault in its own logic, such as a panicking mapper or stage
//! data that cannot be handed off as JSON.
//!
//! The free functions are also available as methods on [`Composable`]:
//!
//! ```rust
//! use composables::composable::Composable;
//! use composables::outcome::Outcome;
//! use serde_json::Value;
//!
//! let doubled = Composable::success(21).map(|number| number * 2);
//!
//! let outcome = futures::executor::block_on(doubled.call(Value::Null, Value::Null));
//! assert_eq!(outcome, Outcome::success(42));
//! ```

mod branch;
mod environment;
mod map;
mod stages;
mod trace;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

pub use branch::{Branched, branch, branch_async};
pub use environment::{Applied, apply_environment};
pub use map::{map, map_error, map_error_async, try_map};
pub use stages::{Stages, pipe, sequence};
pub use trace::trace;

use crate::composable::Composable;
use crate::outcome::{BoxError, ErrorData, Outcome};

impl<O: Send + 'static> Composable<O> {
    /// Method form of [`map`].
    #[must_use]
    pub fn map<P, F>(self, function: F) -> Composable<P>
    where
        P: Send + 'static,
        F: Fn(O) -> P + Send + Sync + 'static,
    {
        map(self, function)
    }

    /// Method form of [`try_map`].
    #[must_use]
    pub fn try_map<P, F>(self, function: F) -> Composable<P>
    where
        P: Send + 'static,
        F: Fn(O) -> Result<P, BoxError> + Send + Sync + 'static,
    {
        try_map(self, function)
    }

    /// Method form of [`map_error`].
    #[must_use]
    pub fn map_error<F>(self, mapper: F) -> Self
    where
        F: Fn(ErrorData) -> Result<ErrorData, BoxError> + Send + Sync + 'static,
    {
        map_error(self, mapper)
    }

    /// Method form of [`map_error_async`].
    #[must_use]
    pub fn map_error_async<F, Fut>(self, mapper: F) -> Self
    where
        F: Fn(ErrorData) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ErrorData, BoxError>> + Send + 'static,
    {
        map_error_async(self, mapper)
    }

    /// Method form of [`branch`].
    #[must_use]
    pub fn branch<P, R>(self, resolver: R) -> Composable<Branched<O, P>>
    where
        O: Serialize,
        P: Send + 'static,
        R: Fn(&O) -> Option<Composable<P>> + Send + Sync + 'static,
    {
        branch(self, resolver)
    }

    /// Method form of [`trace`].
    #[must_use]
    pub fn trace<F>(self, observer: F) -> Self
    where
        F: Fn(&Outcome<O>, &Value, &Value) + Send + Sync + 'static,
    {
        trace(self, observer)
    }
}

impl<O> Composable<O> {
    /// Method form of [`apply_environment`].
    #[must_use]
    pub const fn apply_environment(self, environment: Value) -> Applied<O> {
        apply_environment(self, environment)
    }
}
