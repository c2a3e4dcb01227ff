//! Conditional continuation.

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::composable::Composable;
use crate::outcome::Outcome;
use crate::outcome::fault::{catch, catch_async, fault};
use crate::outcome::handoff::hand_off;

/// The data of a [`branch`]: either the source's data, kept because the
/// resolver chose nothing, or the data of the composable it chose.
///
/// Serializes as the inner value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branched<O, P> {
    /// The resolver returned `None`; this is the source's data.
    Kept(O),
    /// The data of the composable the resolver returned.
    Continued(P),
}

impl<O, P> Branched<O, P> {
    /// Returns `true` if the source's data was kept.
    pub const fn is_kept(&self) -> bool {
        matches!(self, Self::Kept(_))
    }

    /// Returns `true` if execution continued with another composable.
    pub const fn is_continued(&self) -> bool {
        matches!(self, Self::Continued(_))
    }
}

impl<T> Branched<T, T> {
    /// Returns the data, whichever way the branch went.
    pub fn into_inner(self) -> T {
        match self {
            Self::Kept(data) | Self::Continued(data) => data,
        }
    }
}

impl<O: Serialize, P: Serialize> Serialize for Branched<O, P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Kept(data) => data.serialize(serializer),
            Self::Continued(data) => data.serialize(serializer),
        }
    }
}

async fn continue_with<O, P>(
    data: O,
    next: Option<Composable<P>>,
    environment: Value,
) -> Outcome<Branched<O, P>>
where
    O: Serialize,
{
    let Some(next) = next else {
        tracing::trace!("branch resolver kept the source data");
        return Outcome::Success(Branched::Kept(data));
    };
    let input = match hand_off(&data) {
        Ok(input) => input,
        Err(error) => return fault(error),
    };
    next.call(input, environment).await.map(Branched::Continued)
}

/// Lets the data of `source` decide whether, and how, execution continues.
///
/// `source` runs first; its failure is returned as is and the resolver is not
/// called. On success the resolver sees the data:
///
/// - `None` keeps the data: the result is `Branched::Kept(data)`
/// - `Some(next)` runs `next` with the data as input and the same
///   environment; its outcome becomes the result, as `Branched::Continued`
///
/// A panic in the resolver becomes a failure with one entry in `errors`.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::{branch, Branched};
/// use composables::composable::{composable, Composable};
/// use composables::outcome::Outcome;
/// use composables::parser::Deserialized;
/// use serde_json::{json, Value};
///
/// let stock = Composable::success(json!({ "items": [] }));
/// let extra_stock = composable(Deserialized::<Value>::new()).handle(|_, _| Ok(json!({ "items": ["extra"] })));
///
/// let with_fallback = branch(stock, move |stock: &Value| {
///     let empty = stock["items"].as_array().is_some_and(Vec::is_empty);
///     empty.then(|| extra_stock.clone())
/// });
///
/// let outcome = futures::executor::block_on(with_fallback.call(Value::Null, Value::Null));
/// assert_eq!(outcome, Outcome::success(Branched::Continued(json!({ "items": ["extra"] }))));
/// ```
pub fn branch<O, P, R>(source: Composable<O>, resolver: R) -> Composable<Branched<O, P>>
where
    O: Serialize + Send + 'static,
    P: Send + 'static,
    R: Fn(&O) -> Option<Composable<P>> + Send + Sync + 'static,
{
    let resolver = Arc::new(resolver);
    Composable::from_fn(move |input, environment: Value| {
        let source = source.call(input, environment.clone());
        let resolver = Arc::clone(&resolver);
        async move {
            let data = match source.await {
                Outcome::Success(data) => data,
                Outcome::Failure(error_data) => return Outcome::Failure(error_data),
            };
            match catch(|| resolver(&data)) {
                Ok(next) => continue_with(data, next, environment).await,
                Err(error) => fault(error),
            }
        }
    })
}

/// Like [`branch`], with an asynchronous resolver.
///
/// The resolver gets its own clone of the data.
pub fn branch_async<O, P, R, Fut>(source: Composable<O>, resolver: R) -> Composable<Branched<O, P>>
where
    O: Serialize + Clone + Send + 'static,
    P: Send + 'static,
    R: Fn(O) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Composable<P>>> + Send + 'static,
{
    let resolver = Arc::new(resolver);
    Composable::from_fn(move |input, environment: Value| {
        let source = source.call(input, environment.clone());
        let resolver = Arc::clone(&resolver);
        async move {
            let data = match source.await {
                Outcome::Success(data) => data,
                Outcome::Failure(error_data) => return Outcome::Failure(error_data),
            };
            let next = match catch(|| resolver(data.clone())) {
                Ok(future) => catch_async(future).await,
                Err(error) => Err(error),
            };
            match next {
                Ok(next) => continue_with(data, next, environment).await,
                Err(error) => fault(error),
            }
        }
    })
}
