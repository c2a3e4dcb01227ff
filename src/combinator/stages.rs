//! Sequential composition: [`pipe`] and [`sequence`].
//!
//! Both run a tuple of composables left to right with one shared environment.
//! Each stage's data is handed to the next stage as its input, serialized to
//! JSON, so every output except the last must implement `Serialize`. The
//! first failing stage stops the run and its failure is returned unchanged.
//! Data that JSON cannot hold as it is, such as a NaN or a map with
//! non-string keys, stops the run with a single entry in `errors`.
//!
//! `pipe` keeps only the last stage's data; `sequence` keeps every stage's
//! data in a tuple.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::environment::{Applied, apply_environment};
use crate::composable::Composable;
use crate::outcome::handoff::hand_off;
use crate::outcome::{ErrorData, Outcome};

/// A tuple of composables that can run one after another.
///
/// Implemented for tuples of one to eight [`Composable`]s.
pub trait Stages: Clone + Send + Sync + 'static {
    /// The data of the last stage.
    type Last: Send + 'static;
    /// The data of every stage, in order.
    type Outputs: Send + 'static;

    /// Runs every stage in order, stopping at the first failure.
    fn run(&self, input: Value, environment: Value) -> BoxFuture<'static, Result<Self::Outputs, ErrorData>>;

    /// Picks the data of the last stage.
    fn last(outputs: Self::Outputs) -> Self::Last;
}

async fn run_stage<O>(stage: &Applied<O>, input: Value, index: usize) -> Result<O, ErrorData> {
    match stage.call(input).await {
        Outcome::Success(data) => Ok(data),
        Outcome::Failure(error_data) => {
            tracing::debug!(stage = index, "stage failed; skipping the remaining stages");
            Err(error_data)
        }
    }
}

impl<O1: Send + 'static> Stages for (Composable<O1>,) {
    type Last = O1;
    type Outputs = (O1,);

    fn run(&self, input: Value, environment: Value) -> BoxFuture<'static, Result<Self::Outputs, ErrorData>> {
        let stage = apply_environment(self.0.clone(), environment);
        async move { run_stage(&stage, input, 0).await.map(|data| (data,)) }.boxed()
    }

    fn last(outputs: Self::Outputs) -> Self::Last {
        outputs.0
    }
}

macro_rules! impl_stages {
    (
        ($first_output:ident, $first_stage:ident, $first_value:ident)
        $(, ($output:ident, $stage:ident, $value:ident <- $previous:ident))*
        => ($last_output:ident, $last_stage:ident, $last_value:ident <- $last_previous:ident)
    ) => {
        impl<$first_output, $($output,)* $last_output> Stages
            for (Composable<$first_output>, $(Composable<$output>,)* Composable<$last_output>)
        where
            $first_output: Serialize + Send + 'static,
            $($output: Serialize + Send + 'static,)*
            $last_output: Send + 'static,
        {
            type Last = $last_output;
            type Outputs = ($first_output, $($output,)* $last_output);

            fn run(
                &self,
                input: Value,
                environment: Value,
            ) -> BoxFuture<'static, Result<Self::Outputs, ErrorData>> {
                let ($first_stage, $($stage,)* $last_stage) = self.clone();
                async move {
                    let mut index = 0_usize;

                    let $first_stage = apply_environment($first_stage, environment.clone());
                    let $first_value = run_stage(&$first_stage, input, index).await?;
                    $(
                        index += 1;
                        let handoff = hand_off(&$previous)?;
                        let $stage = apply_environment($stage, environment.clone());
                        let $value = run_stage(&$stage, handoff, index).await?;
                    )*
                    index += 1;
                    let handoff = hand_off(&$last_previous)?;
                    let $last_stage = apply_environment($last_stage, environment);
                    let $last_value = run_stage(&$last_stage, handoff, index).await?;

                    Ok::<Self::Outputs, ErrorData>(($first_value, $($value,)* $last_value))
                }
                .boxed()
            }

            fn last(outputs: Self::Outputs) -> Self::Last {
                let (.., last) = outputs;
                last
            }
        }
    };
}

impl_stages!((O1, s1, v1) => (O2, s2, v2 <- v1));
impl_stages!((O1, s1, v1), (O2, s2, v2 <- v1) => (O3, s3, v3 <- v2));
impl_stages!(
    (O1, s1, v1), (O2, s2, v2 <- v1), (O3, s3, v3 <- v2)
    => (O4, s4, v4 <- v3)
);
impl_stages!(
    (O1, s1, v1), (O2, s2, v2 <- v1), (O3, s3, v3 <- v2), (O4, s4, v4 <- v3)
    => (O5, s5, v5 <- v4)
);
impl_stages!(
    (O1, s1, v1), (O2, s2, v2 <- v1), (O3, s3, v3 <- v2), (O4, s4, v4 <- v3),
    (O5, s5, v5 <- v4)
    => (O6, s6, v6 <- v5)
);
impl_stages!(
    (O1, s1, v1), (O2, s2, v2 <- v1), (O3, s3, v3 <- v2), (O4, s4, v4 <- v3),
    (O5, s5, v5 <- v4), (O6, s6, v6 <- v5)
    => (O7, s7, v7 <- v6)
);
impl_stages!(
    (O1, s1, v1), (O2, s2, v2 <- v1), (O3, s3, v3 <- v2), (O4, s4, v4 <- v3),
    (O5, s5, v5 <- v4), (O6, s6, v6 <- v5), (O7, s7, v7 <- v6)
    => (O8, s8, v8 <- v7)
);

/// Chains composables left to right, keeping the last stage's data.
///
/// Every stage gets the same environment. The first stage gets the input;
/// each later stage gets the data of the stage before it. The result is the
/// last stage's outcome, or the first failure.
///
/// A single-stage pipe behaves exactly like its stage.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::pipe;
/// use composables::composable::composable;
/// use composables::outcome::Outcome;
/// use composables::parser::Deserialized;
/// use serde_json::{json, Value};
///
/// let to_text = composable(Deserialized::<i64>::new()).handle(|number, _| Ok(number.to_string()));
/// let is_one = composable(Deserialized::<String>::new()).handle(|text, _| Ok(text == "1"));
///
/// let pipeline = pipe((to_text, is_one));
///
/// let outcome = futures::executor::block_on(pipeline.call(json!(1), Value::Null));
/// assert_eq!(outcome, Outcome::success(true));
/// ```
pub fn pipe<S: Stages>(stages: S) -> Composable<S::Last> {
    Composable::from_fn(move |input, environment| {
        let run = stages.run(input, environment);
        async move { Outcome::from(run.await.map(S::last)) }
    })
}

/// Chains composables like [`pipe`], keeping every stage's data in a tuple.
///
/// Each stage still receives only the data of the stage before it.
///
/// # Examples
///
/// ```rust
/// use composables::combinator::sequence;
/// use composables::composable::composable;
/// use composables::outcome::Outcome;
/// use composables::parser::Deserialized;
/// use serde_json::{json, Value};
///
/// let to_text = composable(Deserialized::<i64>::new()).handle(|number, _| Ok(number.to_string()));
/// let is_one = composable(Deserialized::<String>::new()).handle(|text, _| Ok(text == "1"));
///
/// let both = sequence((to_text, is_one));
///
/// let outcome = futures::executor::block_on(both.call(json!(1), Value::Null));
/// assert_eq!(outcome, Outcome::success(("1".to_string(), true)));
/// ```
pub fn sequence<S: Stages>(stages: S) -> Composable<S::Outputs> {
    Composable::from_fn(move |input, environment| {
        let run = stages.run(input, environment);
        async move { Outcome::from(run.await) }
    })
}

/// Builds a [`pipe`](crate::combinator::pipe) from its stages.
///
/// `pipe!(a, b, c)` is `pipe((a, b, c))`.
#[macro_export]
macro_rules! pipe {
    ($($stage:expr),+ $(,)?) => {
        $crate::combinator::pipe(($($stage,)+))
    };
}

/// Builds a [`sequence`](crate::combinator::sequence) from its stages.
///
/// `sequence!(a, b, c)` is `sequence((a, b, c))`.
#[macro_export]
macro_rules! sequence {
    ($($stage:expr),+ $(,)?) => {
        $crate::combinator::sequence(($($stage,)+))
    };
}
