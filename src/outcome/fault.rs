//! Capture of faults raised at fallible boundaries.
//!
//! Validators, handlers, mappers, resolvers and observers are user code: they may return
//! an `Err`, and they may panic. Both end up here and leave as a single
//! [`ErrorWithMessage`], so nothing raised inside a composable ever escapes
//! its caller.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use super::{BoxError, ErrorData, ErrorWithMessage, Outcome};

/// The fault retained for a panic caught inside a composable.
///
/// Its message is the panic payload when the payload is a string.
///
/// # Examples
///
/// ```rust
/// use composables::outcome::Panicked;
///
/// let fault = Panicked { message: "failed to map".to_string() };
/// assert_eq!(fault.to_string(), "failed to map");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Panicked {
    /// The panic payload rendered as text.
    pub message: String,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Converts a caught panic payload into an error entry.
pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> ErrorWithMessage {
    let message = panic_message(payload.as_ref());
    tracing::warn!(panic = %message, "captured panic inside composable");
    ErrorWithMessage::from_exception(Box::new(Panicked { message }))
}

/// Runs `function`, converting a panic into an error entry.
pub(crate) fn catch<T, F>(function: F) -> Result<T, ErrorWithMessage>
where
    F: FnOnce() -> T,
{
    std::panic::catch_unwind(AssertUnwindSafe(function)).map_err(from_panic)
}

/// Awaits `future`, converting a panic raised while polling it into an error entry.
pub(crate) async fn catch_async<Fut>(future: Fut) -> Result<Fut::Output, ErrorWithMessage>
where
    Fut: Future,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(from_panic)
}

/// Flattens a caught fallible call: panics and `Err` returns both become an entry.
pub(crate) fn settle<T>(
    attempt: Result<Result<T, BoxError>, ErrorWithMessage>,
) -> Result<T, ErrorWithMessage> {
    attempt.and_then(|result| result.map_err(ErrorWithMessage::from_exception))
}

/// Builds the failure a combinator reports for a fault in its own logic.
pub(crate) fn fault<T>(error: ErrorWithMessage) -> Outcome<T> {
    Outcome::Failure(ErrorData::from(error))
}
