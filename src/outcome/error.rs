//! Error entries carried by a failed [`Outcome`](super::Outcome).
//!
//! Two kinds of entries exist and they never mix:
//!
//! - [`ErrorWithMessage`]: a fault raised while the composable was executing
//!   (an `Err` returned by a handler, a panic, a failing mapper).
//! - [`SchemaError`]: an issue reported by a validator about the input or
//!   the environment, located by its path.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A boxed error returned by fallible handlers and callbacks.
///
/// Every `std::error::Error + Send + Sync` converts into it through `?`, and
/// so do `&str` and `String`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The original fault retained by an [`ErrorWithMessage`] for diagnostics.
pub type Exception = Arc<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// ErrorWithMessage
// =============================================================================

/// An error raised by the executing function itself.
///
/// The `message` is the best-effort textual form of the fault; the
/// `exception`, when present, is the fault value itself.
///
/// Two entries are equal when their messages are equal; the retained
/// exception does not take part in comparison or serialization.
///
/// # Examples
///
/// ```rust
/// use composables::outcome::ErrorWithMessage;
///
/// let from_text = ErrorWithMessage::new("failed to map");
/// let from_error = ErrorWithMessage::from_exception("failed to map".into());
///
/// assert_eq!(from_text, from_error);
/// assert!(from_text.exception.is_none());
/// assert!(from_error.exception.is_some());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorWithMessage {
    /// The textual description of the fault.
    pub message: String,
    /// The fault that produced this entry, if one was captured.
    #[serde(skip)]
    pub exception: Option<Exception>,
}

impl ErrorWithMessage {
    /// Creates an entry carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exception: None,
        }
    }

    /// Creates an entry from a captured fault, deriving the message from its
    /// `Display` output.
    pub fn from_exception(exception: BoxError) -> Self {
        Self {
            message: exception.to_string(),
            exception: Some(Arc::from(exception)),
        }
    }
}

impl PartialEq for ErrorWithMessage {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl Eq for ErrorWithMessage {}

impl fmt::Display for ErrorWithMessage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl From<BoxError> for ErrorWithMessage {
    fn from(exception: BoxError) -> Self {
        Self::from_exception(exception)
    }
}

// =============================================================================
// SchemaError
// =============================================================================

/// One issue reported while validating the input or the environment.
///
/// `path` locates the offending field, one segment per property key or
/// array index. An empty path points at the value itself.
///
/// # Examples
///
/// ```rust
/// use composables::outcome::SchemaError;
///
/// let error = SchemaError::new(["user", "id"], "Required");
/// assert_eq!(error.path, vec!["user".to_string(), "id".to_string()]);
/// assert_eq!(error.to_string(), "user.id: Required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaError {
    /// Path segments of the offending field.
    pub path: Vec<String>,
    /// What the validator found wrong.
    pub message: String,
}

impl SchemaError {
    /// Creates a schema error at the given path.
    pub fn new<P, S>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Creates a schema error about the whole value.
    pub fn at_root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            formatter.write_str(&self.message)
        } else {
            write!(formatter, "{}: {}", self.path.join("."), self.message)
        }
    }
}
