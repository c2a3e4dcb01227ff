//! The validation adapter interface.
//!
//! A composable never trusts the values it is called with. Before its handler
//! runs, the input and the environment are each handed to a validator that
//! implements [`ParserSchema`]: it either returns the typed data or a list of
//! [`ParserIssue`]s locating what is wrong.
//!
//! # Provided adapters
//!
//! - [`Unknown`]: accepts every value as it is
//! - [`Deserialized<T>`]: validates by deserializing into `T` with serde
//! - [`parser_fn`]: turns a plain function into a validator
//! - [`schema`] (feature `schema`): structural schemas with per-field issues
//!
//! # Writing an adapter
//!
//! ```rust
//! use composables::parser::{ParseError, ParserIssue, ParserResult, ParserSchema};
//! use serde_json::Value;
//!
//! struct PositiveNumber;
//!
//! impl ParserSchema for PositiveNumber {
//!     type Output = f64;
//!
//!     async fn safe_parse(&self, value: Value) -> ParserResult<f64> {
//!         match value.as_f64() {
//!             Some(number) if number > 0.0 => Ok(number),
//!             _ => Err(ParseError::from(ParserIssue::at_root("Expected a positive number"))),
//!         }
//!     }
//! }
//!
//! let parsed = futures::executor::block_on(PositiveNumber.safe_parse(serde_json::json!(2.5)));
//! assert_eq!(parsed, Ok(2.5));
//! ```

#[cfg(feature = "schema")]
pub mod schema;

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::outcome::SchemaError;

// =============================================================================
// Issues
// =============================================================================

/// One segment of the path to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// An object property.
    Key(String),
    /// An array position.
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => formatter.write_str(key),
            Self::Index(index) => write!(formatter, "{index}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A problem found by a validator, before it is reported as a [`SchemaError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserIssue {
    /// Where the problem is.
    pub path: Vec<PathKey>,
    /// What the problem is.
    pub message: String,
}

impl ParserIssue {
    /// Creates an issue at the given path.
    pub fn new(path: Vec<PathKey>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Creates an issue about the whole value.
    pub fn at_root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    /// Prepends a segment, locating the issue one level deeper.
    #[must_use]
    pub fn within(mut self, key: impl Into<PathKey>) -> Self {
        self.path.insert(0, key.into());
        self
    }
}

impl From<ParserIssue> for SchemaError {
    fn from(issue: ParserIssue) -> Self {
        Self {
            path: issue.path.iter().map(ToString::to_string).collect(),
            message: issue.message,
        }
    }
}

/// The failure side of [`ParserResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed with {} issue(s)", .issues.len())]
pub struct ParseError {
    /// Every issue found.
    pub issues: Vec<ParserIssue>,
}

impl ParseError {
    /// Converts the issues into the schema errors reported by a composable.
    pub fn into_schema_errors(self) -> Vec<SchemaError> {
        self.issues.into_iter().map(SchemaError::from).collect()
    }
}

impl From<ParserIssue> for ParseError {
    fn from(issue: ParserIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl From<Vec<ParserIssue>> for ParseError {
    fn from(issues: Vec<ParserIssue>) -> Self {
        Self { issues }
    }
}

/// The result of validating one value.
pub type ParserResult<T> = Result<T, ParseError>;

// =============================================================================
// ParserSchema
// =============================================================================

/// A validator usable for the input or the environment of a composable.
///
/// `safe_parse` never panics on bad data: every problem is reported through
/// the `Err` side.
pub trait ParserSchema: Send + Sync + 'static {
    /// The typed data produced by a successful parse.
    type Output: Send + 'static;

    /// Validates an unknown value.
    fn safe_parse(&self, value: Value) -> impl Future<Output = ParserResult<Self::Output>> + Send;
}

// =============================================================================
// Unknown
// =============================================================================

/// Accepts every value unchanged.
///
/// It is the environment validator of composables built without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unknown;

impl ParserSchema for Unknown {
    type Output = Value;

    async fn safe_parse(&self, value: Value) -> ParserResult<Value> {
        Ok(value)
    }
}

// =============================================================================
// Deserialized
// =============================================================================

/// Validates by deserializing into `T`.
///
/// serde stops at the first problem, so a failed parse carries a single issue
/// at the root whose message is serde's.
///
/// # Examples
///
/// ```rust
/// use composables::parser::{Deserialized, ParserSchema};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Identifier {
///     id: i64,
/// }
///
/// let schema = Deserialized::<Identifier>::new();
/// let parsed = futures::executor::block_on(schema.safe_parse(json!({ "id": 1 })));
/// assert_eq!(parsed, Ok(Identifier { id: 1 }));
/// ```
pub struct Deserialized<T> {
    target: PhantomData<fn() -> T>,
}

impl<T> Deserialized<T> {
    /// Creates the adapter.
    pub const fn new() -> Self {
        Self {
            target: PhantomData,
        }
    }
}

impl<T> Default for Deserialized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Deserialized<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Deserialized<T> {}

impl<T> fmt::Debug for Deserialized<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Deserialized<{}>", std::any::type_name::<T>())
    }
}

impl<T> ParserSchema for Deserialized<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    async fn safe_parse(&self, value: Value) -> ParserResult<T> {
        serde_json::from_value(value)
            .map_err(|error| ParseError::from(ParserIssue::at_root(error.to_string())))
    }
}

// =============================================================================
// parser_fn
// =============================================================================

/// A validator built from a function; see [`parser_fn`].
#[derive(Clone, Copy)]
pub struct ParserFn<F> {
    parse: F,
}

impl<F> fmt::Debug for ParserFn<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ParserFn")
    }
}

/// Turns a synchronous validation function into a [`ParserSchema`].
///
/// # Examples
///
/// ```rust
/// use composables::parser::{parser_fn, ParserIssue, ParserSchema};
/// use serde_json::json;
///
/// let even = parser_fn(|value| match value.as_i64() {
///     Some(number) if number % 2 == 0 => Ok(number),
///     _ => Err(ParserIssue::at_root("Expected an even integer").into()),
/// });
///
/// assert_eq!(futures::executor::block_on(even.safe_parse(json!(4))), Ok(4));
/// assert!(futures::executor::block_on(even.safe_parse(json!(3))).is_err());
/// ```
pub const fn parser_fn<T, F>(parse: F) -> ParserFn<F>
where
    F: Fn(Value) -> ParserResult<T> + Send + Sync + 'static,
{
    ParserFn { parse }
}

impl<T, F> ParserSchema for ParserFn<F>
where
    T: Send + 'static,
    F: Fn(Value) -> ParserResult<T> + Send + Sync + 'static,
{
    type Output = T;

    async fn safe_parse(&self, value: Value) -> ParserResult<T> {
        (self.parse)(value)
    }
}
