//! The result model every composable returns.
//!
//! An [`Outcome<T>`] is either a `Success` holding the data produced by the
//! composable, or a `Failure` holding an [`ErrorData`] that says why it
//! failed. The failure payload keeps three disjoint kinds of errors:
//!
//! - `errors`: faults raised while executing (see [`ErrorWithMessage`])
//! - `input_errors`: issues found validating the input (see [`SchemaError`])
//! - `environment_errors`: issues found validating the environment
//!
//! # Examples
//!
//! ```rust
//! use composables::outcome::{ErrorData, Outcome, SchemaError};
//!
//! let success: Outcome<i32> = Outcome::success(2);
//! assert!(success.is_success());
//! assert!(success.errors().is_empty());
//!
//! let failure: Outcome<i32> = Outcome::failure(ErrorData::from_input_errors(vec![
//!     SchemaError::new(["id"], "Required"),
//! ]));
//! assert!(failure.is_failure());
//! assert_eq!(failure.input_errors()[0].message, "Required");
//! ```
//!
//! # JSON shape
//!
//! `Outcome` serializes to the uniform shape
//! `{ success, data?, errors, inputErrors, environmentErrors }`, where all
//! three error arrays are present (and empty) on success.

mod error;
pub(crate) mod fault;
pub(crate) mod handoff;

pub use error::{BoxError, ErrorWithMessage, Exception, SchemaError};
pub use fault::Panicked;
pub use handoff::NonFiniteNumber;

use serde::ser::{Serialize, SerializeStruct, Serializer};

// =============================================================================
// ErrorData
// =============================================================================

/// The payload of a failed [`Outcome`].
///
/// `Default` yields a payload with every list empty, so error mappers can
/// set only the lists they care about:
///
/// ```rust
/// use composables::outcome::{ErrorData, ErrorWithMessage};
///
/// let replacement = ErrorData {
///     errors: vec![ErrorWithMessage::new("Number of errors: 1")],
///     ..ErrorData::default()
/// };
/// assert!(replacement.input_errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error(
    "composable failed with {} error(s), {} input error(s) and {} environment error(s)",
    .errors.len(),
    .input_errors.len(),
    .environment_errors.len()
)]
pub struct ErrorData {
    /// Faults raised while executing.
    pub errors: Vec<ErrorWithMessage>,
    /// Issues found validating the input.
    pub input_errors: Vec<SchemaError>,
    /// Issues found validating the environment.
    pub environment_errors: Vec<SchemaError>,
}

impl ErrorData {
    /// Creates a payload holding only execution errors.
    pub fn from_errors(errors: Vec<ErrorWithMessage>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Creates a payload holding only input validation errors.
    pub fn from_input_errors(input_errors: Vec<SchemaError>) -> Self {
        Self {
            input_errors,
            ..Self::default()
        }
    }

    /// Creates a payload holding only environment validation errors.
    pub fn from_environment_errors(environment_errors: Vec<SchemaError>) -> Self {
        Self {
            environment_errors,
            ..Self::default()
        }
    }

    /// Returns `true` if none of the three lists has an entry.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.input_errors.is_empty() && self.environment_errors.is_empty()
    }
}

impl From<ErrorWithMessage> for ErrorData {
    fn from(error: ErrorWithMessage) -> Self {
        Self::from_errors(vec![error])
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The success or failure of invoking a composable.
///
/// # Type Parameters
///
/// * `T` - The type of the data produced on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The composable produced its data.
    Success(T),
    /// The composable failed; the payload says why.
    Failure(ErrorData),
}

impl<T> Outcome<T> {
    /// Wraps data in a successful outcome.
    pub const fn success(data: T) -> Self {
        Self::Success(data)
    }

    /// Wraps an error payload in a failed outcome.
    pub const fn failure(error_data: ErrorData) -> Self {
        Self::Failure(error_data)
    }

    /// Returns `true` for `Success`.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for `Failure`.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the data of a successful outcome.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Returns the error payload of a failed outcome.
    pub const fn error_data(&self) -> Option<&ErrorData> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error_data) => Some(error_data),
        }
    }

    /// Execution errors; always empty on success.
    pub fn errors(&self) -> &[ErrorWithMessage] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(error_data) => &error_data.errors,
        }
    }

    /// Input validation errors; always empty on success.
    pub fn input_errors(&self) -> &[SchemaError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(error_data) => &error_data.input_errors,
        }
    }

    /// Environment validation errors; always empty on success.
    pub fn environment_errors(&self) -> &[SchemaError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(error_data) => &error_data.environment_errors,
        }
    }

    /// Transforms the data of a successful outcome, leaving failures as they are.
    #[must_use]
    pub fn map<U, F>(self, function: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(data) => Outcome::Success(function(data)),
            Self::Failure(error_data) => Outcome::Failure(error_data),
        }
    }

    /// Converts into a standard `Result`, so `?` can unwrap a successful outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorData`] of a failed outcome.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use composables::outcome::{ErrorData, Outcome};
    ///
    /// assert_eq!(Outcome::success(2).into_result(), Ok(2));
    /// assert!(Outcome::<i32>::failure(ErrorData::default()).into_result().is_err());
    /// ```
    pub fn into_result(self) -> Result<T, ErrorData> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(error_data) => Err(error_data),
        }
    }
}

impl<T> From<Result<T, ErrorData>> for Outcome<T> {
    fn from(result: Result<T, ErrorData>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error_data) => Self::Failure(error_data),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("Outcome", 5)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.serialize_field("errors", &Vec::<ErrorWithMessage>::new())?;
                state.serialize_field("inputErrors", &Vec::<SchemaError>::new())?;
                state.serialize_field("environmentErrors", &Vec::<SchemaError>::new())?;
                state.end()
            }
            Self::Failure(error_data) => {
                let mut state = serializer.serialize_struct("Outcome", 4)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("errors", &error_data.errors)?;
                state.serialize_field("inputErrors", &error_data.input_errors)?;
                state.serialize_field("environmentErrors", &error_data.environment_errors)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn success_reports_empty_error_lists() {
        let outcome = Outcome::success(2);

        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert_eq!(outcome.data(), Some(&2));
        assert!(outcome.errors().is_empty());
        assert!(outcome.input_errors().is_empty());
        assert!(outcome.environment_errors().is_empty());
        assert_eq!(outcome.error_data(), None);
    }

    #[rstest]
    fn failure_has_no_data() {
        let outcome: Outcome<i32> =
            Outcome::failure(ErrorData::from_errors(vec![ErrorWithMessage::new("boom")]));

        assert!(outcome.is_failure());
        assert_eq!(outcome.data(), None);
        assert_eq!(outcome.errors(), &[ErrorWithMessage::new("boom")]);
    }

    #[rstest]
    fn map_leaves_failure_untouched() {
        let failure: Outcome<i32> =
            Outcome::failure(ErrorData::from_input_errors(vec![SchemaError::at_root("Required")]));

        assert_eq!(failure.clone().map(|x| x + 1), failure);
        assert_eq!(Outcome::success(1).map(|x| x + 1), Outcome::success(2));
    }

    #[rstest]
    fn result_conversions_round_trip() {
        let error_data = ErrorData::from_environment_errors(vec![SchemaError::at_root("Required")]);

        assert_eq!(Outcome::<i32>::from(Err(error_data.clone())).into_result(), Err(error_data));
        assert_eq!(Outcome::from(Ok::<_, ErrorData>(3)), Outcome::success(3));
    }

    #[rstest]
    fn error_data_default_is_empty() {
        assert!(ErrorData::default().is_empty());
        assert!(!ErrorData::from(ErrorWithMessage::new("boom")).is_empty());
    }

    #[rstest]
    fn error_data_display_counts_entries() {
        let error_data = ErrorData {
            errors: vec![ErrorWithMessage::new("boom")],
            input_errors: vec![SchemaError::at_root("a"), SchemaError::at_root("b")],
            environment_errors: Vec::new(),
        };

        assert_eq!(
            error_data.to_string(),
            "composable failed with 1 error(s), 2 input error(s) and 0 environment error(s)"
        );
    }

    #[rstest]
    fn success_serializes_with_empty_error_lists() {
        assert_eq!(
            serde_json::to_value(Outcome::success(2)).unwrap(),
            json!({
                "success": true,
                "data": 2,
                "errors": [],
                "inputErrors": [],
                "environmentErrors": [],
            })
        );
    }

    #[rstest]
    fn failure_serializes_without_data() {
        let outcome: Outcome<i32> =
            Outcome::failure(ErrorData::from_input_errors(vec![SchemaError::new(["id"], "Required")]));

        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            json!({
                "success": false,
                "errors": [],
                "inputErrors": [{ "path": ["id"], "message": "Required" }],
                "environmentErrors": [],
            })
        );
    }
}
