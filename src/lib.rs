//! # composables
//!
//! Validated, composable units of business logic that never fail loudly.
//!
//! ## Overview
//!
//! A [`Composable`] is called with an *input* and an *environment*, both
//! unknown JSON values, and always resolves to an [`Outcome`]: the data it
//! produced, or a structured account of why it failed. Nothing raised inside
//! it escapes to the caller.
//!
//! - **Outcome**: the success/failure result model with three disjoint error
//!   kinds (execution errors, input errors, environment errors)
//! - **Parser**: the validation adapter interface, plus adapters built on
//!   serde and an optional structural schema builder
//! - **Composable**: the constructor that validates input and environment
//!   before running a handler
//! - **Combinators**: `pipe`, `sequence`, `branch`, `map`, `map_error`,
//!   `apply_environment` and `trace`
//!
//! ## Feature Flags
//!
//! - `schema` (default): structural schemas in [`parser::schema`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use composables::prelude::*;
//! use serde_json::{json, Value};
//!
//! let to_text = composable(Deserialized::<i64>::new()).handle(|number, _| Ok(number.to_string()));
//! let is_one = composable(Deserialized::<String>::new()).handle(|text, _| Ok(text == "1"));
//!
//! let pipeline = pipe!(to_text, is_one);
//!
//! let outcome = futures::executor::block_on(pipeline.call(json!(1), Value::Null));
//! assert_eq!(outcome, Outcome::success(true));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, functions and macros.
///
/// # Usage
///
/// ```rust
/// use composables::prelude::*;
/// ```
pub mod prelude {
    pub use crate::combinator::*;
    pub use crate::composable::*;
    pub use crate::outcome::*;
    pub use crate::parser::*;
    pub use crate::{pipe, sequence};
}

pub mod combinator;
pub mod composable;
pub mod outcome;
pub mod parser;

pub use composable::{Composable, composable};
pub use outcome::{ErrorData, Outcome};
