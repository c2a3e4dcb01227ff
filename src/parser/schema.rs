//! Structural schemas for JSON values.
//!
//! A [`Schema`] describes the shape a value must have. Parsing collects every
//! issue it finds, each located by its path, with messages in the style of
//! popular JavaScript schema libraries:
//!
//! - a missing object field reports `Required`
//! - a value of the wrong type reports `Expected <type>, received <type>`
//!
//! Object schemas keep only the fields they declare.
//!
//! # Examples
//!
//! ```rust
//! use composables::parser::schema::{number, object, string};
//! use composables::parser::{ParserIssue, ParserSchema};
//! use serde_json::json;
//!
//! let user = object([("id", number()), ("name", string().optional())]);
//!
//! let parsed = futures::executor::block_on(user.safe_parse(json!({ "id": 1, "extra": true })));
//! assert_eq!(parsed, Ok(json!({ "id": 1 })));
//!
//! let error = futures::executor::block_on(user.safe_parse(json!({ "invalidInput": "1" })))
//!     .unwrap_err();
//! assert_eq!(error.issues, vec![ParserIssue::new(vec!["id".into()], "Required")]);
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{ParseError, ParserIssue, ParserResult, ParserSchema, PathKey};

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Unknown,
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array(Box<Schema>),
    Object(Vec<(String, Schema)>),
}

impl Kind {
    const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

const fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integral(number: &serde_json::Number) -> bool {
    number.is_i64()
        || number.is_u64()
        || number
            .as_f64()
            .is_some_and(|float| float.is_finite() && float.fract() == 0.0)
}

fn child_path(path: &[PathKey], key: PathKey) -> Vec<PathKey> {
    let mut child = path.to_vec();
    child.push(key);
    child
}

/// The shape a JSON value must have.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: Kind,
    optional: bool,
}

impl Schema {
    const fn of(kind: Kind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// Also accepts a missing field or `null`.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Validates with this schema, then deserializes the cleaned value into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use composables::parser::schema::{number, object};
    /// use composables::parser::ParserSchema;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Debug, PartialEq, Deserialize)]
    /// struct Identifier {
    ///     id: i64,
    /// }
    ///
    /// let schema = object([("id", number())]).deserialize::<Identifier>();
    /// let parsed = futures::executor::block_on(schema.safe_parse(json!({ "id": 1 })));
    /// assert_eq!(parsed, Ok(Identifier { id: 1 }));
    /// ```
    pub const fn deserialize<T>(self) -> Typed<T> {
        Typed {
            schema: self,
            target: PhantomData,
        }
    }

    /// Checks `value`, pushing every issue found, and returns the cleaned
    /// value when it is present.
    fn check(
        &self,
        value: Option<&Value>,
        path: &[PathKey],
        issues: &mut Vec<ParserIssue>,
    ) -> Option<Value> {
        let Some(value) = value else {
            if !self.optional {
                issues.push(ParserIssue::new(path.to_vec(), "Required"));
            }
            return None;
        };

        if self.optional && value.is_null() {
            return Some(Value::Null);
        }

        match (&self.kind, value) {
            (Kind::Unknown, _)
            | (Kind::String, Value::String(_))
            | (Kind::Number, Value::Number(_))
            | (Kind::Boolean, Value::Bool(_))
            | (Kind::Null, Value::Null) => Some(value.clone()),
            (Kind::Integer, Value::Number(number)) if is_integral(number) => Some(value.clone()),
            (Kind::Integer, Value::Number(_)) => {
                issues.push(ParserIssue::new(
                    path.to_vec(),
                    "Expected integer, received float",
                ));
                None
            }
            (Kind::Array(item), Value::Array(elements)) => {
                let before = issues.len();
                let checked: Vec<Value> = elements
                    .iter()
                    .enumerate()
                    .filter_map(|(index, element)| {
                        item.check(Some(element), &child_path(path, PathKey::Index(index)), issues)
                    })
                    .collect();
                (issues.len() == before).then_some(Value::Array(checked))
            }
            (Kind::Object(fields), Value::Object(properties)) => {
                let before = issues.len();
                let mut checked = Map::new();
                for (name, field) in fields {
                    let field_path = child_path(path, PathKey::Key(name.clone()));
                    if let Some(field_value) = field.check(properties.get(name), &field_path, issues)
                    {
                        checked.insert(name.clone(), field_value);
                    }
                }
                (issues.len() == before).then_some(Value::Object(checked))
            }
            (kind, _) => {
                issues.push(ParserIssue::new(
                    path.to_vec(),
                    format!("Expected {}, received {}", kind.name(), received(value)),
                ));
                None
            }
        }
    }

    fn parse(&self, value: &Value) -> ParserResult<Value> {
        let mut issues = Vec::new();
        let checked = self.check(Some(value), &[], &mut issues);
        if issues.is_empty() {
            Ok(checked.unwrap_or(Value::Null))
        } else {
            Err(ParseError::from(issues))
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Array(item) => write!(formatter, "array<{item}>")?,
            Kind::Object(fields) => {
                formatter.write_str("{ ")?;
                for (index, (name, field)) in fields.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{name}: {field}")?;
                }
                formatter.write_str(" }")?;
            }
            kind => formatter.write_str(kind.name())?,
        }
        if self.optional {
            formatter.write_str("?")?;
        }
        Ok(())
    }
}

impl ParserSchema for Schema {
    type Output = Value;

    async fn safe_parse(&self, value: Value) -> ParserResult<Value> {
        self.parse(&value)
    }
}

/// A [`Schema`] whose cleaned value is deserialized into `T`.
///
/// Built with [`Schema::deserialize`]. Structural issues are reported as the
/// schema reports them; a deserialization failure afterwards becomes one
/// issue at the root carrying serde's message.
pub struct Typed<T> {
    schema: Schema,
    target: PhantomData<fn() -> T>,
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Typed")
            .field("schema", &self.schema)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> ParserSchema for Typed<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    async fn safe_parse(&self, value: Value) -> ParserResult<T> {
        let checked = self.schema.parse(&value)?;
        serde_json::from_value(checked)
            .map_err(|error| ParseError::from(ParserIssue::at_root(error.to_string())))
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Accepts any value.
pub const fn unknown() -> Schema {
    Schema::of(Kind::Unknown)
}

/// Accepts strings.
pub const fn string() -> Schema {
    Schema::of(Kind::String)
}

/// Accepts numbers.
pub const fn number() -> Schema {
    Schema::of(Kind::Number)
}

/// Accepts numbers without a fractional part.
pub const fn integer() -> Schema {
    Schema::of(Kind::Integer)
}

/// Accepts `true` and `false`.
pub const fn boolean() -> Schema {
    Schema::of(Kind::Boolean)
}

/// Accepts `null` only.
pub const fn null() -> Schema {
    Schema::of(Kind::Null)
}

/// Accepts arrays whose every element matches `item`.
pub fn array(item: Schema) -> Schema {
    Schema::of(Kind::Array(Box::new(item)))
}

/// Accepts objects with the given fields; other properties are dropped.
pub fn object<I, K>(fields: I) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    Schema::of(Kind::Object(
        fields
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect(),
    ))
}
