//! Hand-off of stage data to the next stage as JSON.
//!
//! `serde_json` writes a NaN or infinite float as `null`, which would give the
//! next stage a value its predecessor never produced. Data is walked once
//! before conversion and such floats are reported as a fault instead.

use std::fmt;

use serde::ser::{self, Serialize, Serializer};
use serde_json::Value;

use super::ErrorWithMessage;

/// The fault reported when stage data holds a float JSON cannot represent.
///
/// # Examples
///
/// ```rust
/// use composables::outcome::NonFiniteNumber;
///
/// let fault = NonFiniteNumber { value: f64::INFINITY };
/// assert_eq!(fault.to_string(), "cannot hand off non-finite number inf as JSON");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("cannot hand off non-finite number {value} as JSON")]
pub struct NonFiniteNumber {
    /// The offending float.
    pub value: f64,
}

#[derive(Debug, thiserror::Error)]
enum Unchecked {
    #[error(transparent)]
    NonFinite(NonFiniteNumber),
    #[error("serialization failed while checking floats")]
    Custom,
}

impl ser::Error for Unchecked {
    fn custom<T: fmt::Display>(_message: T) -> Self {
        Self::Custom
    }
}

/// Walks serialized data, failing on the first non-finite float.
#[derive(Clone, Copy)]
struct FiniteCheck;

fn finite(value: f64) -> Result<(), Unchecked> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Unchecked::NonFinite(NonFiniteNumber { value }))
    }
}

macro_rules! accept {
    ($($method:ident($type:ty)),* $(,)?) => {
        $(
            fn $method(self, _value: $type) -> Result<(), Unchecked> {
                Ok(())
            }
        )*
    };
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, value: f32) -> Result<(), Unchecked> {
        finite(f64::from(value))
    }

    fn serialize_f64(self, value: f64) -> Result<(), Unchecked> {
        finite(value)
    }

    fn serialize_none(self) -> Result<(), Unchecked> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), Unchecked> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Unchecked> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), Unchecked> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Unchecked> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), Unchecked> {
        value.serialize(self)
    }

    fn serialize_seq(self, _length: Option<usize>) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_tuple(self, _length: usize) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _length: usize) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _length: usize,
    ) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_map(self, _length: Option<usize>) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _length: usize) -> Result<Self, Unchecked> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _length: usize,
    ) -> Result<Self, Unchecked> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Unchecked> {
        key.serialize(*self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = Unchecked;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Unchecked> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Unchecked> {
        Ok(())
    }
}

/// Serializes stage data into the input of the next stage.
///
/// Fails with a [`NonFiniteNumber`] fault for NaN or infinite floats, and
/// with serde's error for data JSON cannot hold, such as non-string map keys.
pub(crate) fn hand_off<T: Serialize>(data: &T) -> Result<Value, ErrorWithMessage> {
    // A custom serialization error is left for `to_value` to report with its message.
    if let Err(Unchecked::NonFinite(number)) = data.serialize(FiniteCheck) {
        return Err(ErrorWithMessage::from_exception(Box::new(number)));
    }
    serde_json::to_value(data).map_err(|error| ErrorWithMessage::from_exception(Box::new(error)))
}
