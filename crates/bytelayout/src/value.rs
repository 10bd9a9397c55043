//! Dynamic values produced by record layouts, and the conversions between
//! them and the typed outputs of individual parsers.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// A parsed record: field name to value. Keys are fixed by the layout.
pub type Record = BTreeMap<String, Value>;

/// Sentinel produced by [crate::padding::PaddingParser]. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Padding;

/// A value read from, or to be written into, a field of a record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Char(char),
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    String(String),
    Padding,
    Array(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Short name of the variant, used in [Error::ValueMismatch].
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Char(_) => "char",
            Value::Bool(_) => "bool",
            Value::I8(_)
            | Value::U8(_)
            | Value::I16(_)
            | Value::U16(_)
            | Value::I32(_)
            | Value::U32(_)
            | Value::I64(_)
            | Value::U64(_) => "integer",
            Value::String(_) => "string",
            Value::Padding => "padding",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
        }
    }

    /// Integer payload widened to 64 bits, two's complement for signed variants.
    fn as_bits(&self) -> Option<u64> {
        match *self {
            Value::I8(v) => Some(v as u64),
            Value::U8(v) => Some(v as u64),
            Value::I16(v) => Some(v as u64),
            Value::U16(v) => Some(v as u64),
            Value::I32(v) => Some(v as u64),
            Value::U32(v) => Some(v as u64),
            Value::I64(v) => Some(v as u64),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::ValueMismatch {
        expected,
        found: found.kind(),
    }
}

/// Conversion between a parser's typed output and [Value].
pub trait FieldValue: Sized {
    /// Set only for [Padding]; struct layouts skip such fields.
    const PADDING: bool = false;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Result<Self, Error>;
}

/// Integers accept any integer variant and wrap to the target width, the same
/// way an `as` cast does.
macro_rules! int_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Result<Self, Error> {
                    value
                        .as_bits()
                        .map(|bits| bits as $ty)
                        .ok_or_else(|| mismatch("integer", value))
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

int_field_value! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

impl FieldValue for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Char(c) => Ok(*c),
            other => Err(mismatch("char", other)),
        }
    }
}

impl FieldValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FieldValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FieldValue for Padding {
    const PADDING: bool = true;

    fn into_value(self) -> Value {
        Value::Padding
    }

    // Padding writes nothing, so any value is acceptable.
    fn from_value(_value: &Value) -> Result<Self, Error> {
        Ok(Padding)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(FieldValue::into_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("array", other)),
        }
    }
}

impl FieldValue for Record {
    fn into_value(self) -> Value {
        Value::Record(self)
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Record(record) => Ok(record.clone()),
            other => Err(mismatch("record", other)),
        }
    }
}

/// Identity conversion, used by [crate::layout::DynParser].
impl FieldValue for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Padding> for Value {
    fn from(_: Padding) -> Self {
        Value::Padding
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
