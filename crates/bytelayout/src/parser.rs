//! The [Parser] contract shared by every descriptor, and its type-erased
//! counterpart [FieldParser] used inside record layouts.

use std::fmt::Debug;

use crate::{
    errors::Error,
    value::{FieldValue, Value},
};

/// A fixed-size binary descriptor for one data type.
///
/// Implementations are immutable: they carry no per-call state, so one
/// descriptor can be shared by any number of threads parsing or serializing
/// different buffers at the same time.
pub trait Parser {
    /// Value produced by [Parser::parse] and consumed by [Parser::serialize_into].
    type Output;

    /// Number of bytes this descriptor reads and writes.
    fn size(&self) -> usize;

    /// Reads the first [Parser::size] bytes of `buf`.
    ///
    /// Fails with [Error::BufferTooSmall] if `buf` is shorter than the size.
    fn parse(&self, buf: &[u8]) -> Result<Self::Output, Error>;

    /// Writes `value` (or the type's default when `None`) into the first
    /// [Parser::size] bytes of `buf`. Bytes past the size are left untouched.
    fn serialize_into(&self, value: Option<&Self::Output>, buf: &mut [u8]) -> Result<(), Error>;

    /// Checks that `value` can be serialized. Composites that hold dynamic
    /// [Value]s override this so a bad value is reported before any write.
    fn check(&self, _value: &Self::Output) -> Result<(), Error> {
        Ok(())
    }

    /// Serializes into a freshly allocated, zero-filled buffer of exactly [Parser::size] bytes.
    fn serialize(&self, value: Option<&Self::Output>) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; self.size()];
        self.serialize_into(value, &mut buf)?;
        Ok(buf)
    }
}

/// Object-safe view of a [Parser] that speaks [Value] instead of its concrete output.
///
/// Struct composites store their fields as `Arc<dyn FieldParser>`. Every
/// [Parser] whose output implements [FieldValue] gets this for free.
pub trait FieldParser: Debug + Send + Sync {
    /// Same as [Parser::size]; named apart so both traits can be in scope.
    fn field_size(&self) -> usize;

    /// True for descriptors that only reserve space (see [crate::padding::PaddingParser]).
    fn is_padding(&self) -> bool;

    fn parse_value(&self, buf: &[u8]) -> Result<Value, Error>;

    /// Checks that `value` can be written by this field without touching any buffer.
    fn check_value(&self, value: &Value) -> Result<(), Error>;

    fn serialize_value(&self, value: Option<&Value>, buf: &mut [u8]) -> Result<(), Error>;
}

impl<P> FieldParser for P
where
    P: Parser + Debug + Send + Sync,
    P::Output: FieldValue,
{
    fn field_size(&self) -> usize {
        self.size()
    }

    fn is_padding(&self) -> bool {
        P::Output::PADDING
    }

    fn parse_value(&self, buf: &[u8]) -> Result<Value, Error> {
        Ok(self.parse(buf)?.into_value())
    }

    fn check_value(&self, value: &Value) -> Result<(), Error> {
        self.check(&P::Output::from_value(value)?)
    }

    fn serialize_value(&self, value: Option<&Value>, buf: &mut [u8]) -> Result<(), Error> {
        let typed = value.map(P::Output::from_value).transpose()?;
        self.serialize_into(typed.as_ref(), buf)
    }
}

/// Fails with [Error::BufferTooSmall] unless `actual >= needed`.
#[inline]
pub fn ensure_len(actual: usize, needed: usize) -> Result<(), Error> {
    if actual < needed {
        return Err(Error::BufferTooSmall { needed, actual });
    }

    Ok(())
}
