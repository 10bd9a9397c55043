//! Fixed-size scalar parsers: char, bool, and 8/16/32/64-bit integers in both
//! byte orders.
//!
//! Only the buffer length is validated. Bit patterns are read back exactly as
//! stored, so every representable value round-trips.

use std::{fmt, marker::PhantomData};

use crate::{
    errors::Error,
    parser::{Parser, ensure_len},
};

/// Byte order used by [Int] to read and write multi-byte integers.
pub trait ByteOrder: Send + Sync + 'static {
    const NAME: &'static str;

    fn read<T: Integer>(bytes: &[u8]) -> T;

    fn write<T: Integer>(value: T, bytes: &mut [u8]);
}

/// Least significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LittleEndian;

/// Most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BigEndian;

impl ByteOrder for LittleEndian {
    const NAME: &'static str = "le";

    fn read<T: Integer>(bytes: &[u8]) -> T {
        T::read_le(bytes)
    }

    fn write<T: Integer>(value: T, bytes: &mut [u8]) {
        value.write_le(bytes)
    }
}

impl ByteOrder for BigEndian {
    const NAME: &'static str = "be";

    fn read<T: Integer>(bytes: &[u8]) -> T {
        T::read_be(bytes)
    }

    fn write<T: Integer>(value: T, bytes: &mut [u8]) {
        value.write_be(bytes)
    }
}

/// Primitive integer types [Int] can carry. Sealed to the eight std integers.
pub trait Integer: Copy + Default + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    const SIZE: usize;
    const NAME: &'static str;

    /// `bytes` is exactly [Integer::SIZE] long.
    fn read_le(bytes: &[u8]) -> Self;
    fn read_be(bytes: &[u8]) -> Self;
    fn write_le(self, bytes: &mut [u8]);
    fn write_be(self, bytes: &mut [u8]);
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Integer for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn read_be(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }

                #[inline]
                fn write_le(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn write_be(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_integer!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Integer of type `T` stored in byte order `O`.
pub struct Int<T, O> {
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T, O> Int<T, O> {
    pub const fn new() -> Self {
        Int {
            _marker: PhantomData,
        }
    }
}

impl<T, O> Clone for Int<T, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, O> Copy for Int<T, O> {}

impl<T, O> Default for Int<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integer, O: ByteOrder> fmt::Debug for Int<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int<{}, {}>", T::NAME, O::NAME)
    }
}

impl<T: Integer, O: ByteOrder> Parser for Int<T, O> {
    type Output = T;

    fn size(&self) -> usize {
        T::SIZE
    }

    fn parse(&self, buf: &[u8]) -> Result<T, Error> {
        ensure_len(buf.len(), T::SIZE)?;
        Ok(O::read(&buf[..T::SIZE]))
    }

    fn serialize_into(&self, value: Option<&T>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), T::SIZE)?;
        O::write(value.copied().unwrap_or_default(), &mut buf[..T::SIZE]);
        Ok(())
    }
}

pub type Int8 = Int<i8, LittleEndian>;
pub type UInt8 = Int<u8, LittleEndian>;
pub type Int16Le = Int<i16, LittleEndian>;
pub type Int16Be = Int<i16, BigEndian>;
pub type UInt16Le = Int<u16, LittleEndian>;
pub type UInt16Be = Int<u16, BigEndian>;
pub type Int32Le = Int<i32, LittleEndian>;
pub type Int32Be = Int<i32, BigEndian>;
pub type UInt32Le = Int<u32, LittleEndian>;
pub type UInt32Be = Int<u32, BigEndian>;
pub type Int64Le = Int<i64, LittleEndian>;
pub type Int64Be = Int<i64, BigEndian>;
pub type UInt64Le = Int<u64, LittleEndian>;
pub type UInt64Be = Int<u64, BigEndian>;

pub const INT8: Int8 = Int::new();
pub const UINT8: UInt8 = Int::new();
pub const INT16_LE: Int16Le = Int::new();
pub const INT16_BE: Int16Be = Int::new();
pub const UINT16_LE: UInt16Le = Int::new();
pub const UINT16_BE: UInt16Be = Int::new();
pub const INT32_LE: Int32Le = Int::new();
pub const INT32_BE: Int32Be = Int::new();
pub const UINT32_LE: UInt32Le = Int::new();
pub const UINT32_BE: UInt32Be = Int::new();
pub const INT64_LE: Int64Le = Int::new();
pub const INT64_BE: Int64Be = Int::new();
pub const UINT64_LE: UInt64Le = Int::new();
pub const UINT64_BE: UInt64Be = Int::new();

/// One byte read as a code point in U+0000..=U+00FF.
///
/// Serializing writes the low byte of the code point; characters above
/// U+00FF therefore do not survive a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharParser;

pub const CHAR: CharParser = CharParser;

impl Parser for CharParser {
    type Output = char;

    fn size(&self) -> usize {
        1
    }

    fn parse(&self, buf: &[u8]) -> Result<char, Error> {
        ensure_len(buf.len(), 1)?;
        Ok(char::from(buf[0]))
    }

    fn serialize_into(&self, value: Option<&char>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), 1)?;
        buf[0] = value.map_or(0, |c| *c as u32 as u8);
        Ok(())
    }
}

/// One byte, nonzero reads as `true`. Serializes `true` as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolParser;

pub const BOOL: BoolParser = BoolParser;

impl Parser for BoolParser {
    type Output = bool;

    fn size(&self) -> usize {
        1
    }

    fn parse(&self, buf: &[u8]) -> Result<bool, Error> {
        ensure_len(buf.len(), 1)?;
        Ok(buf[0] != 0)
    }

    fn serialize_into(&self, value: Option<&bool>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), 1)?;
        buf[0] = u8::from(value.copied().unwrap_or(false));
        Ok(())
    }
}
