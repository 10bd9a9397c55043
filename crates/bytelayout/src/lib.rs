//! # bytelayout
//!
//! Fixed-size binary layout descriptors. A [Parser] knows its byte size and
//! how to parse the first `size` bytes of a buffer into a value and serialize
//! a value back into them.
//!
//! Scalars (chars, bools, integers in either byte order) come from
//! [primitive]. They compose into arrays ([array::ArrayParser]), records at
//! explicit offsets ([indexed::IndexedStructParser]), packed records with
//! derived offsets and padding ([structure::StructParser]), and
//! null-terminated strings ([cstring::CStringParser]).
//!
//! ## Example
//!
//! ```
//! use bytelayout::parser::Parser;
//! use bytelayout::primitive::{UINT8, UINT16_LE};
//! use bytelayout::structure::StructParser;
//! use bytelayout::value::Value;
//!
//! let layout = StructParser::builder()
//!     .field("a", UINT8)
//!     .padding(2)
//!     .field("b", UINT16_LE)
//!     .build()
//!     .unwrap();
//!
//! let record = layout.parse(&[0x05, 0xFF, 0xFF, 0x34, 0x12]).unwrap();
//! assert_eq!(record.get("a"), Some(&Value::U8(5)));
//! assert_eq!(record.get("b"), Some(&Value::U16(0x1234)));
//! ```

pub mod array;
pub mod cstring;
pub mod errors;
pub mod indexed;
pub mod layout;
pub mod padding;
pub mod parser;
pub mod primitive;
#[cfg(feature = "serde")]
pub mod serde;
pub mod structure;
pub mod value;

pub use errors::{Error, LayoutError};
pub use parser::{FieldParser, Parser};
