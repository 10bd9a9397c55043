//! Error types for layout construction and for parsing/serializing buffers.

use thiserror::Error;

/// Errors produced by [crate::parser::Parser::parse] and
/// [crate::parser::Parser::serialize_into].
///
/// A failing call never writes a partial result: length and value checks run
/// before any byte of the target buffer is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer is shorter than the parser's declared size.
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
    /// A dynamic [crate::value::Value] does not fit the field it was given for.
    #[error("value mismatch: expected {expected}, found {found}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors produced when building a composite parser or compiling a layout definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Field range `[offset, offset + len)` reaches past the composite's size.
    #[error("field `{name}` at offset {offset} with length {len} exceeds layout size {size}")]
    FieldOutOfBounds {
        name: String,
        offset: usize,
        len: usize,
        size: usize,
    },
    /// Two fields were registered under the same name.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    #[error("field name is empty")]
    EmptyFieldName,
    /// Layout definition could not be deserialized.
    #[error("invalid layout definition: {0}")]
    Json(String),
}
