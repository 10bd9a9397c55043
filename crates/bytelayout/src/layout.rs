//! Runtime layouts whose shape is only known at run time.
//!
//! [DynParser] wraps any [FieldParser] and exposes it as a [Parser] over
//! [Value]. With the `serde` feature it can also be compiled from a JSON
//! layout definition (see [crate::serde]).

use std::sync::Arc;

use crate::{
    errors::Error,
    parser::{FieldParser, Parser},
    value::Value,
};

/// Type-erased parser producing [Value]s.
#[derive(Debug, Clone)]
pub struct DynParser {
    inner: Arc<dyn FieldParser>,
}

impl DynParser {
    pub fn new(parser: impl FieldParser + 'static) -> Self {
        DynParser {
            inner: Arc::new(parser),
        }
    }

    pub fn from_arc(inner: Arc<dyn FieldParser>) -> Self {
        DynParser { inner }
    }

    /// The wrapped field parser, e.g. to register it in a struct layout.
    pub fn as_field(&self) -> Arc<dyn FieldParser> {
        Arc::clone(&self.inner)
    }
}

impl Parser for DynParser {
    type Output = Value;

    fn size(&self) -> usize {
        self.inner.field_size()
    }

    fn parse(&self, buf: &[u8]) -> Result<Value, Error> {
        self.inner.parse_value(buf)
    }

    fn serialize_into(&self, value: Option<&Value>, buf: &mut [u8]) -> Result<(), Error> {
        self.inner.serialize_value(value, buf)
    }

    fn check(&self, value: &Value) -> Result<(), Error> {
        self.inner.check_value(value)
    }
}

#[cfg(feature = "serde")]
mod compile {
    use std::sync::Arc;

    use tracing::debug;

    use super::DynParser;
    use crate::{
        array::ArrayParser,
        cstring::CStringParser,
        errors::LayoutError,
        indexed::IndexedStructParser,
        padding::PaddingParser,
        parser::FieldParser,
        primitive::*,
        serde::{LayoutDef, TypeDef},
        structure::StructParser,
    };

    /// Compiles one definition. Returns the erased parser directly so that
    /// padding stays recognisable inside struct declarations.
    pub(super) fn compile(def: TypeDef) -> Result<Arc<dyn FieldParser>, LayoutError> {
        let parser: Arc<dyn FieldParser> = match def {
            TypeDef::Char => Arc::new(CHAR),
            TypeDef::Bool => Arc::new(BOOL),
            TypeDef::Int8 => Arc::new(INT8),
            TypeDef::UInt8 => Arc::new(UINT8),
            TypeDef::Int16Le => Arc::new(INT16_LE),
            TypeDef::Int16Be => Arc::new(INT16_BE),
            TypeDef::UInt16Le => Arc::new(UINT16_LE),
            TypeDef::UInt16Be => Arc::new(UINT16_BE),
            TypeDef::Int32Le => Arc::new(INT32_LE),
            TypeDef::Int32Be => Arc::new(INT32_BE),
            TypeDef::UInt32Le => Arc::new(UINT32_LE),
            TypeDef::UInt32Be => Arc::new(UINT32_BE),
            TypeDef::Int64Le => Arc::new(INT64_LE),
            TypeDef::Int64Be => Arc::new(INT64_BE),
            TypeDef::UInt64Le => Arc::new(UINT64_LE),
            TypeDef::UInt64Be => Arc::new(UINT64_BE),
            TypeDef::CString { size } => Arc::new(CStringParser::new(size)),
            TypeDef::Padding { size } => Arc::new(PaddingParser::new(size)),
            TypeDef::Array { count, element } => {
                let element = DynParser::from_arc(compile(*element)?);
                Arc::new(ArrayParser::new(count, element))
            }
            TypeDef::Struct { fields } => {
                let mut builder = StructParser::builder();
                for field in fields {
                    builder = builder.field_arc(field.name, compile(field.layout)?);
                }
                Arc::new(builder.build()?)
            }
            TypeDef::Indexed { size, fields } => {
                let mut builder = IndexedStructParser::builder(size);
                for field in fields {
                    builder = builder.field_arc(field.name, field.offset, compile(field.layout)?);
                }
                Arc::new(builder.build()?)
            }
        };

        Ok(parser)
    }

    impl TryFrom<TypeDef> for DynParser {
        type Error = LayoutError;

        fn try_from(value: TypeDef) -> Result<Self, Self::Error> {
            compile(value).map(DynParser::from_arc)
        }
    }

    impl TryFrom<LayoutDef> for DynParser {
        type Error = LayoutError;

        fn try_from(value: LayoutDef) -> Result<Self, Self::Error> {
            DynParser::try_from(TypeDef::Struct {
                fields: value.fields,
            })
        }
    }

    impl DynParser {
        /// Compiles a JSON [LayoutDef] (a top-level ordered struct).
        pub fn from_json(json: &str) -> Result<Self, LayoutError> {
            let def: LayoutDef = serde_json::from_str(json).map_err(|err| {
                debug!(error = %err, "layout definition rejected");
                LayoutError::Json(err.to_string())
            })?;
            DynParser::try_from(def)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        padding::PaddingParser,
        primitive::UINT16_BE,
        structure::StructParser,
        value::Record,
    };

    #[test]
    fn test_wraps_primitive() {
        let parser = DynParser::new(UINT16_BE);
        assert_eq!(parser.size(), 2);
        assert_eq!(parser.parse(&[0x01, 0x02]).unwrap(), Value::U16(0x0102));
        assert_eq!(
            parser.serialize(Some(&Value::U8(7))).unwrap(),
            vec![0x00, 0x07]
        );
    }

    #[test]
    fn test_wraps_struct() {
        let layout = StructParser::builder()
            .field("a", UINT16_BE)
            .build()
            .unwrap();
        let parser = DynParser::new(layout);
        assert_eq!(
            parser.parse(&[0, 1]).unwrap(),
            Value::Record(Record::from([("a".to_string(), Value::U16(1))]))
        );
        assert_eq!(
            parser.check(&Value::Bool(true)),
            Err(Error::ValueMismatch {
                expected: "record",
                found: "bool"
            })
        );
    }

    #[test]
    fn test_as_field_keeps_padding() {
        let parser = DynParser::new(PaddingParser::new(2));
        assert!(parser.as_field().is_padding());
    }
}
