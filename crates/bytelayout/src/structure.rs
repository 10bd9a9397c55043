//! Packed records declared as an ordered list of fields.
//!
//! Offsets are derived once at build time by walking the declarations in
//! order and summing sizes. Padding declarations advance the offset but do
//! not appear in the record. Reordering declarations changes the layout.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    errors::{Error, LayoutError},
    indexed::{FieldEntry, IndexedStructParser},
    padding::PaddingParser,
    parser::{FieldParser, Parser},
    value::Record,
};

/// Record layout with offsets derived from declaration order.
///
/// Parses and serializes exactly like the [IndexedStructParser] it wraps.
#[derive(Debug, Clone)]
pub struct StructParser {
    inner: IndexedStructParser,
}

impl StructParser {
    pub fn builder() -> StructBuilder {
        StructBuilder::default()
    }

    /// Builds a layout from `(name, parser)` declarations in order.
    pub fn new<N: Into<String>>(
        declarations: impl IntoIterator<Item = (N, Arc<dyn FieldParser>)>,
    ) -> Result<Self, LayoutError> {
        declarations
            .into_iter()
            .fold(StructBuilder::default(), |builder, (name, parser)| {
                builder.field_arc(name, parser)
            })
            .build()
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.inner.offset_of(name)
    }

    /// Names of the non-padding fields in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.inner.field_names()
    }

    pub fn fields(&self) -> &[FieldEntry] {
        self.inner.fields()
    }

    /// The derived offset-indexed layout.
    pub fn as_indexed(&self) -> &IndexedStructParser {
        &self.inner
    }
}

impl From<StructParser> for IndexedStructParser {
    fn from(value: StructParser) -> Self {
        value.inner
    }
}

impl Parser for StructParser {
    type Output = Record;

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn parse(&self, buf: &[u8]) -> Result<Record, Error> {
        self.inner.parse(buf)
    }

    fn serialize_into(&self, value: Option<&Record>, buf: &mut [u8]) -> Result<(), Error> {
        self.inner.serialize_into(value, buf)
    }

    fn check(&self, value: &Record) -> Result<(), Error> {
        self.inner.check(value)
    }
}

/// Ordered field declarations for [StructParser].
#[derive(Debug, Default)]
pub struct StructBuilder {
    declarations: Vec<(String, Arc<dyn FieldParser>)>,
}

impl StructBuilder {
    /// Declares the next field. A [PaddingParser] given here is treated
    /// exactly like [StructBuilder::padding] and `name` is dropped.
    pub fn field(self, name: impl Into<String>, parser: impl FieldParser + 'static) -> Self {
        self.field_arc(name, Arc::new(parser))
    }

    pub fn field_arc(mut self, name: impl Into<String>, parser: Arc<dyn FieldParser>) -> Self {
        self.declarations.push((name.into(), parser));
        self
    }

    /// Reserves `size` unnamed bytes at the current position.
    pub fn padding(self, size: usize) -> Self {
        self.field_arc(String::new(), Arc::new(PaddingParser::new(size)))
    }

    pub fn build(self) -> Result<StructParser, LayoutError> {
        let mut offset = 0usize;
        let mut fields = Vec::with_capacity(self.declarations.len());

        for (name, parser) in self.declarations {
            let len = parser.field_size();
            let Some(end) = offset.checked_add(len) else {
                debug!(field = %name, offset, len, "rejecting struct layout: size overflows");
                return Err(LayoutError::FieldOutOfBounds {
                    name,
                    offset,
                    len,
                    size: usize::MAX,
                });
            };

            if !parser.is_padding() {
                trace!(field = %name, offset, len, "struct field");
                fields.push(FieldEntry {
                    name,
                    offset,
                    parser,
                });
            } else {
                trace!(offset, len, "struct padding");
            }

            offset = end;
        }

        trace!(size = offset, fields = fields.len(), "struct layout derived");

        Ok(StructParser {
            inner: IndexedStructParser::new(offset, fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        array::ArrayParser,
        cstring::CStringParser,
        primitive::{UINT8, UINT16_BE, UINT16_LE, UINT32_BE},
        value::Value,
    };

    fn padded() -> StructParser {
        StructParser::builder()
            .field("a", UINT8)
            .padding(2)
            .field("b", UINT16_LE)
            .build()
            .unwrap()
    }

    #[test]
    fn test_derived_offsets() {
        let layout = padded();
        assert_eq!(layout.size(), 5);
        assert_eq!(layout.offset_of("a"), Some(0));
        assert_eq!(layout.offset_of("b"), Some(3));
        assert_eq!(layout.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_skips_padding() {
        let record = padded().parse(&[0x05, 0xFF, 0xFF, 0x34, 0x12]).unwrap();
        assert_eq!(
            record,
            Record::from([
                ("a".to_string(), Value::U8(5)),
                ("b".to_string(), Value::U16(0x1234)),
            ])
        );
    }

    #[test]
    fn test_serialize_leaves_padding_untouched() {
        let record = Record::from([
            ("a".to_string(), Value::U8(5)),
            ("b".to_string(), Value::U16(0x1234)),
        ]);
        let mut buf = [0xAB; 5];
        padded().serialize_into(Some(&record), &mut buf).unwrap();
        assert_eq!(buf, [0x05, 0xAB, 0xAB, 0x34, 0x12]);
    }

    #[test]
    fn test_padding_declared_as_field() {
        let layout = StructParser::builder()
            .field("a", UINT8)
            .field("reserved", PaddingParser::new(1))
            .field("b", UINT8)
            .build()
            .unwrap();
        assert_eq!(layout.size(), 3);
        assert_eq!(layout.offset_of("reserved"), None);
        assert_eq!(layout.offset_of("b"), Some(2));
        assert!(!layout.parse(&[1, 2, 3]).unwrap().contains_key("reserved"));
    }

    #[test]
    fn test_declaration_order_defines_layout() {
        let ab = StructParser::builder()
            .field("a", UINT8)
            .field("b", UINT16_BE)
            .build()
            .unwrap();
        let ba = StructParser::builder()
            .field("b", UINT16_BE)
            .field("a", UINT8)
            .build()
            .unwrap();

        let data = [1, 2, 3];
        assert_eq!(ab.parse(&data).unwrap().get("a"), Some(&Value::U8(1)));
        assert_eq!(ba.parse(&data).unwrap().get("a"), Some(&Value::U8(3)));
    }

    #[test]
    fn test_nested() {
        let point = StructParser::builder()
            .field("x", UINT8)
            .field("y", UINT8)
            .build()
            .unwrap();
        let shape = StructParser::builder()
            .field("id", UINT32_BE)
            .field("name", CStringParser::new(4))
            .field("points", ArrayParser::new(2, point))
            .build()
            .unwrap();

        assert_eq!(shape.size(), 12);
        assert_eq!(shape.offset_of("points"), Some(8));

        let data = [0, 0, 0, 9, b't', b'r', b'i', 0, 1, 2, 3, 4];
        let record = shape.parse(&data).unwrap();
        assert_eq!(record.get("id"), Some(&Value::U32(9)));
        assert_eq!(record.get("name"), Some(&Value::String("tri".into())));

        let points = record.get("points").and_then(Value::as_array).unwrap();
        assert_eq!(
            points[1],
            Value::Record(Record::from([
                ("x".to_string(), Value::U8(3)),
                ("y".to_string(), Value::U8(4)),
            ]))
        );

        assert_eq!(shape.serialize(Some(&record)).unwrap(), data.to_vec());
    }

    #[test]
    fn test_from_declarations() {
        let layout = StructParser::new([
            ("a", Arc::new(UINT8) as Arc<dyn FieldParser>),
            ("pad", Arc::new(PaddingParser::new(3)) as Arc<dyn FieldParser>),
            ("b", Arc::new(UINT8) as Arc<dyn FieldParser>),
        ])
        .unwrap();
        assert_eq!(layout.size(), 5);
        assert_eq!(layout.offset_of("b"), Some(4));
    }

    #[test]
    fn test_duplicate_field() {
        let err = StructParser::builder()
            .field("a", UINT8)
            .field("a", UINT8)
            .build()
            .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_size_overflow_rejected() {
        let err = StructParser::builder()
            .padding(usize::MAX)
            .field("a", UINT8)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::FieldOutOfBounds {
                name: "a".to_string(),
                offset: usize::MAX,
                len: 1,
                size: usize::MAX,
            }
        );
    }

    #[test]
    fn test_empty_struct() {
        let layout = StructParser::builder().build().unwrap();
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.parse(&[]).unwrap(), Record::new());
    }

    #[test]
    fn test_only_padding() {
        let layout = StructParser::builder().padding(4).build().unwrap();
        assert_eq!(layout.size(), 4);
        assert_eq!(layout.parse(&[1, 2, 3, 4]).unwrap(), Record::new());
    }
}
