//! Records whose fields sit at explicit byte offsets.
//!
//! [IndexedStructParser] is the general engine behind every record layout:
//! [crate::structure::StructParser] only derives the offsets and hands them
//! over. Offsets are arbitrary, fields may overlap, and each field is read
//! and written through its own sub-slice `[offset, offset + size)`.

use std::{collections::HashSet, sync::Arc};

use tracing::debug;

use crate::{
    errors::{Error, LayoutError},
    parser::{FieldParser, Parser, ensure_len},
    value::Record,
};

/// One named field of a record layout.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    /// Key in the parsed [Record].
    pub name: String,
    /// Byte offset from the start of the record.
    pub offset: usize,
    pub parser: Arc<dyn FieldParser>,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, offset: usize, parser: impl FieldParser + 'static) -> Self {
        FieldEntry {
            name: name.into(),
            offset,
            parser: Arc::new(parser),
        }
    }

    fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.parser.field_size()
    }
}

/// Record layout built from explicit `(name, offset, parser)` entries.
///
/// Fields are visited in registration order. Where ranges overlap, the field
/// registered last wins on serialize.
#[derive(Debug, Clone)]
pub struct IndexedStructParser {
    size: usize,
    fields: Arc<[FieldEntry]>,
}

impl IndexedStructParser {
    /// Validates `fields` against `size`: every field must end within the
    /// record and names must be non-empty and unique.
    pub fn new(size: usize, fields: Vec<FieldEntry>) -> Result<Self, LayoutError> {
        let mut seen = HashSet::with_capacity(fields.len());

        for field in &fields {
            if field.name.is_empty() {
                debug!("rejecting indexed layout: empty field name");
                return Err(LayoutError::EmptyFieldName);
            }

            if !seen.insert(field.name.as_str()) {
                debug!(field = %field.name, "rejecting indexed layout: duplicate field");
                return Err(LayoutError::DuplicateField(field.name.clone()));
            }

            let len = field.parser.field_size();
            if field
                .offset
                .checked_add(len)
                .is_none_or(|end| end > size)
            {
                debug!(
                    field = %field.name,
                    offset = field.offset,
                    len,
                    size,
                    "rejecting indexed layout: field out of bounds"
                );
                return Err(LayoutError::FieldOutOfBounds {
                    name: field.name.clone(),
                    offset: field.offset,
                    len,
                    size,
                });
            }
        }

        Ok(IndexedStructParser {
            size,
            fields: fields.into(),
        })
    }

    pub fn builder(size: usize) -> IndexedStructBuilder {
        IndexedStructBuilder {
            size,
            fields: Vec::new(),
        }
    }

    /// Fields in registration order.
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|field| field.offset)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

impl Parser for IndexedStructParser {
    type Output = Record;

    fn size(&self) -> usize {
        self.size
    }

    fn parse(&self, buf: &[u8]) -> Result<Record, Error> {
        ensure_len(buf.len(), self.size)?;

        let mut record = Record::new();
        for field in self.fields.iter() {
            let value = field.parser.parse_value(&buf[field.range()])?;
            record.insert(field.name.clone(), value);
        }

        Ok(record)
    }

    /// Fields missing from `value` are written as their default; keys not in
    /// the layout are ignored.
    fn serialize_into(&self, value: Option<&Record>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), self.size)?;

        if let Some(record) = value {
            self.check(record)?;
        }

        for field in self.fields.iter() {
            let field_value = value.and_then(|record| record.get(&field.name));
            field
                .parser
                .serialize_value(field_value, &mut buf[field.range()])?;
        }

        Ok(())
    }

    fn check(&self, value: &Record) -> Result<(), Error> {
        for field in self.fields.iter() {
            if let Some(field_value) = value.get(&field.name) {
                field.parser.check_value(field_value)?;
            }
        }

        Ok(())
    }
}

/// Collects `(name, offset, parser)` entries for [IndexedStructParser].
#[derive(Debug)]
pub struct IndexedStructBuilder {
    size: usize,
    fields: Vec<FieldEntry>,
}

impl IndexedStructBuilder {
    pub fn field(
        mut self,
        name: impl Into<String>,
        offset: usize,
        parser: impl FieldParser + 'static,
    ) -> Self {
        self.fields.push(FieldEntry::new(name, offset, parser));
        self
    }

    /// Registers an already shared field parser.
    pub fn field_arc(
        mut self,
        name: impl Into<String>,
        offset: usize,
        parser: Arc<dyn FieldParser>,
    ) -> Self {
        self.fields.push(FieldEntry {
            name: name.into(),
            offset,
            parser,
        });
        self
    }

    pub fn build(self) -> Result<IndexedStructParser, LayoutError> {
        IndexedStructParser::new(self.size, self.fields)
    }
}
