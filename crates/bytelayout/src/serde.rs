//! JSON‑deserializable layout description.
//!
//! These types describe the *shape* of a fixed binary record. They are meant
//! to be loaded from JSON (for example a format description shipped with your
//! application) and compiled into a [crate::layout::DynParser].
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "magic", "layout": { "type": "UInt32Be" } },
//!     { "name": "", "layout": { "type": "Padding", "size": 2 } },
//!     { "name": "label", "layout": { "type": "CString", "size": 8 } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top‑level layout: an ordered struct.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LayoutDef {
    /// Fields in declaration order; offsets are derived from it.
    pub fields: Vec<FieldDef>,
}

/// One declaration of an ordered struct.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Key in the parsed record. Ignored for padding.
    #[serde(default)]
    pub name: String,
    pub layout: TypeDef,
}

/// One field of an offset‑indexed struct.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct IndexedFieldDef {
    pub name: String,
    /// Byte offset from the start of the record.
    pub offset: usize,
    pub layout: TypeDef,
}

/// Data type of a field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TypeDef {
    Char,
    Bool,
    Int8,
    UInt8,
    Int16Le,
    Int16Be,
    UInt16Le,
    UInt16Be,
    Int32Le,
    Int32Be,
    UInt32Le,
    UInt32Be,
    Int64Le,
    Int64Be,
    UInt64Le,
    UInt64Be,
    /// Null‑terminated string in a field of `size` bytes.
    CString { size: usize },
    /// `size` reserved bytes.
    Padding { size: usize },
    /// `count` back‑to‑back copies of `element`.
    Array { count: usize, element: Box<TypeDef> },
    /// Nested ordered struct.
    Struct { fields: Vec<FieldDef> },
    /// Nested struct with explicit offsets.
    Indexed {
        size: usize,
        fields: Vec<IndexedFieldDef>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::LayoutError,
        layout::DynParser,
        parser::Parser,
        value::{Record, Value},
    };

    const HEADER: &str = r#"{
        "fields": [
            { "name": "magic", "layout": { "type": "UInt16Be" } },
            { "layout": { "type": "Padding", "size": 2 } },
            { "name": "label", "layout": { "type": "CString", "size": 4 } },
            { "name": "samples", "layout": { "type": "Array", "count": 2, "element": { "type": "Int8" } } },
            {
                "name": "flags",
                "layout": {
                    "type": "Indexed",
                    "size": 2,
                    "fields": [
                        { "name": "hi", "offset": 1, "layout": { "type": "Bool" } },
                        { "name": "lo", "offset": 0, "layout": { "type": "Bool" } }
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_def() {
        let def: LayoutDef = serde_json::from_str(HEADER).unwrap();
        assert_eq!(def.fields.len(), 5);
        assert_eq!(def.fields[1].name, "");
        assert_eq!(def.fields[1].layout, TypeDef::Padding { size: 2 });
    }

    #[test]
    fn test_compile_and_parse() {
        let parser = DynParser::from_json(HEADER).unwrap();
        assert_eq!(parser.size(), 12);

        let data = [0xCA, 0xFE, 0xEE, 0xEE, b'a', b'b', 0, 0, 0xFF, 0x01, 0x00, 0x01];
        let parsed = parser.parse(&data).unwrap();

        let expected = Value::Record(Record::from([
            ("magic".to_string(), Value::U16(0xCAFE)),
            ("label".to_string(), Value::String("ab".into())),
            (
                "samples".to_string(),
                Value::Array(vec![Value::I8(-1), Value::I8(1)]),
            ),
            (
                "flags".to_string(),
                Value::Record(Record::from([
                    ("hi".to_string(), Value::Bool(true)),
                    ("lo".to_string(), Value::Bool(false)),
                ])),
            ),
        ]));
        assert_eq!(parsed, expected);

        let mut out = [0xEE; 12];
        parser.serialize_into(Some(&parsed), &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_invalid_json() {
        let err = DynParser::from_json(r#"{ "fields": [ { "layout": { "type": "Float" } } ] }"#)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Json(_)));
    }

    #[test]
    fn test_invalid_layout() {
        let json = r#"{ "fields": [ { "name": "x", "layout": {
            "type": "Indexed", "size": 1,
            "fields": [ { "name": "a", "offset": 0, "layout": { "type": "UInt16Le" } } ]
        } } ] }"#;
        assert_eq!(
            DynParser::from_json(json).unwrap_err(),
            LayoutError::FieldOutOfBounds {
                name: "a".to_string(),
                offset: 0,
                len: 2,
                size: 1
            }
        );
    }

    #[test]
    fn test_value_json_round_trip() {
        let value = Value::Record(Record::from([("a".to_string(), Value::U16(3))]));
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
