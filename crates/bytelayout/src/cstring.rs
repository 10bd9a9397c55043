//! Null-terminated strings stored in a fixed-size byte field.
//!
//! Every byte is one character code (U+0000..=U+00FF). Serializing always
//! zero-fills the field after the text and silently truncates text longer
//! than the field, in which case no terminator is written. Parsing accepts
//! such an unterminated field and returns all of it.

use crate::{
    errors::Error,
    parser::{Parser, ensure_len},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CStringParser {
    size: usize,
}

impl CStringParser {
    pub fn new(size: usize) -> Self {
        CStringParser { size }
    }
}

impl Parser for CStringParser {
    type Output = String;

    fn size(&self) -> usize {
        self.size
    }

    fn parse(&self, buf: &[u8]) -> Result<String, Error> {
        ensure_len(buf.len(), self.size)?;

        Ok(buf[..self.size]
            .iter()
            .take_while(|b| **b != 0)
            .map(|b| char::from(*b))
            .collect())
    }

    fn serialize_into(&self, value: Option<&String>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), self.size)?;

        let field = &mut buf[..self.size];
        field.fill(0);

        let text = value.map_or("", String::as_str);
        let codes = text
            .chars()
            .take_while(|c| *c != '\0')
            .map(|c| c as u32 as u8);

        for (slot, code) in field.iter_mut().zip(codes) {
            *slot = code;
        }

        Ok(())
    }
}
