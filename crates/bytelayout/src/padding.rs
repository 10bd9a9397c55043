//! Reserved, content-free byte ranges inside struct layouts.

use crate::{
    errors::Error,
    parser::{Parser, ensure_len},
    value::Padding,
};

/// Reserves `size` bytes. Parses to [Padding] whatever the bytes hold and
/// never writes on serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingParser {
    size: usize,
}

impl PaddingParser {
    pub fn new(size: usize) -> Self {
        PaddingParser { size }
    }
}

impl Parser for PaddingParser {
    type Output = Padding;

    fn size(&self) -> usize {
        self.size
    }

    fn parse(&self, buf: &[u8]) -> Result<Padding, Error> {
        ensure_len(buf.len(), self.size)?;
        Ok(Padding)
    }

    fn serialize_into(&self, _value: Option<&Padding>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), self.size)
    }
}
