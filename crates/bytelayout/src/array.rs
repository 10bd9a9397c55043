//! Fixed-count arrays of one element parser laid out back to back.

use crate::{
    errors::Error,
    parser::{Parser, ensure_len},
};

/// `count` elements at stride `element.size()`. Element `i` occupies
/// `[i * stride, (i + 1) * stride)` and nothing else.
#[derive(Debug, Clone)]
pub struct ArrayParser<P> {
    count: usize,
    element: P,
}

impl<P: Parser> ArrayParser<P> {
    pub fn new(count: usize, element: P) -> Self {
        ArrayParser { count, element }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn element(&self) -> &P {
        &self.element
    }

    fn stride(&self) -> usize {
        self.element.size()
    }

    fn check_items(&self, items: &[P::Output]) -> Result<(), Error> {
        items
            .iter()
            .take(self.count)
            .try_for_each(|item| self.element.check(item))
    }
}

impl<P: Parser> Parser for ArrayParser<P> {
    type Output = Vec<P::Output>;

    /// Saturates on overflow so that no real buffer passes the length check.
    fn size(&self) -> usize {
        self.count.saturating_mul(self.stride())
    }

    fn parse(&self, buf: &[u8]) -> Result<Self::Output, Error> {
        ensure_len(buf.len(), self.size())?;

        let stride = self.stride();
        let mut values = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let offset = i * stride;
            values.push(self.element.parse(&buf[offset..offset + stride])?);
        }

        Ok(values)
    }

    /// Missing trailing elements are written as the element default; extra
    /// elements beyond `count` are ignored.
    fn serialize_into(&self, value: Option<&Self::Output>, buf: &mut [u8]) -> Result<(), Error> {
        ensure_len(buf.len(), self.size())?;

        let items = value.map_or(&[][..], Vec::as_slice);
        self.check_items(items)?;

        let stride = self.stride();
        for i in 0..self.count {
            let offset = i * stride;
            self.element
                .serialize_into(items.get(i), &mut buf[offset..offset + stride])?;
        }

        Ok(())
    }

    fn check(&self, value: &Self::Output) -> Result<(), Error> {
        self.check_items(value)
    }
}
