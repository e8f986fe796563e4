//! Data segments attach payload bytes to a path: opaque 16-bit words for
//! connection parameters, or a length-prefixed ANSI symbol naming a tag.

use super::defs::{DataSegmentSubtype, SegmentType};
use crate::error::{ProtocolError, Result};
use crate::wire::{read_slice_at, read_u8_at};

/// Borrowed view over one data segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSegmentRef<'a> {
    buf: &'a [u8],
}

impl<'a> DataSegmentRef<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Data {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Data,
                found,
            });
        }
        Ok(Self { buf })
    }

    /// Raw bytes of the region this view covers.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    /// Subtype from the low header bits. Unassigned codes decode to
    /// `Reserved`, never to an error.
    #[inline]
    pub fn subtype(&self) -> DataSegmentSubtype {
        DataSegmentSubtype::from_byte(self.buf[0])
    }

    /// Word count byte of a simple data segment. The payload length in bytes
    /// is twice this value.
    pub fn simple_data_word_length(&self) -> Result<u8> {
        if self.subtype() != DataSegmentSubtype::SimpleData {
            return Err(ProtocolError::PreconditionViolated(
                "word length requires the simple data subtype",
            ));
        }
        read_u8_at(self.buf, 1)
    }

    /// Payload bytes of a simple data segment, two per word.
    pub fn simple_data(&self) -> Result<&'a [u8]> {
        let words = self.simple_data_word_length()? as usize;
        read_slice_at(self.buf, 2, words * 2)
    }

    /// Symbol bytes of an ANSI extended symbol segment, after the length
    /// byte that follows the header.
    pub fn ansi_symbol(&self) -> Result<&'a [u8]> {
        if self.subtype() != DataSegmentSubtype::AnsiExtendedSymbol {
            return Err(ProtocolError::PreconditionViolated(
                "symbol bytes require the ANSI extended symbol subtype",
            ));
        }
        let len = read_u8_at(self.buf, 1)? as usize;
        read_slice_at(self.buf, 2, len)
    }
}
