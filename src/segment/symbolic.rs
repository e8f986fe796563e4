//! Symbolic segments carry a symbol in line. A nonzero size field in the
//! header means that many ASCII bytes follow; size zero switches to the
//! extended string form, whose next byte selects wider character sets or a
//! numeric symbol.

use super::defs::{
    SegmentType, SymbolicSegmentExtendedFormat, SymbolicSegmentFormat, SYMBOL_SIZE_MASK,
};
use crate::error::{ProtocolError, Result};
use crate::wire::{read_slice_at, read_u8_at};

/// Borrowed view over one symbolic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolicSegmentRef<'a> {
    buf: &'a [u8],
}

impl<'a> SymbolicSegmentRef<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Symbolic {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Symbolic,
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

    /// Symbol size field of the header; zero selects the extended string
    /// format.
    #[inline]
    pub fn symbol_size(&self) -> u8 {
        self.buf[0] & SYMBOL_SIZE_MASK
    }

    /// Format of this segment, decided by the size field.
    #[inline]
    pub fn format(&self) -> SymbolicSegmentFormat {
        if self.symbol_size() == 0 {
            SymbolicSegmentFormat::ExtendedString
        } else {
            SymbolicSegmentFormat::Ascii
        }
    }

    /// ASCII symbol bytes following the header.
    pub fn ascii_symbol(&self) -> Result<&'a [u8]> {
        let size = self.symbol_size() as usize;
        if size == 0 {
            return Err(ProtocolError::PreconditionViolated(
                "an extended string segment carries no in-line ASCII symbol",
            ));
        }
        read_slice_at(self.buf, 1, size)
    }

    /// Extended format byte of an extended string segment.
    pub fn extended_format(&self) -> Result<SymbolicSegmentExtendedFormat> {
        if self.format() != SymbolicSegmentFormat::ExtendedString {
            return Err(ProtocolError::PreconditionViolated(
                "extended format requires the extended string form",
            ));
        }
        Ok(SymbolicSegmentExtendedFormat::from_byte(read_u8_at(
            self.buf, 1,
        )?))
    }

    /// Numeric type field of the extended format byte, for callers that
    /// already know the symbol is numeric.
    pub fn numeric_type(&self) -> Result<SymbolicSegmentExtendedFormat> {
        if self.format() != SymbolicSegmentFormat::ExtendedString {
            return Err(ProtocolError::PreconditionViolated(
                "numeric type requires the extended string form",
            ));
        }
        Ok(SymbolicSegmentExtendedFormat::from_numeric_bits(read_u8_at(
            self.buf, 1,
        )?))
    }
}
