//! Network segments carry hop-local transport parameters, selected by a
//! sparse subtype table in the low five header bits.
//!
//! Only the two production inhibit timers have an accessor surface here;
//! the other subtypes are recognized but their payloads stay opaque. The
//! millisecond timer is a single byte after the header. The microsecond
//! form carries a data-words byte (always 2 on a well-formed wire) before
//! its 32-bit value:
//!
//! ```text
//!      | 0x50 | words | microseconds LE |
//! bytes|   1  |   1   |        4        |
//! ```

use super::defs::{NetworkSegmentSubtype, SegmentType, NETWORK_PIT_US_DATA_WORDS, SUBTYPE_MASK};
use crate::error::{ProtocolError, Result};
use crate::wire::{read_u32_le_at, read_u8_at, write_u8_at};
use tracing::warn;

/// Borrowed view over one network segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSegmentRef<'a> {
    buf: &'a [u8],
}

impl<'a> NetworkSegmentRef<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Network {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Network,
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
    pub fn subtype(&self) -> NetworkSegmentSubtype {
        NetworkSegmentSubtype::from_byte(self.buf[0])
    }

    /// Production inhibit time in milliseconds, the byte after the header.
    pub fn production_inhibit_time_ms(&self) -> Result<u8> {
        if self.subtype() != NetworkSegmentSubtype::ProductionInhibitTimeMs {
            return Err(ProtocolError::PreconditionViolated(
                "millisecond inhibit time requires the millisecond timer subtype",
            ));
        }
        read_u8_at(self.buf, 1)
    }

    /// Production inhibit time in microseconds, the 32-bit value after the
    /// data-words byte.
    ///
    /// A deviating data-words byte is logged and the value is still read;
    /// senders that get the constant wrong usually carry a correct payload.
    pub fn production_inhibit_time_us(&self) -> Result<u32> {
        if self.subtype() != NetworkSegmentSubtype::ProductionInhibitTimeUs {
            return Err(ProtocolError::PreconditionViolated(
                "microsecond inhibit time requires the microsecond timer subtype",
            ));
        }
        let words = read_u8_at(self.buf, 1)?;
        if words != NETWORK_PIT_US_DATA_WORDS {
            warn!(
                "microsecond inhibit time segment with data words {}, expected {}",
                words, NETWORK_PIT_US_DATA_WORDS
            );
        }
        read_u32_le_at(self.buf, 2)
    }
}

/// Mutable view over one network segment.
#[derive(Debug, PartialEq, Eq)]
pub struct NetworkSegmentMut<'a> {
    buf: &'a mut [u8],
}

impl<'a> NetworkSegmentMut<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a mut [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Network {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Network,
                found,
            });
        }
        Ok(Self { buf })
    }

    /// Read-only view of the same region.
    pub fn view(&self) -> NetworkSegmentRef<'_> {
        NetworkSegmentRef { buf: self.buf }
    }

    /// Write the subtype code, preserving the tag bits.
    ///
    /// Reserved subtypes have no code of their own and are refused.
    pub fn set_subtype(&mut self, subtype: NetworkSegmentSubtype) -> Result<()> {
        let code = subtype
            .to_code()
            .ok_or(ProtocolError::UnencodableValue("reserved network subtype"))?;
        let b = self.buf[0] & !SUBTYPE_MASK;
        write_u8_at(self.buf, 0, b | code)
    }
}
