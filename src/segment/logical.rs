//! Logical segments address an object by class, instance, attribute or one
//! of the other assigned identifier spaces.
//!
//! ```text
//!      |  7 6 5  |    4 3 2     |   1 0    |
//!      | tag 001 | logical type |  format  |
//! ```
//!
//! The format bits select the value width. In the padded encoding used here,
//! an 8-bit value follows the header directly while 16-bit and 32-bit values
//! skip one pad byte so they start on a 16-bit boundary. Two logical types
//! repurpose the rest of the segment: `ExtendedLogical` places a second type
//! byte after the header (the value then follows it without a pad), and
//! `Special` reuses the format bits as a key format selector and carries an
//! electronic key instead of a value.

use super::defs::{
    ElectronicKeyFormat, ExtendedLogicalType, LogicalFormat, LogicalType, SegmentType,
    SpecialTypeFormat, ELECTRONIC_KEY_FORMAT_4_LEN, LOGICAL_FORMAT_MASK, LOGICAL_TYPE_MASK,
};
use crate::error::{ProtocolError, Result};
use crate::wire::{read_slice_at, read_u16_le_at, read_u32_le_at, read_u8_at, write_u8_at};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// Decoded format 4 electronic key payload.
///
/// Wire layout after the key format byte, little-endian words:
///
/// ```text
///      | vendor id | device type | product code | major | minor |
/// bytes|     2     |      2      |      2       |   1   |   1   |
/// ```
///
/// Bit 7 of the major revision byte is the compatibility flag; the revision
/// itself lives in bits 6-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicKeyFormat4 {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    /// Major revision, bits 6-0 of the revision byte.
    pub major_revision: u8,
    /// Compatibility flag, bit 7 of the revision byte.
    pub compatibility: bool,
    pub minor_revision: u8,
}

impl ElectronicKeyFormat4 {
    /// Major revision byte as carried on the wire, compatibility flag folded
    /// back into bit 7.
    pub fn major_revision_byte(&self) -> u8 {
        let mut b = self.major_revision & 0x7F;
        if self.compatibility {
            b |= 0x80;
        }
        b
    }
}

/// Borrowed view over one logical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalSegmentRef<'a> {
    buf: &'a [u8],
}

impl<'a> LogicalSegmentRef<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Logical {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Logical,
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

    /// Logical type bits of the header.
    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        LogicalType::from_byte(self.buf[0])
    }

    /// Format bits of the header. For special segments the same two bits
    /// select the key format instead; see `special_type_format`.
    #[inline]
    pub fn logical_format(&self) -> LogicalFormat {
        LogicalFormat::from_byte(self.buf[0])
    }

    /// Extended logical type byte after the header.
    pub fn extended_logical_type(&self) -> Result<ExtendedLogicalType> {
        if self.logical_type() != LogicalType::ExtendedLogical {
            return Err(ProtocolError::PreconditionViolated(
                "extended logical type requires the extended logical segment type",
            ));
        }
        Ok(ExtendedLogicalType::from_byte(read_u8_at(self.buf, 1)?))
    }

    /// Special format selector in the low header bits.
    pub fn special_type_format(&self) -> Result<SpecialTypeFormat> {
        if self.logical_type() != LogicalType::Special {
            return Err(ProtocolError::PreconditionViolated(
                "special type format requires the special segment type",
            ));
        }
        Ok(SpecialTypeFormat::from_byte(self.buf[0]))
    }

    /// Electronic key format byte after the header of a special segment.
    pub fn electronic_key_format(&self) -> Result<ElectronicKeyFormat> {
        match self.special_type_format()? {
            SpecialTypeFormat::ElectronicKey => {}
            SpecialTypeFormat::Reserved(_) => {
                return Err(ProtocolError::PreconditionViolated(
                    "electronic key format requires the electronic key special format",
                ));
            }
        }
        Ok(ElectronicKeyFormat::from_byte(read_u8_at(self.buf, 1)?))
    }

    /// Decode the format 4 key payload that follows the key format byte.
    pub fn electronic_key_format4(&self) -> Result<ElectronicKeyFormat4> {
        match self.electronic_key_format()? {
            ElectronicKeyFormat::Format4 => {}
            ElectronicKeyFormat::Reserved(_) => {
                return Err(ProtocolError::PreconditionViolated(
                    "electronic key payload requires key format 4",
                ));
            }
        }
        let raw = read_slice_at(self.buf, 2, ELECTRONIC_KEY_FORMAT_4_LEN)?;
        Ok(ElectronicKeyFormat4 {
            vendor_id: LittleEndian::read_u16(&raw[0..2]),
            device_type: LittleEndian::read_u16(&raw[2..4]),
            product_code: LittleEndian::read_u16(&raw[4..6]),
            major_revision: raw[6] & 0x7F,
            compatibility: raw[6] & 0x80 != 0,
            minor_revision: raw[7],
        })
    }

    /// Addressing value of this segment in the padded encoding.
    ///
    /// Eight-bit values follow the header directly; wider values skip one
    /// pad byte. Extended logical values follow the extended type byte
    /// instead. Special segments carry keys, not values.
    pub fn value(&self) -> Result<u32> {
        let width = self
            .logical_format()
            .byte_width()
            .ok_or(ProtocolError::PreconditionViolated(
                "reserved logical format has no value width",
            ))?;
        match self.logical_type() {
            LogicalType::Special => Err(ProtocolError::PreconditionViolated(
                "special segments carry no logical value",
            )),
            LogicalType::ExtendedLogical => self.read_value(2, width),
            _ => {
                if width == 1 {
                    self.read_value(1, width)
                } else {
                    self.read_value(2, width)
                }
            }
        }
    }

    fn read_value(&self, offset: usize, width: usize) -> Result<u32> {
        match width {
            1 => Ok(read_u8_at(self.buf, offset)? as u32),
            2 => Ok(read_u16_le_at(self.buf, offset)? as u32),
            _ => read_u32_le_at(self.buf, offset),
        }
    }
}

/// Mutable view over one logical segment.
#[derive(Debug, PartialEq, Eq)]
pub struct LogicalSegmentMut<'a> {
    buf: &'a mut [u8],
}

impl<'a> LogicalSegmentMut<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a mut [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Logical {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Logical,
                found,
            });
        }
        Ok(Self { buf })
    }

    /// Read-only view of the same region.
    pub fn view(&self) -> LogicalSegmentRef<'_> {
        LogicalSegmentRef { buf: self.buf }
    }

    /// Write the type bits, leaving the tag and format bits untouched.
    pub fn set_logical_type(&mut self, t: LogicalType) -> Result<()> {
        let b = self.buf[0] & !LOGICAL_TYPE_MASK;
        write_u8_at(self.buf, 0, b | t.to_bits())
    }

    /// Write the format bits, leaving the tag and type bits untouched.
    ///
    /// `LogicalFormat::Reserved` is a concrete bit pattern and is written
    /// verbatim; the owned encoders are the place that refuses it.
    pub fn set_logical_format(&mut self, f: LogicalFormat) -> Result<()> {
        let b = self.buf[0] & !LOGICAL_FORMAT_MASK;
        write_u8_at(self.buf, 0, b | f.to_bits())
    }
}
