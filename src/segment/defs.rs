//! Wire-level constants and selector enums shared by every segment family.
//!
//! Byte 0 of every segment carries the family tag in its top three bits and
//! family-specific bits below it:
//!
//! ```text
//!      | 7 6 5 |       4 3 2 1 0        |
//!      |  tag  |  family-specific bits  |
//! ```
//!
//! Every mask, shift and code used by the views and the encoders lives here,
//! so both directions of the codec draw from the same table. Decoding is
//! total: codes without an assigned meaning map to `Reserved` variants rather
//! than failing, and the encode direction refuses to emit them. Codes follow
//! CIP Vol. 1 Appendix C segment encoding.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// Segment-type tag field in byte 0 (bits 7-5).
pub const SEGMENT_TYPE_MASK: u8 = 0xE0;

// --- Port segment, byte 0 low bits ---

/// Extended link address size flag (bit 4).
pub const PORT_EXTENDED_LINK_FLAG: u8 = 0x10;
/// Port identifier field (bits 3-0).
pub const PORT_IDENTIFIER_MASK: u8 = 0x0F;
/// Identifier value that moves the real port number into a trailing 16-bit word.
pub const PORT_EXTENDED_SENTINEL: u8 = 0x0F;

// --- Logical segment, byte 0 low bits ---

/// Logical type field (bits 4-2).
pub const LOGICAL_TYPE_MASK: u8 = 0x1C;
/// Logical format field (bits 1-0).
pub const LOGICAL_FORMAT_MASK: u8 = 0x03;

/// Electronic key format code for the vendor/type/revision key.
pub const ELECTRONIC_KEY_FORMAT_4: u8 = 0x04;
/// Byte length of the format 4 key payload.
pub const ELECTRONIC_KEY_FORMAT_4_LEN: usize = 8;

// --- Network and data segments, byte 0 low bits ---

/// Subtype field of network and data segments (bits 4-0).
pub const SUBTYPE_MASK: u8 = 0x1F;

/// Network subtype codes. The table is sparse; unlisted codes are reserved.
pub const NETWORK_SUBTYPE_SCHEDULE: u8 = 0x01;
pub const NETWORK_SUBTYPE_FIXED_TAG: u8 = 0x02;
pub const NETWORK_SUBTYPE_PIT_MS: u8 = 0x03;
pub const NETWORK_SUBTYPE_SAFETY: u8 = 0x04;
pub const NETWORK_SUBTYPE_PIT_US: u8 = 0x10;
pub const NETWORK_SUBTYPE_EXTENDED: u8 = 0x1F;

/// Data-words byte expected in a microsecond inhibit time segment.
pub const NETWORK_PIT_US_DATA_WORDS: u8 = 0x02;

/// Data subtype codes.
pub const DATA_SUBTYPE_SIMPLE: u8 = 0x00;
pub const DATA_SUBTYPE_ANSI_SYMBOL: u8 = 0x11;

// --- Symbolic segment ---

/// Symbol size field in byte 0 (bits 4-0); zero selects the extended string format.
pub const SYMBOL_SIZE_MASK: u8 = 0x1F;
/// Extended symbol format field in the byte after the header (bits 7-5).
pub const SYMBOL_EXTENDED_FORMAT_MASK: u8 = 0xE0;
/// Numeric symbol type field in the byte after the header (bits 4-0).
pub const SYMBOL_NUMERIC_TYPE_MASK: u8 = 0x1F;

/// Extended symbol format codes (already positioned at bits 7-5).
pub const SYMBOL_EXTENDED_DOUBLE_CHARS: u8 = 0x20;
pub const SYMBOL_EXTENDED_TRIPLE_CHARS: u8 = 0x40;
pub const SYMBOL_EXTENDED_NUMERIC: u8 = 0xC0;

/// Numeric symbol type codes (bits 4-0 of the extended format byte).
pub const SYMBOL_NUMERIC_USINT: u8 = 0x06;
pub const SYMBOL_NUMERIC_UINT: u8 = 0x07;
pub const SYMBOL_NUMERIC_UDINT: u8 = 0x08;

/// Segment family tag, bits 7-5 of the first segment byte.
///
/// All eight 3-bit patterns are assigned, so decoding a tag never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SegmentType {
    Port = 0x00,
    Logical = 0x20,
    Network = 0x40,
    Symbolic = 0x60,
    Data = 0x80,
    DataTypeConstructed = 0xA0,
    DataTypeElementary = 0xC0,
    Reserved = 0xE0,
}

impl SegmentType {
    /// Decode from a full first segment byte; the low five bits are ignored.
    pub fn from_byte(b: u8) -> Self {
        match b & SEGMENT_TYPE_MASK {
            0x00 => SegmentType::Port,
            0x20 => SegmentType::Logical,
            0x40 => SegmentType::Network,
            0x60 => SegmentType::Symbolic,
            0x80 => SegmentType::Data,
            0xA0 => SegmentType::DataTypeConstructed,
            0xC0 => SegmentType::DataTypeElementary,
            _ => SegmentType::Reserved,
        }
    }

    /// Tag bits, already positioned at bits 7-5.
    #[inline]
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Port => "Port",
            SegmentType::Logical => "Logical",
            SegmentType::Network => "Network",
            SegmentType::Symbolic => "Symbolic",
            SegmentType::Data => "Data",
            SegmentType::DataTypeConstructed => "DataTypeConstructed",
            SegmentType::DataTypeElementary => "DataTypeElementary",
            SegmentType::Reserved => "Reserved",
        }
    }
}

impl From<u8> for SegmentType {
    fn from(b: u8) -> Self {
        Self::from_byte(b)
    }
}

impl From<SegmentType> for u8 {
    fn from(t: SegmentType) -> Self {
        t.to_bits()
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Logical segment type, bits 4-2 of the first segment byte.
///
/// All eight codes are assigned. `Special` and `ExtendedLogical` change the
/// meaning of the rest of the segment; the others address by a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum LogicalType {
    ClassId = 0x00,
    InstanceId = 0x04,
    MemberId = 0x08,
    ConnectionPoint = 0x0C,
    AttributeId = 0x10,
    Special = 0x14,
    ServiceId = 0x18,
    ExtendedLogical = 0x1C,
}

impl LogicalType {
    /// Decode from a full first segment byte.
    pub fn from_byte(b: u8) -> Self {
        match b & LOGICAL_TYPE_MASK {
            0x00 => LogicalType::ClassId,
            0x04 => LogicalType::InstanceId,
            0x08 => LogicalType::MemberId,
            0x0C => LogicalType::ConnectionPoint,
            0x10 => LogicalType::AttributeId,
            0x14 => LogicalType::Special,
            0x18 => LogicalType::ServiceId,
            _ => LogicalType::ExtendedLogical,
        }
    }

    /// Type bits, already positioned at bits 4-2.
    #[inline]
    pub fn to_bits(self) -> u8 {
        self as u8
    }
}

impl From<u8> for LogicalType {
    fn from(b: u8) -> Self {
        Self::from_byte(b)
    }
}

impl From<LogicalType> for u8 {
    fn from(t: LogicalType) -> Self {
        t.to_bits()
    }
}

/// Logical value width selector, bits 1-0 of the first segment byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum LogicalFormat {
    EightBit = 0x00,
    SixteenBit = 0x01,
    ThirtyTwoBit = 0x02,
    /// The fourth 2-bit pattern has no assigned width.
    Reserved = 0x03,
}

impl LogicalFormat {
    /// Decode from a full first segment byte.
    pub fn from_byte(b: u8) -> Self {
        match b & LOGICAL_FORMAT_MASK {
            0x00 => LogicalFormat::EightBit,
            0x01 => LogicalFormat::SixteenBit,
            0x02 => LogicalFormat::ThirtyTwoBit,
            _ => LogicalFormat::Reserved,
        }
    }

    /// Format bits, already positioned at bits 1-0.
    #[inline]
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Width of the value this format selects, `None` for the reserved code.
    pub fn byte_width(self) -> Option<usize> {
        match self {
            LogicalFormat::EightBit => Some(1),
            LogicalFormat::SixteenBit => Some(2),
            LogicalFormat::ThirtyTwoBit => Some(4),
            LogicalFormat::Reserved => None,
        }
    }
}

impl From<u8> for LogicalFormat {
    fn from(b: u8) -> Self {
        Self::from_byte(b)
    }
}

impl From<LogicalFormat> for u8 {
    fn from(f: LogicalFormat) -> Self {
        f.to_bits()
    }
}

/// Extended logical type, the byte after the header when the logical type is
/// [`LogicalType::ExtendedLogical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ExtendedLogicalType {
    /// Code 0 is explicitly reserved; unassigned codes also decode here.
    Reserved = 0x00,
    ArrayIndex = 0x01,
    IndirectArrayIndex = 0x02,
    BitIndex = 0x03,
    IndirectBitIndex = 0x04,
    StructureMemberNumber = 0x05,
    StructureMemberHandle = 0x06,
}

impl ExtendedLogicalType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x01 => ExtendedLogicalType::ArrayIndex,
            0x02 => ExtendedLogicalType::IndirectArrayIndex,
            0x03 => ExtendedLogicalType::BitIndex,
            0x04 => ExtendedLogicalType::IndirectBitIndex,
            0x05 => ExtendedLogicalType::StructureMemberNumber,
            0x06 => ExtendedLogicalType::StructureMemberHandle,
            _ => ExtendedLogicalType::Reserved,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<u8> for ExtendedLogicalType {
    fn from(b: u8) -> Self {
        Self::from_byte(b)
    }
}

impl From<ExtendedLogicalType> for u8 {
    fn from(t: ExtendedLogicalType) -> Self {
        t.to_byte()
    }
}

/// Special segment format, bits 1-0 when the logical type is
/// [`LogicalType::Special`]. Only the electronic key format is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialTypeFormat {
    /// An electronic key follows the header.
    ElectronicKey,
    /// Unassigned format code.
    Reserved(u8),
}

impl SpecialTypeFormat {
    /// Decode from a full first segment byte.
    pub fn from_byte(b: u8) -> Self {
        match b & LOGICAL_FORMAT_MASK {
            0x00 => SpecialTypeFormat::ElectronicKey,
            other => SpecialTypeFormat::Reserved(other),
        }
    }
}

/// Electronic key format selector, the byte after the header of a special
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectronicKeyFormat {
    /// Format 4: vendor, device type, product code and revision.
    Format4,
    /// Unassigned key format code.
    Reserved(u8),
}

impl ElectronicKeyFormat {
    pub fn from_byte(b: u8) -> Self {
        match b {
            ELECTRONIC_KEY_FORMAT_4 => ElectronicKeyFormat::Format4,
            other => ElectronicKeyFormat::Reserved(other),
        }
    }
}

/// Network segment subtype, bits 4-0 of the first segment byte.
///
/// The assigned codes are non-contiguous; everything else decodes to
/// `Reserved` and cannot be encoded back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkSegmentSubtype {
    Schedule,
    FixedTag,
    ProductionInhibitTimeMs,
    Safety,
    ProductionInhibitTimeUs,
    ExtendedNetwork,
    /// Unassigned subtype code.
    Reserved(u8),
}

impl NetworkSegmentSubtype {
    /// Decode from a full first segment byte.
    pub fn from_byte(b: u8) -> Self {
        match b & SUBTYPE_MASK {
            NETWORK_SUBTYPE_SCHEDULE => NetworkSegmentSubtype::Schedule,
            NETWORK_SUBTYPE_FIXED_TAG => NetworkSegmentSubtype::FixedTag,
            NETWORK_SUBTYPE_PIT_MS => NetworkSegmentSubtype::ProductionInhibitTimeMs,
            NETWORK_SUBTYPE_SAFETY => NetworkSegmentSubtype::Safety,
            NETWORK_SUBTYPE_PIT_US => NetworkSegmentSubtype::ProductionInhibitTimeUs,
            NETWORK_SUBTYPE_EXTENDED => NetworkSegmentSubtype::ExtendedNetwork,
            other => NetworkSegmentSubtype::Reserved(other),
        }
    }

    /// Wire code for this subtype, `None` for reserved codes.
    ///
    /// The mapping is the exact inverse of `from_byte` for every assigned
    /// code.
    pub fn to_code(self) -> Option<u8> {
        match self {
            NetworkSegmentSubtype::Schedule => Some(NETWORK_SUBTYPE_SCHEDULE),
            NetworkSegmentSubtype::FixedTag => Some(NETWORK_SUBTYPE_FIXED_TAG),
            NetworkSegmentSubtype::ProductionInhibitTimeMs => Some(NETWORK_SUBTYPE_PIT_MS),
            NetworkSegmentSubtype::Safety => Some(NETWORK_SUBTYPE_SAFETY),
            NetworkSegmentSubtype::ProductionInhibitTimeUs => Some(NETWORK_SUBTYPE_PIT_US),
            NetworkSegmentSubtype::ExtendedNetwork => Some(NETWORK_SUBTYPE_EXTENDED),
            NetworkSegmentSubtype::Reserved(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkSegmentSubtype::Schedule => "Schedule",
            NetworkSegmentSubtype::FixedTag => "FixedTag",
            NetworkSegmentSubtype::ProductionInhibitTimeMs => "ProductionInhibitTimeMs",
            NetworkSegmentSubtype::Safety => "Safety",
            NetworkSegmentSubtype::ProductionInhibitTimeUs => "ProductionInhibitTimeUs",
            NetworkSegmentSubtype::ExtendedNetwork => "ExtendedNetwork",
            NetworkSegmentSubtype::Reserved(_) => "Reserved",
        }
    }
}

impl fmt::Display for NetworkSegmentSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data segment subtype, bits 4-0 of the first segment byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSegmentSubtype {
    /// Opaque 16-bit words preceded by a word count.
    SimpleData,
    /// Length-prefixed ANSI symbol, a printable tag name in practice.
    AnsiExtendedSymbol,
    /// Unassigned subtype code.
    Reserved(u8),
}

impl DataSegmentSubtype {
    /// Decode from a full first segment byte.
    pub fn from_byte(b: u8) -> Self {
        match b & SUBTYPE_MASK {
            DATA_SUBTYPE_SIMPLE => DataSegmentSubtype::SimpleData,
            DATA_SUBTYPE_ANSI_SYMBOL => DataSegmentSubtype::AnsiExtendedSymbol,
            other => DataSegmentSubtype::Reserved(other),
        }
    }

    /// Wire code for this subtype, `None` for reserved codes.
    pub fn to_code(self) -> Option<u8> {
        match self {
            DataSegmentSubtype::SimpleData => Some(DATA_SUBTYPE_SIMPLE),
            DataSegmentSubtype::AnsiExtendedSymbol => Some(DATA_SUBTYPE_ANSI_SYMBOL),
            DataSegmentSubtype::Reserved(_) => None,
        }
    }
}

/// Symbolic segment format, selected by the size field in byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicSegmentFormat {
    /// Nonzero size: that many ASCII bytes follow the header.
    Ascii,
    /// Zero size: an extended format byte follows the header.
    ExtendedString,
}

/// Extended symbol format, the byte after the header of a zero-size symbolic
/// segment. Numeric symbols additionally select their width in the low five
/// bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicSegmentExtendedFormat {
    DoubleByteChars,
    TripleByteChars,
    NumericUsint,
    NumericUint,
    NumericUdint,
    /// Unassigned extended format code.
    Reserved(u8),
}

impl SymbolicSegmentExtendedFormat {
    /// Decode the full extended format byte.
    pub fn from_byte(b: u8) -> Self {
        match b & SYMBOL_EXTENDED_FORMAT_MASK {
            SYMBOL_EXTENDED_DOUBLE_CHARS => SymbolicSegmentExtendedFormat::DoubleByteChars,
            SYMBOL_EXTENDED_TRIPLE_CHARS => SymbolicSegmentExtendedFormat::TripleByteChars,
            SYMBOL_EXTENDED_NUMERIC => Self::from_numeric_bits(b),
            _ => SymbolicSegmentExtendedFormat::Reserved(b),
        }
    }

    /// Decode only the numeric type field (bits 4-0), for callers that
    /// already know the symbol is numeric.
    pub fn from_numeric_bits(b: u8) -> Self {
        match b & SYMBOL_NUMERIC_TYPE_MASK {
            SYMBOL_NUMERIC_USINT => SymbolicSegmentExtendedFormat::NumericUsint,
            SYMBOL_NUMERIC_UINT => SymbolicSegmentExtendedFormat::NumericUint,
            SYMBOL_NUMERIC_UDINT => SymbolicSegmentExtendedFormat::NumericUdint,
            other => SymbolicSegmentExtendedFormat::Reserved(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_type_covers_all_tag_patterns() {
        let cases = [
            (0x00u8, SegmentType::Port),
            (0x20, SegmentType::Logical),
            (0x40, SegmentType::Network),
            (0x60, SegmentType::Symbolic),
            (0x80, SegmentType::Data),
            (0xA0, SegmentType::DataTypeConstructed),
            (0xC0, SegmentType::DataTypeElementary),
            (0xE0, SegmentType::Reserved),
        ];
        for (byte, expected) in cases {
            assert_eq!(SegmentType::from_byte(byte), expected);
            // Low bits never leak into the tag.
            assert_eq!(SegmentType::from_byte(byte | 0x1F), expected);
            assert_eq!(expected.to_bits(), byte);
        }
    }

    #[test]
    fn logical_type_and_format_share_the_header_byte() {
        // 0x25 = logical | instance id | 16-bit.
        assert_eq!(LogicalType::from_byte(0x25), LogicalType::InstanceId);
        assert_eq!(LogicalFormat::from_byte(0x25), LogicalFormat::SixteenBit);
    }

    #[test]
    fn reserved_logical_format_has_no_width() {
        assert_eq!(LogicalFormat::from_byte(0x23), LogicalFormat::Reserved);
        assert_eq!(LogicalFormat::Reserved.byte_width(), None);
        assert_eq!(LogicalFormat::SixteenBit.byte_width(), Some(2));
    }

    #[test]
    fn network_subtype_table_is_sparse() {
        let defined = [
            (NETWORK_SUBTYPE_SCHEDULE, NetworkSegmentSubtype::Schedule),
            (NETWORK_SUBTYPE_FIXED_TAG, NetworkSegmentSubtype::FixedTag),
            (
                NETWORK_SUBTYPE_PIT_MS,
                NetworkSegmentSubtype::ProductionInhibitTimeMs,
            ),
            (NETWORK_SUBTYPE_SAFETY, NetworkSegmentSubtype::Safety),
            (
                NETWORK_SUBTYPE_PIT_US,
                NetworkSegmentSubtype::ProductionInhibitTimeUs,
            ),
            (
                NETWORK_SUBTYPE_EXTENDED,
                NetworkSegmentSubtype::ExtendedNetwork,
            ),
        ];
        for (code, expected) in defined {
            assert_eq!(NetworkSegmentSubtype::from_byte(0x40 | code), expected);
            assert_eq!(expected.to_code(), Some(code));
        }
        // The gap between Safety (0x04) and the microsecond timer (0x10).
        assert_eq!(
            NetworkSegmentSubtype::from_byte(0x45),
            NetworkSegmentSubtype::Reserved(0x05)
        );
        assert_eq!(NetworkSegmentSubtype::Reserved(0x05).to_code(), None);
    }

    #[test]
    fn extended_logical_codes() {
        assert_eq!(
            ExtendedLogicalType::from_byte(0x03),
            ExtendedLogicalType::BitIndex
        );
        assert_eq!(
            ExtendedLogicalType::from_byte(0x07),
            ExtendedLogicalType::Reserved
        );
        assert_eq!(
            ExtendedLogicalType::from_byte(0x00),
            ExtendedLogicalType::Reserved
        );
    }

    #[test]
    fn extended_symbol_format_selects_numeric_types() {
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0x22),
            SymbolicSegmentExtendedFormat::DoubleByteChars
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0x41),
            SymbolicSegmentExtendedFormat::TripleByteChars
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0xC6),
            SymbolicSegmentExtendedFormat::NumericUsint
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0xC7),
            SymbolicSegmentExtendedFormat::NumericUint
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0xC8),
            SymbolicSegmentExtendedFormat::NumericUdint
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0xC9),
            SymbolicSegmentExtendedFormat::Reserved(0x09)
        );
        assert_eq!(
            SymbolicSegmentExtendedFormat::from_byte(0x09),
            SymbolicSegmentExtendedFormat::Reserved(0x09)
        );
    }
}
