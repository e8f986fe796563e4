//! Owned segment values for the encode direction.
//!
//! Each type serializes one whole segment through [`SegmentEncode`], writing
//! every dependent field in a single pass so encoded segments are well
//! formed by construction: the port sentinel travels with its extended word
//! and the key format byte with its payload. All encoders emit the padded
//! form, so every segment occupies a whole number of 16-bit words.
//! Validation happens before the first byte is written; a failed encode
//! leaves `dst` untouched.

use super::defs::{
    ExtendedLogicalType, LogicalFormat, LogicalType, SegmentType, DATA_SUBTYPE_ANSI_SYMBOL,
    DATA_SUBTYPE_SIMPLE, ELECTRONIC_KEY_FORMAT_4, NETWORK_PIT_US_DATA_WORDS,
    NETWORK_SUBTYPE_PIT_MS, NETWORK_SUBTYPE_PIT_US, PORT_EXTENDED_LINK_FLAG,
    PORT_EXTENDED_SENTINEL, SYMBOL_EXTENDED_NUMERIC, SYMBOL_NUMERIC_UDINT, SYMBOL_NUMERIC_UINT,
    SYMBOL_NUMERIC_USINT,
};
use super::logical::ElectronicKeyFormat4;
use crate::error::{ProtocolError, Result};
use crate::wire::SegmentEncode;
use bytes::BufMut;
use serde::{Deserialize, Serialize};

/// Owned port segment.
///
/// A `port` above 14 switches the encoding to the extended word form; link
/// addresses longer than one byte get the size byte and the extended link
/// flag. The nibble or sentinel, the optional word and the trailing pad are
/// all derived from the two fields, so the invariants between them cannot be
/// violated from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSegment {
    pub port: u16,
    pub link_address: Vec<u8>,
}

impl PortSegment {
    fn is_extended_port(&self) -> bool {
        self.port >= u16::from(PORT_EXTENDED_SENTINEL)
    }

    fn has_extended_link(&self) -> bool {
        self.link_address.len() != 1
    }

    fn body_len(&self) -> usize {
        let mut len = 1 + self.link_address.len();
        if self.has_extended_link() {
            len += 1;
        }
        if self.is_extended_port() {
            len += 2;
        }
        len
    }
}

impl SegmentEncode for PortSegment {
    fn encoded_len(&self) -> usize {
        let n = self.body_len();
        n + (n & 1)
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        if self.link_address.is_empty() {
            return Err(ProtocolError::ValueOutOfRange {
                field: "link address length",
                value: 0,
            });
        }
        if self.link_address.len() > u8::MAX as usize {
            return Err(ProtocolError::ValueOutOfRange {
                field: "link address length",
                value: self.link_address.len() as u32,
            });
        }
        let mut header = SegmentType::Port.to_bits();
        if self.has_extended_link() {
            header |= PORT_EXTENDED_LINK_FLAG;
        }
        if self.is_extended_port() {
            header |= PORT_EXTENDED_SENTINEL;
        } else {
            header |= self.port as u8;
        }
        dst.put_u8(header);
        if self.has_extended_link() {
            dst.put_u8(self.link_address.len() as u8);
        }
        if self.is_extended_port() {
            dst.put_u16_le(self.port);
        }
        dst.put_slice(&self.link_address);
        if self.body_len() & 1 == 1 {
            dst.put_u8(0x00);
        }
        Ok(())
    }
}

/// Owned logical segment carrying a plain addressing value.
///
/// `Special` and `ExtendedLogical` types are refused here; they have owned
/// types of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSegment {
    pub logical_type: LogicalType,
    pub format: LogicalFormat,
    pub value: u32,
}

impl SegmentEncode for LogicalSegment {
    fn encoded_len(&self) -> usize {
        match self.format.byte_width() {
            Some(1) => 2,
            Some(2) => 4,
            Some(4) => 6,
            _ => 0,
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        let width = self
            .format
            .byte_width()
            .ok_or(ProtocolError::UnencodableValue("reserved logical format"))?;
        if matches!(
            self.logical_type,
            LogicalType::Special | LogicalType::ExtendedLogical
        ) {
            return Err(ProtocolError::UnencodableValue(
                "special and extended logical segments have owned types of their own",
            ));
        }
        check_value_width("logical value", self.value, width)?;
        dst.put_u8(
            SegmentType::Logical.to_bits() | self.logical_type.to_bits() | self.format.to_bits(),
        );
        match width {
            1 => dst.put_u8(self.value as u8),
            2 => {
                dst.put_u8(0x00);
                dst.put_u16_le(self.value as u16);
            }
            _ => {
                dst.put_u8(0x00);
                dst.put_u32_le(self.value);
            }
        }
        Ok(())
    }
}

/// Owned extended logical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedLogicalSegment {
    pub extended_type: ExtendedLogicalType,
    pub format: LogicalFormat,
    pub value: u32,
}

impl SegmentEncode for ExtendedLogicalSegment {
    fn encoded_len(&self) -> usize {
        match self.format.byte_width() {
            Some(w) => {
                let n = 2 + w;
                n + (n & 1)
            }
            None => 0,
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        let width = self
            .format
            .byte_width()
            .ok_or(ProtocolError::UnencodableValue("reserved logical format"))?;
        if self.extended_type == ExtendedLogicalType::Reserved {
            return Err(ProtocolError::UnencodableValue(
                "reserved extended logical type",
            ));
        }
        check_value_width("extended logical value", self.value, width)?;
        dst.put_u8(
            SegmentType::Logical.to_bits()
                | LogicalType::ExtendedLogical.to_bits()
                | self.format.to_bits(),
        );
        dst.put_u8(self.extended_type.to_byte());
        match width {
            1 => {
                dst.put_u8(self.value as u8);
                dst.put_u8(0x00);
            }
            2 => dst.put_u16_le(self.value as u16),
            _ => dst.put_u32_le(self.value),
        }
        Ok(())
    }
}

/// Owned electronic key segment, format 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicKeySegment {
    pub key: ElectronicKeyFormat4,
}

impl SegmentEncode for ElectronicKeySegment {
    fn encoded_len(&self) -> usize {
        10
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        if self.key.major_revision > 0x7F {
            return Err(ProtocolError::ValueOutOfRange {
                field: "major revision",
                value: self.key.major_revision as u32,
            });
        }
        // Special type with format bits 00 selects the electronic key.
        dst.put_u8(SegmentType::Logical.to_bits() | LogicalType::Special.to_bits());
        dst.put_u8(ELECTRONIC_KEY_FORMAT_4);
        dst.put_u16_le(self.key.vendor_id);
        dst.put_u16_le(self.key.device_type);
        dst.put_u16_le(self.key.product_code);
        dst.put_u8(self.key.major_revision_byte());
        dst.put_u8(self.key.minor_revision);
        Ok(())
    }
}

/// Owned network segment variants with a defined payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkSegment {
    /// Production inhibit time in milliseconds.
    PitMs(u8),
    /// Production inhibit time in microseconds.
    PitUs(u32),
}

impl SegmentEncode for NetworkSegment {
    fn encoded_len(&self) -> usize {
        match self {
            NetworkSegment::PitMs(_) => 2,
            NetworkSegment::PitUs(_) => 6,
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        match self {
            NetworkSegment::PitMs(ms) => {
                dst.put_u8(SegmentType::Network.to_bits() | NETWORK_SUBTYPE_PIT_MS);
                dst.put_u8(*ms);
            }
            NetworkSegment::PitUs(us) => {
                dst.put_u8(SegmentType::Network.to_bits() | NETWORK_SUBTYPE_PIT_US);
                dst.put_u8(NETWORK_PIT_US_DATA_WORDS);
                dst.put_u32_le(*us);
            }
        }
        Ok(())
    }
}

/// Owned data segment variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSegment {
    /// Opaque 16-bit words, encoded behind their word count.
    Simple(Vec<u16>),
    /// Length-prefixed ANSI symbol.
    AnsiSymbol(Vec<u8>),
}

impl SegmentEncode for DataSegment {
    fn encoded_len(&self) -> usize {
        match self {
            DataSegment::Simple(words) => 2 + words.len() * 2,
            DataSegment::AnsiSymbol(symbol) => {
                let n = 2 + symbol.len();
                n + (n & 1)
            }
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        match self {
            DataSegment::Simple(words) => {
                if words.len() > u8::MAX as usize {
                    return Err(ProtocolError::ValueOutOfRange {
                        field: "simple data word count",
                        value: words.len() as u32,
                    });
                }
                dst.put_u8(SegmentType::Data.to_bits() | DATA_SUBTYPE_SIMPLE);
                dst.put_u8(words.len() as u8);
                for w in words {
                    dst.put_u16_le(*w);
                }
            }
            DataSegment::AnsiSymbol(symbol) => {
                if symbol.is_empty() || symbol.len() > u8::MAX as usize {
                    return Err(ProtocolError::ValueOutOfRange {
                        field: "ansi symbol length",
                        value: symbol.len() as u32,
                    });
                }
                dst.put_u8(SegmentType::Data.to_bits() | DATA_SUBTYPE_ANSI_SYMBOL);
                dst.put_u8(symbol.len() as u8);
                dst.put_slice(symbol);
                if symbol.len() & 1 == 1 {
                    dst.put_u8(0x00);
                }
            }
        }
        Ok(())
    }
}

/// Numeric symbol value for the extended string form of a symbolic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericSymbol {
    Usint(u8),
    Uint(u16),
    Udint(u32),
}

/// Owned symbolic segment variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolicSegment {
    /// In-line ASCII symbol, 1 to 31 bytes.
    Ascii(Vec<u8>),
    /// Numeric symbol in the extended string form.
    Numeric(NumericSymbol),
}

impl SegmentEncode for SymbolicSegment {
    fn encoded_len(&self) -> usize {
        match self {
            SymbolicSegment::Ascii(symbol) => {
                let n = 1 + symbol.len();
                n + (n & 1)
            }
            SymbolicSegment::Numeric(NumericSymbol::Usint(_)) => 4,
            SymbolicSegment::Numeric(NumericSymbol::Uint(_)) => 4,
            SymbolicSegment::Numeric(NumericSymbol::Udint(_)) => 6,
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        match self {
            SymbolicSegment::Ascii(symbol) => {
                if symbol.is_empty() || symbol.len() > 31 {
                    return Err(ProtocolError::ValueOutOfRange {
                        field: "ascii symbol length",
                        value: symbol.len() as u32,
                    });
                }
                dst.put_u8(SegmentType::Symbolic.to_bits() | symbol.len() as u8);
                dst.put_slice(symbol);
                if symbol.len() & 1 == 0 {
                    // Header plus an even symbol is odd.
                    dst.put_u8(0x00);
                }
            }
            SymbolicSegment::Numeric(numeric) => {
                dst.put_u8(SegmentType::Symbolic.to_bits());
                match numeric {
                    NumericSymbol::Usint(v) => {
                        dst.put_u8(SYMBOL_EXTENDED_NUMERIC | SYMBOL_NUMERIC_USINT);
                        dst.put_u8(*v);
                        dst.put_u8(0x00);
                    }
                    NumericSymbol::Uint(v) => {
                        dst.put_u8(SYMBOL_EXTENDED_NUMERIC | SYMBOL_NUMERIC_UINT);
                        dst.put_u16_le(*v);
                    }
                    NumericSymbol::Udint(v) => {
                        dst.put_u8(SYMBOL_EXTENDED_NUMERIC | SYMBOL_NUMERIC_UDINT);
                        dst.put_u32_le(*v);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Any owned segment, for building whole paths out of mixed families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Port(PortSegment),
    Logical(LogicalSegment),
    ExtendedLogical(ExtendedLogicalSegment),
    ElectronicKey(ElectronicKeySegment),
    Network(NetworkSegment),
    Data(DataSegment),
    Symbolic(SymbolicSegment),
}

impl SegmentEncode for Segment {
    fn encoded_len(&self) -> usize {
        match self {
            Segment::Port(inner) => inner.encoded_len(),
            Segment::Logical(inner) => inner.encoded_len(),
            Segment::ExtendedLogical(inner) => inner.encoded_len(),
            Segment::ElectronicKey(inner) => inner.encoded_len(),
            Segment::Network(inner) => inner.encoded_len(),
            Segment::Data(inner) => inner.encoded_len(),
            Segment::Symbolic(inner) => inner.encoded_len(),
        }
    }

    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        match self {
            Segment::Port(inner) => inner.encode_to(dst),
            Segment::Logical(inner) => inner.encode_to(dst),
            Segment::ExtendedLogical(inner) => inner.encode_to(dst),
            Segment::ElectronicKey(inner) => inner.encode_to(dst),
            Segment::Network(inner) => inner.encode_to(dst),
            Segment::Data(inner) => inner.encode_to(dst),
            Segment::Symbolic(inner) => inner.encode_to(dst),
        }
    }
}

fn check_value_width(field: &'static str, value: u32, width: usize) -> Result<()> {
    let max = match width {
        1 => u8::MAX as u32,
        2 => u16::MAX as u32,
        _ => u32::MAX,
    };
    if value > max {
        return Err(ProtocolError::ValueOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::logical::LogicalSegmentRef;
    use crate::segment::port::PortSegmentRef;
    use bytes::BytesMut;

    fn encode(seg: &impl SegmentEncode) -> BytesMut {
        let mut buf = BytesMut::new();
        seg.encode_to(&mut buf).unwrap();
        assert_eq!(buf.len(), seg.encoded_len());
        buf
    }

    #[test]
    fn port_segment_single_link_byte() {
        let seg = PortSegment {
            port: 1,
            link_address: vec![0x00],
        };
        assert_eq!(&encode(&seg)[..], &[0x01, 0x00]);
    }

    #[test]
    fn port_segment_extended_port_and_link() {
        let seg = PortSegment {
            port: 300,
            link_address: b"192.168.0.10".to_vec(),
        };
        let mut expected = vec![0x1F, 0x0C, 0x2C, 0x01];
        expected.extend_from_slice(b"192.168.0.10");
        assert_eq!(&encode(&seg)[..], &expected[..]);
    }

    #[test]
    fn port_segment_pads_odd_bodies() {
        let seg = PortSegment {
            port: 2,
            link_address: vec![0x0A, 0x0B, 0x0C],
        };
        let buf = encode(&seg);
        assert_eq!(&buf[..], &[0x12, 0x03, 0x0A, 0x0B, 0x0C, 0x00]);
        assert_eq!(buf.len() % 2, 0);
    }

    #[test]
    fn port_fifteen_uses_the_extended_word() {
        let seg = PortSegment {
            port: 15,
            link_address: vec![0x01],
        };
        assert_eq!(&encode(&seg)[..], &[0x0F, 0x0F, 0x00, 0x01]);
    }

    #[test]
    fn every_nibble_port_round_trips() {
        for port in 0..=14u16 {
            let seg = PortSegment {
                port,
                link_address: vec![0x00],
            };
            let buf = encode(&seg);
            assert_eq!(&buf[..], &[port as u8, 0x00]);
            let view = PortSegmentRef::new(&buf).unwrap();
            assert!(!view.is_extended_port());
            assert_eq!(view.port_number().unwrap(), port);
        }
    }

    #[test]
    fn logical_segment_widths() {
        let seg = LogicalSegment {
            logical_type: LogicalType::ClassId,
            format: LogicalFormat::EightBit,
            value: 0x04,
        };
        assert_eq!(&encode(&seg)[..], &[0x20, 0x04]);

        let seg = LogicalSegment {
            logical_type: LogicalType::InstanceId,
            format: LogicalFormat::SixteenBit,
            value: 0x1234,
        };
        assert_eq!(&encode(&seg)[..], &[0x25, 0x00, 0x34, 0x12]);

        let seg = LogicalSegment {
            logical_type: LogicalType::ConnectionPoint,
            format: LogicalFormat::ThirtyTwoBit,
            value: 0x1234_5678,
        };
        assert_eq!(&encode(&seg)[..], &[0x2E, 0x00, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn logical_segment_rejects_misfit_values() {
        let seg = LogicalSegment {
            logical_type: LogicalType::ClassId,
            format: LogicalFormat::EightBit,
            value: 0x100,
        };
        let mut buf = BytesMut::new();
        assert_eq!(
            seg.encode_to(&mut buf),
            Err(ProtocolError::ValueOutOfRange {
                field: "logical value",
                value: 0x100,
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn logical_segment_rejects_reserved_format() {
        let seg = LogicalSegment {
            logical_type: LogicalType::ClassId,
            format: LogicalFormat::Reserved,
            value: 0,
        };
        let mut buf = BytesMut::new();
        assert!(matches!(
            seg.encode_to(&mut buf),
            Err(ProtocolError::UnencodableValue(_))
        ));
    }

    #[test]
    fn extended_logical_segment_layouts() {
        let seg = ExtendedLogicalSegment {
            extended_type: ExtendedLogicalType::ArrayIndex,
            format: LogicalFormat::SixteenBit,
            value: 0x1234,
        };
        assert_eq!(&encode(&seg)[..], &[0x3D, 0x01, 0x34, 0x12]);

        let seg = ExtendedLogicalSegment {
            extended_type: ExtendedLogicalType::BitIndex,
            format: LogicalFormat::EightBit,
            value: 7,
        };
        assert_eq!(&encode(&seg)[..], &[0x3C, 0x03, 0x07, 0x00]);
    }

    #[test]
    fn electronic_key_round_trip() {
        let key = ElectronicKeyFormat4 {
            vendor_id: 1,
            device_type: 0x000C,
            product_code: 0x0010,
            major_revision: 5,
            compatibility: true,
            minor_revision: 2,
        };
        let buf = encode(&ElectronicKeySegment { key });
        assert_eq!(
            &buf[..],
            &[0x34, 0x04, 0x01, 0x00, 0x0C, 0x00, 0x10, 0x00, 0x85, 0x02]
        );
        let seg = LogicalSegmentRef::new(&buf).unwrap();
        assert_eq!(seg.electronic_key_format4().unwrap(), key);
    }

    #[test]
    fn network_segment_timers() {
        assert_eq!(&encode(&NetworkSegment::PitMs(10))[..], &[0x43, 0x0A]);
        assert_eq!(
            &encode(&NetworkSegment::PitUs(65_536))[..],
            &[0x50, 0x02, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn data_segment_variants() {
        assert_eq!(
            &encode(&DataSegment::Simple(vec![0x2211, 0x4433]))[..],
            &[0x80, 0x02, 0x11, 0x22, 0x33, 0x44]
        );
        assert_eq!(
            &encode(&DataSegment::AnsiSymbol(b"ROBOT".to_vec()))[..],
            &[0x91, 0x05, b'R', b'O', b'B', b'O', b'T', 0x00]
        );
    }

    #[test]
    fn symbolic_segment_variants() {
        assert_eq!(
            &encode(&SymbolicSegment::Ascii(b"POS".to_vec()))[..],
            &[0x63, b'P', b'O', b'S']
        );
        // Even symbols need the pad after the odd header.
        assert_eq!(
            &encode(&SymbolicSegment::Ascii(b"OK".to_vec()))[..],
            &[0x62, b'O', b'K', 0x00]
        );
        assert_eq!(
            &encode(&SymbolicSegment::Numeric(NumericSymbol::Usint(5)))[..],
            &[0x60, 0xC6, 0x05, 0x00]
        );
        assert_eq!(
            &encode(&SymbolicSegment::Numeric(NumericSymbol::Uint(0x1234)))[..],
            &[0x60, 0xC7, 0x34, 0x12]
        );
        assert_eq!(
            &encode(&SymbolicSegment::Numeric(NumericSymbol::Udint(0x0001_0000)))[..],
            &[0x60, 0xC8, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let mut buf = BytesMut::new();
        let seg = PortSegment {
            port: 1,
            link_address: vec![0; 256],
        };
        assert!(matches!(
            seg.encode_to(&mut buf),
            Err(ProtocolError::ValueOutOfRange { .. })
        ));
        let seg = DataSegment::Simple(vec![0; 256]);
        assert!(matches!(
            seg.encode_to(&mut buf),
            Err(ProtocolError::ValueOutOfRange { .. })
        ));
        let seg = SymbolicSegment::Ascii(vec![b'A'; 32]);
        assert!(matches!(
            seg.encode_to(&mut buf),
            Err(ProtocolError::ValueOutOfRange { .. })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_round_trips_through_the_views() {
        let seg = PortSegment {
            port: 300,
            link_address: vec![0x07],
        };
        let buf = encode(&seg);
        let view = PortSegmentRef::new(&buf).unwrap();
        assert_eq!(view.port_number().unwrap(), 300);
        assert_eq!(view.link_address().unwrap(), &[0x07]);
    }
}
