//! Validated constructors for owned segments.
//!
//! The builders reject out-of-domain fields up front so an encode that
//! follows cannot fail, and they pick derived fields (like the narrowest
//! logical format) that callers would otherwise have to compute themselves.

use super::defs::{LogicalFormat, LogicalType};
use super::logical::ElectronicKeyFormat4;
use super::owned::{
    DataSegment, ElectronicKeySegment, LogicalSegment, NetworkSegment, PortSegment,
    SymbolicSegment,
};
use crate::error::{ProtocolError, Result};

/// Smallest format whose width holds `value`.
fn narrowest_format(value: u32) -> LogicalFormat {
    if value <= u8::MAX as u32 {
        LogicalFormat::EightBit
    } else if value <= u16::MAX as u32 {
        LogicalFormat::SixteenBit
    } else {
        LogicalFormat::ThirtyTwoBit
    }
}

/// Port segment with an explicit link address.
pub fn build_port_segment(port: u16, link_address: Vec<u8>) -> Result<PortSegment> {
    if link_address.is_empty() || link_address.len() > u8::MAX as usize {
        return Err(ProtocolError::ValueOutOfRange {
            field: "link address length",
            value: link_address.len() as u32,
        });
    }
    Ok(PortSegment { port, link_address })
}

/// One-hop backplane route to a slot, the most common port segment.
pub fn build_backplane_route(slot: u8) -> PortSegment {
    PortSegment {
        port: 1,
        link_address: vec![slot],
    }
}

/// Logical segment in the narrowest format that holds `value`.
///
/// `Special` and `ExtendedLogical` carry no plain value and are refused.
pub fn build_logical_segment(logical_type: LogicalType, value: u32) -> Result<LogicalSegment> {
    if matches!(
        logical_type,
        LogicalType::Special | LogicalType::ExtendedLogical
    ) {
        return Err(ProtocolError::UnencodableValue(
            "special and extended logical segments have owned types of their own",
        ));
    }
    Ok(LogicalSegment {
        logical_type,
        format: narrowest_format(value),
        value,
    })
}

/// Format 4 electronic key segment.
pub fn build_electronic_key(
    vendor_id: u16,
    device_type: u16,
    product_code: u16,
    compatibility: bool,
    major_revision: u8,
    minor_revision: u8,
) -> Result<ElectronicKeySegment> {
    if major_revision > 0x7F {
        return Err(ProtocolError::ValueOutOfRange {
            field: "major revision",
            value: major_revision as u32,
        });
    }
    Ok(ElectronicKeySegment {
        key: ElectronicKeyFormat4 {
            vendor_id,
            device_type,
            product_code,
            major_revision,
            compatibility,
            minor_revision,
        },
    })
}

/// Millisecond production inhibit time segment.
pub fn build_pit_ms(millis: u8) -> NetworkSegment {
    NetworkSegment::PitMs(millis)
}

/// Microsecond production inhibit time segment.
pub fn build_pit_us(micros: u32) -> NetworkSegment {
    NetworkSegment::PitUs(micros)
}

/// ANSI symbol data segment from a tag name.
pub fn build_ansi_symbol(name: &str) -> Result<DataSegment> {
    if !name.is_ascii() {
        return Err(ProtocolError::UnencodableValue(
            "ansi symbols are limited to ascii",
        ));
    }
    if name.is_empty() || name.len() > u8::MAX as usize {
        return Err(ProtocolError::ValueOutOfRange {
            field: "ansi symbol length",
            value: name.len() as u32,
        });
    }
    Ok(DataSegment::AnsiSymbol(name.as_bytes().to_vec()))
}

/// In-line ASCII symbolic segment from a symbol name.
pub fn build_ascii_symbol(name: &str) -> Result<SymbolicSegment> {
    if !name.is_ascii() {
        return Err(ProtocolError::UnencodableValue(
            "symbolic segments are limited to ascii",
        ));
    }
    if name.is_empty() || name.len() > 31 {
        return Err(ProtocolError::ValueOutOfRange {
            field: "ascii symbol length",
            value: name.len() as u32,
        });
    }
    Ok(SymbolicSegment::Ascii(name.as_bytes().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::SegmentEncode;
    use bytes::BytesMut;

    #[test]
    fn backplane_route_encodes_to_two_bytes() {
        let seg = build_backplane_route(0);
        let mut buf = BytesMut::new();
        seg.encode_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01, 0x00]);
    }

    #[test]
    fn logical_builder_picks_the_narrowest_format() {
        assert_eq!(
            build_logical_segment(LogicalType::ClassId, 4)
                .unwrap()
                .format,
            LogicalFormat::EightBit
        );
        assert_eq!(
            build_logical_segment(LogicalType::InstanceId, 0x1234)
                .unwrap()
                .format,
            LogicalFormat::SixteenBit
        );
        assert_eq!(
            build_logical_segment(LogicalType::ConnectionPoint, 0x0001_0000)
                .unwrap()
                .format,
            LogicalFormat::ThirtyTwoBit
        );
    }

    #[test]
    fn logical_builder_rejects_special_types() {
        assert!(matches!(
            build_logical_segment(LogicalType::Special, 0),
            Err(ProtocolError::UnencodableValue(_))
        ));
        assert!(matches!(
            build_logical_segment(LogicalType::ExtendedLogical, 0),
            Err(ProtocolError::UnencodableValue(_))
        ));
    }

    #[test]
    fn key_builder_validates_the_major_revision() {
        assert_eq!(
            build_electronic_key(1, 0x000C, 0x0010, false, 0x80, 1),
            Err(ProtocolError::ValueOutOfRange {
                field: "major revision",
                value: 0x80,
            })
        );
    }

    #[test]
    fn symbol_builders_require_ascii() {
        assert!(build_ansi_symbol("Größe").is_err());
        assert!(build_ascii_symbol("Größe").is_err());
        assert!(build_ansi_symbol("MOTOR_SPEED").is_ok());
    }

    #[test]
    fn empty_port_link_is_rejected() {
        assert_eq!(
            build_port_segment(1, Vec::new()),
            Err(ProtocolError::ValueOutOfRange {
                field: "link address length",
                value: 0,
            })
        );
    }
}
