//! Port segments route a message one hop toward the target node.
//!
//! ```text
//!      |  7 6 5  |    4     |  3 2 1 0   |
//!      | tag 000 | ext-size | port ident |
//! ```
//!
//! After the header byte, in order: the link address size (present when the
//! ext-size flag is set), the 16-bit extended port number (present when the
//! identifier nibble holds the sentinel 15), the link address itself, and a
//! pad byte whenever the total segment length would be odd. The common
//! backplane hop is the two-byte form `[0x01, slot]`; routed TCP hops carry
//! the ASCII host address as a multi-byte link address.

use super::defs::{
    SegmentType, PORT_EXTENDED_LINK_FLAG, PORT_EXTENDED_SENTINEL, PORT_IDENTIFIER_MASK,
};
use crate::error::{ProtocolError, Result};
use crate::wire::{read_slice_at, read_u16_le_at, read_u8_at, write_u16_le_at, write_u8_at};

/// Borrowed view over one port segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSegmentRef<'a> {
    buf: &'a [u8],
}

impl<'a> PortSegmentRef<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Port {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Port,
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

    /// Bit 4 of the header: the link address is longer than one byte and its
    /// size is carried in the byte after the header.
    #[inline]
    pub fn has_extended_link_address_size(&self) -> bool {
        self.buf[0] & PORT_EXTENDED_LINK_FLAG != 0
    }

    /// Port identifier nibble. 15 is the sentinel that moves the real port
    /// number into the extended word.
    #[inline]
    pub fn port_identifier(&self) -> u8 {
        self.buf[0] & PORT_IDENTIFIER_MASK
    }

    /// True when the identifier nibble holds the extended sentinel.
    #[inline]
    pub fn is_extended_port(&self) -> bool {
        self.port_identifier() == PORT_EXTENDED_SENTINEL
    }

    /// Link address size byte.
    ///
    /// Only present when `has_extended_link_address_size` is set; one-byte
    /// link addresses carry no size byte.
    pub fn link_address_size(&self) -> Result<u8> {
        if !self.has_extended_link_address_size() {
            return Err(ProtocolError::PreconditionViolated(
                "link address size byte requires the extended link address flag",
            ));
        }
        read_u8_at(self.buf, 1)
    }

    /// Extended port number word, present only when the identifier nibble is
    /// the sentinel. It sits after the size byte when there is one.
    pub fn extended_port_number(&self) -> Result<u16> {
        read_u16_le_at(self.buf, self.extended_port_offset()?)
    }

    /// Port number regardless of form: the nibble, or the extended word when
    /// the nibble holds the sentinel.
    pub fn port_number(&self) -> Result<u16> {
        if self.is_extended_port() {
            self.extended_port_number()
        } else {
            Ok(self.port_identifier() as u16)
        }
    }

    /// Link address bytes. The size is implicitly one when the extended link
    /// flag is unset.
    pub fn link_address(&self) -> Result<&'a [u8]> {
        let size = if self.has_extended_link_address_size() {
            read_u8_at(self.buf, 1)? as usize
        } else {
            1
        };
        read_slice_at(self.buf, self.link_address_offset(), size)
    }

    fn extended_port_offset(&self) -> Result<usize> {
        if !self.is_extended_port() {
            return Err(ProtocolError::PreconditionViolated(
                "extended port number requires port identifier 15",
            ));
        }
        Ok(if self.has_extended_link_address_size() {
            2
        } else {
            1
        })
    }

    fn link_address_offset(&self) -> usize {
        let mut offset = 1;
        if self.has_extended_link_address_size() {
            offset += 1;
        }
        if self.is_extended_port() {
            offset += 2;
        }
        offset
    }
}

/// Mutable view over one port segment.
#[derive(Debug, PartialEq, Eq)]
pub struct PortSegmentMut<'a> {
    buf: &'a mut [u8],
}

impl<'a> PortSegmentMut<'a> {
    /// Check the family tag and wrap the region.
    pub fn new(buf: &'a mut [u8]) -> Result<Self> {
        let found = SegmentType::from_byte(read_u8_at(buf, 0)?);
        if found != SegmentType::Port {
            return Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Port,
                found,
            });
        }
        Ok(Self { buf })
    }

    /// Read-only view of the same region.
    pub fn view(&self) -> PortSegmentRef<'_> {
        PortSegmentRef { buf: self.buf }
    }

    /// Write the identifier nibble, preserving the tag and flag bits.
    ///
    /// Values above 15 do not fit the nibble; switch to the extended form
    /// with `set_extended_port` instead.
    pub fn set_port_identifier(&mut self, id: u8) -> Result<()> {
        if id > PORT_EXTENDED_SENTINEL {
            return Err(ProtocolError::ValueOutOfRange {
                field: "port identifier",
                value: id as u32,
            });
        }
        let b = self.buf[0] & !PORT_IDENTIFIER_MASK;
        write_u8_at(self.buf, 0, b | id)
    }

    /// Write the extended port word at its position without touching the
    /// identifier nibble.
    ///
    /// The word is only meaningful while the nibble holds the sentinel;
    /// callers driving the two fields separately must also set the sentinel,
    /// or use `set_extended_port`.
    pub fn set_extended_port_number(&mut self, port: u16) -> Result<()> {
        write_u16_le_at(self.buf, self.word_offset(), port)
    }

    /// Switch the segment to the extended form: the port word and the
    /// sentinel nibble in one call. If the region is too short for the word,
    /// the identifier is left unchanged.
    pub fn set_extended_port(&mut self, port: u16) -> Result<()> {
        write_u16_le_at(self.buf, self.word_offset(), port)?;
        let b = self.buf[0] & !PORT_IDENTIFIER_MASK;
        write_u8_at(self.buf, 0, b | PORT_EXTENDED_SENTINEL)
    }

    fn word_offset(&self) -> usize {
        if self.view().has_extended_link_address_size() {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_link_address() {
        let seg = PortSegmentRef::new(&[0x01, 0x06]).unwrap();
        assert!(!seg.has_extended_link_address_size());
        assert!(!seg.is_extended_port());
        assert_eq!(seg.port_identifier(), 1);
        assert_eq!(seg.port_number().unwrap(), 1);
        assert_eq!(seg.link_address().unwrap(), &[0x06]);
    }

    #[test]
    fn extended_link_address_with_size_byte() {
        let seg = PortSegmentRef::new(&[0x15, 0x02, 0x0A, 0x0B]).unwrap();
        assert!(seg.has_extended_link_address_size());
        assert_eq!(seg.port_identifier(), 5);
        assert_eq!(seg.link_address_size().unwrap(), 2);
        assert_eq!(seg.link_address().unwrap(), &[0x0A, 0x0B]);
    }

    #[test]
    fn extended_port_number_follows_the_sentinel() {
        // Port 300, one link byte.
        let seg = PortSegmentRef::new(&[0x0F, 0x2C, 0x01, 0x07]).unwrap();
        assert!(seg.is_extended_port());
        assert_eq!(seg.extended_port_number().unwrap(), 300);
        assert_eq!(seg.port_number().unwrap(), 300);
        assert_eq!(seg.link_address().unwrap(), &[0x07]);
    }

    #[test]
    fn extended_port_sits_after_the_size_byte() {
        // Port 300 routed over a 12-byte host address.
        let mut raw = vec![0x1F, 0x0C, 0x2C, 0x01];
        raw.extend_from_slice(b"192.168.0.10");
        let seg = PortSegmentRef::new(&raw).unwrap();
        assert_eq!(seg.link_address_size().unwrap(), 12);
        assert_eq!(seg.extended_port_number().unwrap(), 300);
        assert_eq!(seg.link_address().unwrap(), b"192.168.0.10");
    }

    #[test]
    fn identifier_fourteen_is_not_extended() {
        let seg = PortSegmentRef::new(&[0x0E, 0x01]).unwrap();
        assert!(!seg.is_extended_port());
        assert_eq!(seg.port_identifier(), 14);
        let seg = PortSegmentRef::new(&[0x0F, 0x2C, 0x01, 0x07]).unwrap();
        assert!(seg.is_extended_port());
    }

    #[test]
    fn link_address_size_requires_the_flag() {
        let seg = PortSegmentRef::new(&[0x01, 0x06]).unwrap();
        assert_eq!(
            seg.link_address_size(),
            Err(ProtocolError::PreconditionViolated(
                "link address size byte requires the extended link address flag",
            ))
        );
    }

    #[test]
    fn extended_port_requires_the_sentinel() {
        let seg = PortSegmentRef::new(&[0x01, 0x06]).unwrap();
        assert!(matches!(
            seg.extended_port_number(),
            Err(ProtocolError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn truncated_extended_port_reports_short_buffer() {
        let seg = PortSegmentRef::new(&[0x0F]).unwrap();
        assert_eq!(
            seg.extended_port_number(),
            Err(ProtocolError::BufferTooShort {
                required: 3,
                available: 1
            })
        );
    }

    #[test]
    fn wrong_family_is_rejected() {
        assert_eq!(
            PortSegmentRef::new(&[0x20, 0x04]),
            Err(ProtocolError::UnexpectedSegmentType {
                expected: SegmentType::Port,
                found: SegmentType::Logical,
            })
        );
    }

    #[test]
    fn set_port_identifier_preserves_the_flag() {
        let mut raw = [0x15, 0x02, 0x0A, 0x0B];
        let mut seg = PortSegmentMut::new(&mut raw).unwrap();
        seg.set_port_identifier(3).unwrap();
        assert_eq!(raw[0], 0x13);
    }

    #[test]
    fn set_port_identifier_rejects_wide_values() {
        let mut raw = [0x01, 0x06];
        let mut seg = PortSegmentMut::new(&mut raw).unwrap();
        assert_eq!(
            seg.set_port_identifier(16),
            Err(ProtocolError::ValueOutOfRange {
                field: "port identifier",
                value: 16,
            })
        );
    }

    #[test]
    fn set_extended_port_writes_sentinel_and_word() {
        let mut raw = [0x01, 0x00, 0x00, 0x05];
        let mut seg = PortSegmentMut::new(&mut raw).unwrap();
        seg.set_extended_port(300).unwrap();
        assert_eq!(raw, [0x0F, 0x2C, 0x01, 0x05]);
    }

    #[test]
    fn set_extended_port_on_short_region_leaves_identifier() {
        let mut raw = [0x01, 0x00];
        let mut seg = PortSegmentMut::new(&mut raw).unwrap();
        assert_eq!(
            seg.set_extended_port(300),
            Err(ProtocolError::BufferTooShort {
                required: 3,
                available: 2
            })
        );
        assert_eq!(raw[0], 0x01);
    }

    #[test]
    fn raw_word_setter_does_not_touch_the_nibble() {
        let mut raw = [0x01, 0x00, 0x00, 0x05];
        let mut seg = PortSegmentMut::new(&mut raw).unwrap();
        seg.set_extended_port_number(300).unwrap();
        assert_eq!(raw, [0x01, 0x2C, 0x01, 0x05]);
    }
}
