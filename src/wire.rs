use crate::error::{ProtocolError, Result};
use byteorder::{ByteOrder, LittleEndian};
use bytes::BufMut;

/// Wire encoding trait for owned segment values.
///
/// `encoded_len` must return exactly the number of bytes a successful
/// `encode_to` writes, so callers can pre-size buffers and compute path
/// lengths in 16-bit words. A failed `encode_to` writes nothing.
pub trait SegmentEncode {
    fn encoded_len(&self) -> usize;
    fn encode_to<B: BufMut>(&self, dst: &mut B) -> Result<()>;
}

/// Bounds-checked byte read at `offset`.
#[inline]
pub(crate) fn read_u8_at(buf: &[u8], offset: usize) -> Result<u8> {
    match buf.get(offset) {
        Some(b) => Ok(*b),
        None => Err(ProtocolError::BufferTooShort {
            required: offset + 1,
            available: buf.len(),
        }),
    }
}

/// Bounds-checked little-endian u16 read at `offset`.
#[inline]
pub(crate) fn read_u16_le_at(buf: &[u8], offset: usize) -> Result<u16> {
    match buf.get(offset..offset + 2) {
        Some(b) => Ok(LittleEndian::read_u16(b)),
        None => Err(ProtocolError::BufferTooShort {
            required: offset + 2,
            available: buf.len(),
        }),
    }
}

/// Bounds-checked little-endian u32 read at `offset`.
#[inline]
pub(crate) fn read_u32_le_at(buf: &[u8], offset: usize) -> Result<u32> {
    match buf.get(offset..offset + 4) {
        Some(b) => Ok(LittleEndian::read_u32(b)),
        None => Err(ProtocolError::BufferTooShort {
            required: offset + 4,
            available: buf.len(),
        }),
    }
}

/// Bounds-checked sub-slice of `len` bytes starting at `offset`.
#[inline]
pub(crate) fn read_slice_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    match buf.get(offset..offset + len) {
        Some(s) => Ok(s),
        None => Err(ProtocolError::BufferTooShort {
            required: offset + len,
            available: buf.len(),
        }),
    }
}

/// Bounds-checked byte write at `offset`.
#[inline]
pub(crate) fn write_u8_at(buf: &mut [u8], offset: usize, value: u8) -> Result<()> {
    match buf.get_mut(offset) {
        Some(b) => {
            *b = value;
            Ok(())
        }
        None => Err(ProtocolError::BufferTooShort {
            required: offset + 1,
            available: buf.len(),
        }),
    }
}

/// Bounds-checked little-endian u16 write at `offset`.
#[inline]
pub(crate) fn write_u16_le_at(buf: &mut [u8], offset: usize, value: u16) -> Result<()> {
    let available = buf.len();
    match buf.get_mut(offset..offset + 2) {
        Some(b) => {
            LittleEndian::write_u16(b, value);
            Ok(())
        }
        None => Err(ProtocolError::BufferTooShort {
            required: offset + 2,
            available,
        }),
    }
}
