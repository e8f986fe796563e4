//! EPath segment codec.
//!
//! An EPath is a sequence of variable-length segments. Every segment starts
//! with a byte whose top three bits name the family and whose remaining bits
//! belong to that family:
//!
//! ```text
//!      | 7 6 5 |      4 3 2 1 0       |  following bytes
//!      |  tag  | family-specific bits |  per-family layout
//! ```
//!
//! Decoding starts at [`SegmentRef::classify`], which tags a caller-owned
//! byte region with its family so only that family's accessors are
//! reachable. The views are zero-copy and stateless; every field that
//! reaches past the first byte is bounds-checked. The owned types in
//! [`owned`] build segments for the encode direction.

pub mod builder;
pub mod data;
pub mod defs;
pub mod logical;
pub mod network;
pub mod owned;
pub mod port;
pub mod symbolic;

use crate::error::Result;
use crate::wire::{read_u8_at, write_u8_at};
use defs::{SegmentType, SEGMENT_TYPE_MASK};

pub use data::DataSegmentRef;
pub use logical::{ElectronicKeyFormat4, LogicalSegmentMut, LogicalSegmentRef};
pub use network::{NetworkSegmentMut, NetworkSegmentRef};
pub use port::{PortSegmentMut, PortSegmentRef};
pub use symbolic::SymbolicSegmentRef;

/// Segment family tag of the first byte of `buf`.
pub fn segment_type(buf: &[u8]) -> Result<SegmentType> {
    Ok(SegmentType::from_byte(read_u8_at(buf, 0)?))
}

/// Write the family tag into the first byte of `buf`, preserving bits 4-0.
pub fn set_segment_type(ty: SegmentType, buf: &mut [u8]) -> Result<()> {
    let low = read_u8_at(buf, 0)? & !SEGMENT_TYPE_MASK;
    write_u8_at(buf, 0, ty.to_bits() | low)
}

/// A single segment region tagged with its family.
///
/// The data type families carry no accessor surface, so their arms keep the
/// raw region only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRef<'a> {
    Port(PortSegmentRef<'a>),
    Logical(LogicalSegmentRef<'a>),
    Network(NetworkSegmentRef<'a>),
    Symbolic(SymbolicSegmentRef<'a>),
    Data(DataSegmentRef<'a>),
    DataTypeConstructed { raw: &'a [u8] },
    DataTypeElementary { raw: &'a [u8] },
    Reserved { raw: &'a [u8] },
}

impl<'a> SegmentRef<'a> {
    /// Inspect the family tag and wrap `buf` in the matching typed view.
    ///
    /// Fails only on an empty region; every 3-bit tag pattern is assigned.
    pub fn classify(buf: &'a [u8]) -> Result<Self> {
        Ok(match segment_type(buf)? {
            SegmentType::Port => SegmentRef::Port(PortSegmentRef::new(buf)?),
            SegmentType::Logical => SegmentRef::Logical(LogicalSegmentRef::new(buf)?),
            SegmentType::Network => SegmentRef::Network(NetworkSegmentRef::new(buf)?),
            SegmentType::Symbolic => SegmentRef::Symbolic(SymbolicSegmentRef::new(buf)?),
            SegmentType::Data => SegmentRef::Data(DataSegmentRef::new(buf)?),
            SegmentType::DataTypeConstructed => SegmentRef::DataTypeConstructed { raw: buf },
            SegmentType::DataTypeElementary => SegmentRef::DataTypeElementary { raw: buf },
            SegmentType::Reserved => SegmentRef::Reserved { raw: buf },
        })
    }

    /// Family tag of this segment.
    pub fn segment_type(&self) -> SegmentType {
        match self {
            SegmentRef::Port(_) => SegmentType::Port,
            SegmentRef::Logical(_) => SegmentType::Logical,
            SegmentRef::Network(_) => SegmentType::Network,
            SegmentRef::Symbolic(_) => SegmentType::Symbolic,
            SegmentRef::Data(_) => SegmentType::Data,
            SegmentRef::DataTypeConstructed { .. } => SegmentType::DataTypeConstructed,
            SegmentRef::DataTypeElementary { .. } => SegmentType::DataTypeElementary,
            SegmentRef::Reserved { .. } => SegmentType::Reserved,
        }
    }
}
