//! Codec for the segments of CIP EPath addressing paths.
//!
//! An EPath addresses objects and routes messages on CIP networks as a
//! sequence of variable-length binary segments: port hops, logical
//! class/instance/attribute identifiers, network parameters, symbolic names
//! and data payloads. This crate decodes and encodes one segment at a time
//! over caller-owned byte regions; walking a whole request path and
//! interpreting the addressed objects stay with the caller.
//!
//! Decoding is zero-copy: [`SegmentRef::classify`] tags a region with its
//! family and hands out typed views whose accessors bounds-check every read.
//! Encoding goes through the owned types in [`segment::owned`], which write
//! all dependent fields of a segment in one pass.
//!
//! ```
//! use cip_epath::{LogicalType, SegmentRef};
//!
//! let class_segment = [0x20, 0x04];
//! match SegmentRef::classify(&class_segment).unwrap() {
//!     SegmentRef::Logical(seg) => {
//!         assert_eq!(seg.logical_type(), LogicalType::ClassId);
//!         assert_eq!(seg.value().unwrap(), 0x04);
//!     }
//!     other => panic!("unexpected segment: {other:?}"),
//! }
//! ```

pub mod error;
pub mod segment;
pub mod wire;

pub use error::{ProtocolError, Result};
pub use segment::builder::{
    build_ansi_symbol, build_ascii_symbol, build_backplane_route, build_electronic_key,
    build_logical_segment, build_pit_ms, build_pit_us, build_port_segment,
};
pub use segment::defs::{
    DataSegmentSubtype, ElectronicKeyFormat, ExtendedLogicalType, LogicalFormat, LogicalType,
    NetworkSegmentSubtype, SegmentType, SpecialTypeFormat, SymbolicSegmentExtendedFormat,
    SymbolicSegmentFormat,
};
pub use segment::owned::{
    DataSegment, ElectronicKeySegment, ExtendedLogicalSegment, LogicalSegment, NetworkSegment,
    NumericSymbol, PortSegment, Segment, SymbolicSegment,
};
pub use segment::{
    segment_type, set_segment_type, DataSegmentRef, ElectronicKeyFormat4, LogicalSegmentMut,
    LogicalSegmentRef, NetworkSegmentMut, NetworkSegmentRef, PortSegmentMut, PortSegmentRef,
    SegmentRef, SymbolicSegmentRef,
};
pub use wire::SegmentEncode;
