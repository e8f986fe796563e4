use crate::segment::defs::SegmentType;
use thiserror::Error;

/// Result alias used throughout the segment codec.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Protocol-level error type for EPath segment access.
///
/// Unknown wire codes are never reported through this type; selector fields
/// whose value has no assigned meaning decode to `Reserved` variants instead.
/// Errors are kept for structural problems (short regions, a view over the
/// wrong segment family) and for requests the wire data cannot answer, such
/// as a sub-field whose selector says it is absent or a value that does not
/// fit its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A field read or write would run past the end of the segment region.
    #[error("Buffer too short: need {required} bytes, have {available}")]
    BufferTooShort { required: usize, available: usize },
    /// A typed segment view was constructed over a different segment family.
    #[error("Unexpected segment type: expected {expected}, found {found}")]
    UnexpectedSegmentType {
        expected: SegmentType,
        found: SegmentType,
    },
    /// A sub-field accessor was called while its selector field says the
    /// sub-field is not present, for example the extended port number of a
    /// segment whose port identifier is below the extended sentinel.
    #[error("Precondition violated: {0}")]
    PreconditionViolated(&'static str),
    /// Encode-side domain violation for a field value.
    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange { field: &'static str, value: u32 },
    /// A reserved or unknown selector variant with no defined wire encoding.
    #[error("Unencodable value: {0}")]
    UnencodableValue(&'static str),
}
