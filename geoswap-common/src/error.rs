//! Codec error taxonomy.
//!
//! Every failure is reported to the caller as a typed value. A malformed
//! record never aborts the process; callers discard it and keep decoding its
//! siblings.

/// Result alias used throughout the codecs.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error type for all byte-level codec operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A read or write window `offset..offset + width` exceeds the buffer.
    #[error("access of {width} bytes at {offset:#x} exceeds buffer length {len:#x}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// The buffer is shorter than a layout's declared extent.
    #[error("{record} needs {expected:#x} bytes, only {actual:#x} available")]
    TruncatedRecord {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A decoded pointer field addresses data outside the buffer.
    #[error("pointer {field} = {pointer:#x} falls outside buffer of length {len:#x}")]
    MalformedPointer {
        field: &'static str,
        pointer: usize,
        len: usize,
    },

    /// No NUL terminator within the scan limit.
    #[error("no string terminator within {max_len} bytes of {offset:#x}")]
    UnterminatedString { offset: usize, max_len: usize },

    /// A value does not match its layout descriptor (wrong kind, unknown
    /// field name or wrong value count).
    #[error("value for {record}.{field} does not match its layout")]
    LayoutMismatch {
        record: &'static str,
        field: &'static str,
    },

    /// A count field holds a negative value.
    #[error("count field {field} is negative ({value})")]
    InvalidCount { field: &'static str, value: i64 },

    /// A flat buffer's length is not a multiple of its element stride.
    #[error("{what} has length {len}, not a multiple of {stride}")]
    InvalidStride {
        what: &'static str,
        len: usize,
        stride: usize,
    },

    /// A count does not fit the width of its on-disk field.
    #[error("{what} count {count} exceeds maximum {max}")]
    CapacityExceeded {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// A collision grid with more than one cell per axis.
    #[error("unsupported collision grid {z}x{y}x{x} (only single-cell grids are decoded)")]
    UnsupportedGrid { z: u16, y: u16, x: u16 },
}
