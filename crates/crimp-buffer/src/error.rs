//! Error types for crimp-buffer.

use thiserror::Error;

/// Errors produced by [`ByteCursor`](crate::ByteCursor) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An access or positioning request fell outside `[0, size]`.
    ///
    /// `offset` is the attempted start (or target) and may be negative;
    /// `len` is the number of bytes requested, `0` for pure positioning.
    #[error("out of range: {len} bytes at offset {offset} in buffer of {size} bytes")]
    OutOfRange { offset: i64, len: usize, size: usize },

    /// Alignment was requested with a stride of zero.
    #[error("alignment stride must be non-zero")]
    ZeroStride,

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Missing NUL terminator in string.
    #[error("string missing NUL terminator")]
    MissingNulTerminator,
}

impl Error {
    /// Returns `true` for bounds failures.
    #[inline]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}

/// Result type alias using the buffer Error type.
pub type Result<T> = std::result::Result<T, Error>;
