//! Error types for crimp-core.

use thiserror::Error;

/// Errors that can occur when defining types or allocating images.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer cursor error.
    #[error("{0}")]
    Buffer(#[from] crimp_buffer::Error),

    /// Image type descriptor failed validation.
    #[error("invalid image type: {0}")]
    InvalidImageType(String),

    /// Pixel storage size does not fit in memory.
    #[error("pixel storage too large: {dims:?} with {pixel_size} bytes per pixel")]
    TooLarge { dims: Vec<u32>, pixel_size: usize },
}

/// Result type for crimp-core operations.
pub type Result<T> = std::result::Result<T, Error>;
