//! crimp - bounds-checked binary parsing and image core.
//!
//! This crate provides a unified interface to the crimp library crates.
//!
//! # Crates
//!
//! - [`crimp_buffer`] - [`ByteCursor`](crimp_buffer::ByteCursor), the
//!   bounds-checked binary cursor
//! - [`crimp_core`] - image types, geometry, images and volumes
//!
//! # Example
//!
//! ```
//! use crimp::prelude::*;
//!
//! let data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
//! let mut cursor = ByteCursor::new(data);
//!
//! if cursor.match_literal(b"\x89PNG\r\n\x1a\n") {
//!     cursor.skip(8)?;
//!     assert_eq!(cursor.read_u32_be()?, 13);
//! }
//! # Ok::<(), crimp::buffer::Error>(())
//! ```

// Re-export all sub-crates
pub use crimp_buffer as buffer;
pub use crimp_core as image;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crimp_buffer::{BigEndian, ByteCursor, LittleEndian, Mark};
    pub use crimp_core::{Geometry, Image, ImageType, ImageTypeRegistry, Meta, Volume};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
