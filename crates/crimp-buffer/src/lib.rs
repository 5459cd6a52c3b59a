//! Bounds-checked binary cursor for crimp.
//!
//! This crate provides [`ByteCursor`], a position over a borrowed byte slice
//! that decodes fixed-width integers in either byte order, matches literals,
//! seeks, skips and aligns. Every operation is checked against the buffer
//! bounds and a failed operation never moves the cursor.
//!
//! - [`ByteCursor`] - the cursor itself
//! - [`Mark`] - a saved position for backtracking
//! - [`Error`] - the failure kinds, chiefly [`Error::OutOfRange`]

mod cursor;
mod error;

pub use cursor::{ByteCursor, Mark};
pub use error::{Error, Result};

/// Re-export byteorder markers for the generic read methods.
pub use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Re-export zerocopy traits for [`ByteCursor::read_struct`].
pub use zerocopy::{FromBytes, Immutable, KnownLayout};
