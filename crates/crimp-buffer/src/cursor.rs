//! Bounds-checked cursor over a borrowed byte slice.
//!
//! This module provides [`ByteCursor`], which reads binary data from a byte
//! slice without copying and reports every out-of-bounds access as an
//! [`Error::OutOfRange`] instead of truncating or panicking.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A saved cursor position.
///
/// Produced by [`ByteCursor::mark`] and handed back to [`ByteCursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mark(usize);

impl Mark {
    /// The offset this mark points at.
    #[inline]
    pub const fn offset(self) -> usize {
        self.0
    }
}

/// A cursor over a borrowed byte slice.
///
/// The cursor never owns or mutates the data; it only tracks a position with
/// the invariant `0 <= position <= size`. Reads advance the position, and a
/// read that does not fit leaves the position exactly where it was.
///
/// # Example
///
/// ```
/// use crimp_buffer::ByteCursor;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_u16_le().unwrap(), 0x0201);
/// assert_eq!(cursor.read_u16_be().unwrap(), 0x0304);
/// assert!(cursor.read_u8().is_err());
/// assert_eq!(cursor.tell(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor at the start of a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new cursor starting at a specific position.
    pub fn new_at(data: &'a [u8], position: usize) -> Result<Self> {
        let mut cursor = Self::new(data);
        cursor.seek(position)?;
        Ok(cursor)
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub const fn size(&self) -> usize {
        self.data.len()
    }

    /// Current position.
    #[inline]
    pub const fn tell(&self) -> usize {
        self.position
    }

    /// Number of bytes between the position and the end of the buffer.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether at least `count` bytes remain.
    #[inline]
    pub const fn has_bytes(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    /// Whether the buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the position is at the end of the buffer.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.position == self.data.len()
    }

    /// Whether `location` is a valid position, i.e. `0 <= location <= size`.
    #[inline]
    pub fn check_location(&self, location: isize) -> bool {
        usize::try_from(location).is_ok_and(|location| location <= self.size())
    }

    /// The whole underlying buffer.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The bytes from the position to the end.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, location: usize) -> Result<()> {
        if location > self.size() {
            return Err(self.out_of_range(location as i64, 0));
        }
        self.position = location;
        Ok(())
    }

    /// Move by a relative amount, which may be negative.
    pub fn skip(&mut self, count: isize) -> Result<()> {
        match self.position.checked_add_signed(count) {
            Some(target) if target <= self.size() => {
                self.position = target;
                Ok(())
            }
            _ => Err(self.out_of_range((self.position as i64).saturating_add(count as i64), 0)),
        }
    }

    /// Advance to the next multiple of `stride` counted from offset 0.
    #[inline]
    pub fn align_to(&mut self, stride: usize) -> Result<()> {
        self.align_to_from(0, stride)
    }

    /// Advance to the next offset `p >= position` with `(p - base) % stride == 0`.
    ///
    /// `base` may lie anywhere, including past the current position.
    pub fn align_to_from(&mut self, base: isize, stride: usize) -> Result<()> {
        if stride == 0 {
            return Err(Error::ZeroStride);
        }

        let stride = stride as i128;
        let relative = self.position as i128 - base as i128;
        let delta = (stride - relative.rem_euclid(stride)).rem_euclid(stride);
        let target = self.position as i128 + delta;

        if target > self.size() as i128 {
            let offset = i64::try_from(target).unwrap_or(i64::MAX);
            return Err(self.out_of_range(offset, 0));
        }
        self.position = target as usize;
        Ok(())
    }

    /// Save the current position.
    #[inline]
    pub const fn mark(&self) -> Mark {
        Mark(self.position)
    }

    /// Return to a saved position.
    #[inline]
    pub fn reset(&mut self, mark: Mark) -> Result<()> {
        self.seek(mark.0)
    }

    /// Run `parse` and restore the position if it fails.
    ///
    /// On success the position is wherever `parse` left it.
    pub fn rollback_on_error<T, E>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let start = self.position;
        let result = parse(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    /// Whether the bytes at the position equal `literal`.
    ///
    /// Never advances. A literal longer than the remaining bytes does not
    /// match.
    #[inline]
    pub fn match_literal(&self, literal: &[u8]) -> bool {
        self.remaining_bytes().starts_with(literal)
    }

    /// Consume `expected` or fail with [`Error::InvalidMagic`].
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.peek_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        self.position += expected.len();
        Ok(())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if !self.has_bytes(count) {
            return Err(self.out_of_range(self.position as i64, count));
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Peek at a single byte.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        self.peek_bytes(1).map(|b| b[0])
    }

    /// Peek at a u16 in byte order `E`.
    #[inline]
    pub fn peek_u16<E: ByteOrder>(&self) -> Result<u16> {
        self.peek_bytes(2).map(E::read_u16)
    }

    /// Peek at a u32 in byte order `E`.
    #[inline]
    pub fn peek_u32<E: ByteOrder>(&self) -> Result<u32> {
        self.peek_bytes(4).map(E::read_u32)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    #[inline]
    pub fn read_u16<E: ByteOrder>(&mut self) -> Result<u16> {
        self.read_bytes(2).map(E::read_u16)
    }

    #[inline]
    pub fn read_i16<E: ByteOrder>(&mut self) -> Result<i16> {
        self.read_bytes(2).map(E::read_i16)
    }

    #[inline]
    pub fn read_u32<E: ByteOrder>(&mut self) -> Result<u32> {
        self.read_bytes(4).map(E::read_u32)
    }

    #[inline]
    pub fn read_i32<E: ByteOrder>(&mut self) -> Result<i32> {
        self.read_bytes(4).map(E::read_i32)
    }

    #[inline]
    pub fn read_u64<E: ByteOrder>(&mut self) -> Result<u64> {
        self.read_bytes(8).map(E::read_u64)
    }

    #[inline]
    pub fn read_i64<E: ByteOrder>(&mut self) -> Result<i64> {
        self.read_bytes(8).map(E::read_i64)
    }

    #[inline]
    pub fn read_f32<E: ByteOrder>(&mut self) -> Result<f32> {
        self.read_bytes(4).map(E::read_f32)
    }

    #[inline]
    pub fn read_f64<E: ByteOrder>(&mut self) -> Result<f64> {
        self.read_bytes(8).map(E::read_f64)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_u16::<LittleEndian>()
    }

    /// Read a big-endian u16.
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.read_u16::<BigEndian>()
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16_le(&mut self) -> Result<i16> {
        self.read_i16::<LittleEndian>()
    }

    /// Read a big-endian i16.
    #[inline]
    pub fn read_i16_be(&mut self) -> Result<i16> {
        self.read_i16::<BigEndian>()
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_u32::<LittleEndian>()
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_u32::<BigEndian>()
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.read_i32::<LittleEndian>()
    }

    /// Read a big-endian i32.
    #[inline]
    pub fn read_i32_be(&mut self) -> Result<i32> {
        self.read_i32::<BigEndian>()
    }

    #[inline]
    pub fn read_u64_le(&mut self) -> Result<u64> {
        self.read_u64::<LittleEndian>()
    }

    #[inline]
    pub fn read_u64_be(&mut self) -> Result<u64> {
        self.read_u64::<BigEndian>()
    }

    #[inline]
    pub fn read_i64_le(&mut self) -> Result<i64> {
        self.read_i64::<LittleEndian>()
    }

    #[inline]
    pub fn read_i64_be(&mut self) -> Result<i64> {
        self.read_i64::<BigEndian>()
    }

    #[inline]
    pub fn read_f32_le(&mut self) -> Result<f32> {
        self.read_f32::<LittleEndian>()
    }

    #[inline]
    pub fn read_f32_be(&mut self) -> Result<f32> {
        self.read_f32::<BigEndian>()
    }

    #[inline]
    pub fn read_f64_le(&mut self) -> Result<f64> {
        self.read_f64::<LittleEndian>()
    }

    #[inline]
    pub fn read_f64_be(&mut self) -> Result<f64> {
        self.read_f64::<BigEndian>()
    }

    /// Read a NUL-terminated UTF-8 string.
    ///
    /// The terminator is consumed but not returned.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let remaining = self.remaining_bytes();

        let nul_pos = remaining
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::MissingNulTerminator)?;

        let string = std::str::from_utf8(&remaining[..nul_pos])?;
        self.position += nul_pos + 1;
        Ok(string)
    }

    /// Read a UTF-8 string of a specific length.
    pub fn read_string(&mut self, length: usize) -> Result<&'a str> {
        let string = std::str::from_utf8(self.peek_bytes(length)?)?;
        self.position += length;
        Ok(string)
    }

    /// Read a fixed-layout struct using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.peek_bytes(size)?;
        let value = T::read_from_bytes(bytes).map_err(|_| self.out_of_range(self.position as i64, size))?;
        self.position += size;
        Ok(value)
    }

    fn out_of_range(&self, offset: i64, len: usize) -> Error {
        log::trace!(
            "cursor out of range: {} bytes at {} (position {}, size {})",
            len,
            offset,
            self.position,
            self.size()
        );
        Error::OutOfRange {
            offset,
            len,
            size: self.size(),
        }
    }
}
