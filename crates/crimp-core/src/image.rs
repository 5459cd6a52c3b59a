//! Two-dimensional typed pixel storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use crimp_buffer::ByteCursor;

use crate::{Error, Geometry, ImageType, Result};

/// Free-form metadata attached to an image or volume.
pub type Meta = BTreeMap<String, String>;

/// Number of bytes needed for `dims` pixels of `pixel_size` bytes each.
pub(crate) fn storage_len(dims: &[u32], pixel_size: usize) -> Result<usize> {
    dims.iter()
        .try_fold(pixel_size, |acc, &d| acc.checked_mul(d as usize))
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or_else(|| Error::TooLarge {
            dims: dims.to_vec(),
            pixel_size,
        })
}

/// An image: a located rectangle of pixels of one [`ImageType`].
///
/// Pixels are stored row-major, `width * height * type.size()` bytes, and are
/// zero on creation. Cloning duplicates the pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    image_type: Arc<ImageType>,
    geometry: Geometry,
    meta: Option<Meta>,
    pixels: Vec<u8>,
}

impl Image {
    /// Allocate a zeroed image at location `(x, y)` with size `w` x `h`.
    pub fn new_at(image_type: Arc<ImageType>, x: i32, y: i32, w: u32, h: u32) -> Result<Self> {
        let len = storage_len(&[w, h], image_type.size())?;
        Ok(Self {
            image_type,
            geometry: Geometry::new(x, y, w, h),
            meta: None,
            pixels: vec![0; len],
        })
    }

    /// Like [`new_at`](Self::new_at) but with metadata attached.
    pub fn new_at_with_meta(
        image_type: Arc<ImageType>,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        meta: Meta,
    ) -> Result<Self> {
        let mut image = Self::new_at(image_type, x, y, w, h)?;
        image.meta = Some(meta);
        Ok(image)
    }

    /// Build an image from raw pixel bytes at the cursor position.
    ///
    /// Consumes exactly `w * h * type.size()` bytes. On failure the cursor is
    /// not moved.
    pub fn read_from(
        image_type: Arc<ImageType>,
        geometry: Geometry,
        cursor: &mut ByteCursor<'_>,
    ) -> Result<Self> {
        let len = storage_len(&[geometry.w, geometry.h], image_type.size())?;
        let pixels = cursor.read_bytes(len)?.to_vec();
        Ok(Self {
            image_type,
            geometry,
            meta: None,
            pixels,
        })
    }

    #[inline]
    pub fn image_type(&self) -> &Arc<ImageType> {
        &self.image_type
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.geometry.h
    }

    /// Move the image without touching its pixels.
    pub fn set_location(&mut self, x: i32, y: i32) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    #[inline]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn set_meta(&mut self, meta: Option<Meta>) {
        self.meta = meta;
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Bytes of one row, `None` if `y` is outside the image.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.width() as usize * self.image_type.size();
        let start = y as usize * stride;
        Some(&self.pixels[start..start + stride])
    }

    /// Bytes of one pixel in image-local coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let offset = self.pixel_offset(x, y)?;
        Some(&self.pixels[offset..offset + self.image_type.size()])
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        let offset = self.pixel_offset(x, y)?;
        let size = self.image_type.size();
        Some(&mut self.pixels[offset..offset + size])
    }

    /// A cursor over the raw pixel bytes.
    pub fn cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.pixels)
    }

    fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let index = y as usize * self.width() as usize + x as usize;
        Some(index * self.image_type.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageTypeRegistry;

    fn grey16() -> Arc<ImageType> {
        ImageTypeRegistry::with_builtins().find("grey16").unwrap()
    }

    #[test]
    fn test_new_at() {
        let image = Image::new_at(grey16(), -3, 7, 5, 4).unwrap();

        assert_eq!(image.geometry(), Geometry::new(-3, 7, 5, 4));
        assert_eq!(image.pixels().len(), 5 * 4 * 2);
        assert!(image.pixels().iter().all(|&b| b == 0));
        assert!(image.meta().is_none());
    }

    #[test]
    fn test_empty_image() {
        let image = Image::new_at(grey16(), 0, 0, 0, 10).unwrap();
        assert!(image.pixels().is_empty());
        assert!(image.row(0).is_some_and(|row| row.is_empty()));
        assert!(image.pixel(0, 0).is_none());
    }

    #[test]
    fn test_too_large() {
        let ty = Arc::new(ImageType::new("huge", usize::MAX / 2, ["x"]).unwrap());
        assert!(matches!(
            Image::new_at(ty, 0, 0, 4, 1),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn test_meta() {
        let mut meta = Meta::new();
        meta.insert("source".to_string(), "scanner".to_string());

        let mut image = Image::new_at_with_meta(grey16(), 0, 0, 1, 1, meta.clone()).unwrap();
        assert_eq!(image.meta(), Some(&meta));
        image.set_meta(None);
        assert!(image.meta().is_none());
    }

    #[test]
    fn test_pixel_addressing() {
        let mut image = Image::new_at(grey16(), 0, 0, 3, 2).unwrap();

        image.pixel_mut(2, 1).unwrap().copy_from_slice(&[0x34, 0x12]);
        assert_eq!(image.pixel(2, 1).unwrap(), &[0x34, 0x12]);
        assert_eq!(&image.pixels()[10..12], &[0x34, 0x12]);
        assert_eq!(image.row(1).unwrap(), &[0, 0, 0, 0, 0x34, 0x12]);
        assert!(image.pixel(3, 0).is_none());
        assert!(image.row(2).is_none());
    }

    #[test]
    fn test_cursor_over_pixels() {
        let mut image = Image::new_at(grey16(), 0, 0, 2, 1).unwrap();
        image.pixels_mut().copy_from_slice(&[0x01, 0x00, 0xFF, 0xFF]);

        let mut cursor = image.cursor();
        assert_eq!(cursor.read_u16_le().unwrap(), 1);
        assert_eq!(cursor.read_u16_le().unwrap(), u16::MAX);
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn test_read_from_cursor() {
        let data = [0xEE, 0x01, 0x02, 0x03, 0x04, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(1).unwrap();

        let image = Image::read_from(grey16(), Geometry::new(0, 0, 2, 1), &mut cursor).unwrap();
        assert_eq!(image.pixels(), &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cursor.tell(), 5);

        let short = Image::read_from(grey16(), Geometry::new(0, 0, 1, 1), &mut cursor);
        assert!(matches!(short, Err(Error::Buffer(e)) if e.is_out_of_range()));
        assert_eq!(cursor.tell(), 5);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Image::new_at(grey16(), 1, 1, 2, 2).unwrap();
        let mut copy = original.clone();

        copy.pixels_mut()[0] = 9;
        copy.set_location(5, 5);
        assert_eq!(original.pixels()[0], 0);
        assert_eq!(original.geometry().x, 1);
        assert!(Arc::ptr_eq(original.image_type(), copy.image_type()));
    }
}
