//! Three-dimensional typed pixel storage.

use std::sync::Arc;

use crimp_buffer::ByteCursor;

use crate::image::storage_len;
use crate::{Geometry, ImageType, Meta, Result};

/// A volume: a located box of voxels of one [`ImageType`].
///
/// Storage is plane-major then row-major, `w * h * d * type.size()` bytes,
/// zeroed on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    image_type: Arc<ImageType>,
    geometry: Geometry,
    z: i32,
    d: u32,
    meta: Option<Meta>,
    voxels: Vec<u8>,
}

impl Volume {
    /// Allocate a zeroed volume at `(x, y, z)` with size `w` x `h` x `d`.
    pub fn new_at(
        image_type: Arc<ImageType>,
        x: i32,
        y: i32,
        z: i32,
        w: u32,
        h: u32,
        d: u32,
    ) -> Result<Self> {
        let len = storage_len(&[w, h, d], image_type.size())?;
        Ok(Self {
            image_type,
            geometry: Geometry::new(x, y, w, h),
            z,
            d,
            meta: None,
            voxels: vec![0; len],
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_at_with_meta(
        image_type: Arc<ImageType>,
        x: i32,
        y: i32,
        z: i32,
        w: u32,
        h: u32,
        d: u32,
        meta: Meta,
    ) -> Result<Self> {
        let mut volume = Self::new_at(image_type, x, y, z, w, h, d)?;
        volume.meta = Some(meta);
        Ok(volume)
    }

    #[inline]
    pub fn image_type(&self) -> &Arc<ImageType> {
        &self.image_type
    }

    /// The x/y footprint of the volume.
    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.geometry.h
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.d
    }

    #[inline]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn set_meta(&mut self, meta: Option<Meta>) {
        self.meta = meta;
    }

    #[inline]
    pub fn voxels(&self) -> &[u8] {
        &self.voxels
    }

    #[inline]
    pub fn voxels_mut(&mut self) -> &mut [u8] {
        &mut self.voxels
    }

    /// Bytes of one voxel in volume-local coordinates.
    pub fn voxel(&self, x: u32, y: u32, z: u32) -> Option<&[u8]> {
        let offset = self.voxel_offset(x, y, z)?;
        Some(&self.voxels[offset..offset + self.image_type.size()])
    }

    pub fn voxel_mut(&mut self, x: u32, y: u32, z: u32) -> Option<&mut [u8]> {
        let offset = self.voxel_offset(x, y, z)?;
        let size = self.image_type.size();
        Some(&mut self.voxels[offset..offset + size])
    }

    /// A cursor over the raw voxel bytes.
    pub fn cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.voxels)
    }

    fn voxel_offset(&self, x: u32, y: u32, z: u32) -> Option<usize> {
        if x >= self.width() || y >= self.height() || z >= self.d {
            return None;
        }
        let (w, h) = (self.width() as usize, self.height() as usize);
        let index = (z as usize * h + y as usize) * w + x as usize;
        Some(index * self.image_type.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageTypeRegistry;

    fn rgb() -> Arc<ImageType> {
        ImageTypeRegistry::with_builtins().find("rgb").unwrap()
    }

    #[test]
    fn test_new_at() {
        let volume = Volume::new_at(rgb(), 1, 2, -3, 4, 5, 6).unwrap();

        assert_eq!(volume.geometry(), Geometry::new(1, 2, 4, 5));
        assert_eq!(volume.z(), -3);
        assert_eq!(volume.depth(), 6);
        assert_eq!(volume.voxels().len(), 4 * 5 * 6 * 3);
    }

    #[test]
    fn test_voxel_addressing() {
        let mut volume = Volume::new_at(rgb(), 0, 0, 0, 2, 2, 2).unwrap();

        volume.voxel_mut(1, 0, 1).unwrap().copy_from_slice(&[7, 8, 9]);
        // plane 1 starts at 4 voxels, +1 voxel in
        assert_eq!(&volume.voxels()[15..18], &[7, 8, 9]);
        assert_eq!(volume.voxel(1, 0, 1).unwrap(), &[7, 8, 9]);
        assert!(volume.voxel(0, 0, 2).is_none());
    }

    #[test]
    fn test_cursor_and_meta() {
        let mut meta = Meta::new();
        meta.insert("slices".to_string(), "ct".to_string());
        let mut volume = Volume::new_at_with_meta(rgb(), 0, 0, 0, 1, 1, 2, meta).unwrap();
        volume.voxels_mut()[3] = 0xAB;

        let mut cursor = volume.cursor();
        cursor.skip(3).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0xAB);
        assert_eq!(volume.meta().unwrap()["slices"], "ct");
    }
}
