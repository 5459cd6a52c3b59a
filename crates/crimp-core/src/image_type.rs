//! Image type descriptors.

use std::fmt;

use crate::{Error, Result};

/// Describes the layout of one pixel: its byte size and named channels.
///
/// Types are immutable once built and are shared between images through
/// `Arc<ImageType>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageType {
    name: String,
    size: usize,
    channels: Vec<String>,
}

impl ImageType {
    /// Create a new image type.
    ///
    /// Fails if the name is empty, the pixel size is zero, or no channels are
    /// given.
    pub fn new<N, C, S>(name: N, size: usize, channels: C) -> Result<Self>
    where
        N: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let channels: Vec<String> = channels.into_iter().map(Into::into).collect();

        if name.is_empty() {
            return Err(Error::InvalidImageType("empty name".to_string()));
        }
        if size == 0 {
            return Err(Error::InvalidImageType(format!("{name}: pixel size is zero")));
        }
        if channels.is_empty() {
            return Err(Error::InvalidImageType(format!("{name}: no channels")));
        }

        Ok(Self {
            name,
            size,
            channels,
        })
    }

    pub(crate) fn from_parts(name: String, size: usize, channels: Vec<String>) -> Self {
        Self {
            name,
            size,
            channels,
        }
    }

    /// Type name, e.g. `rgba`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes per pixel.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Channel names in storage order.
    #[inline]
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes: {})", self.name, self.size, self.channels.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let ty = ImageType::new("rgb", 3, ["red", "green", "blue"]).unwrap();
        assert_eq!(ty.name(), "rgb");
        assert_eq!(ty.size(), 3);
        assert_eq!(ty.channel_count(), 3);
        assert_eq!(ty.to_string(), "rgb (3 bytes: red green blue)");
    }

    #[test]
    fn test_validation() {
        assert!(ImageType::new("", 1, ["luma"]).is_err());
        assert!(ImageType::new("grey0", 0, ["luma"]).is_err());
        assert!(ImageType::new("none", 1, Vec::<String>::new()).is_err());
    }
}
