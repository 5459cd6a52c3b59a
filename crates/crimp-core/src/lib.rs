//! Image types, geometry, images and volumes for crimp.
//!
//! - [`ImageType`] / [`ImageTypeRegistry`] - pixel layout descriptors and a
//!   caller-owned lookup table
//! - [`Geometry`] - a located rectangle with bounding-box union
//! - [`Image`] / [`Volume`] - typed pixel storage in 2D and 3D
//!
//! # Example
//!
//! ```
//! use crimp_core::{Image, ImageTypeRegistry};
//!
//! let registry = ImageTypeRegistry::with_builtins();
//! let rgba = registry.find("rgba").unwrap();
//!
//! let image = Image::new_at(rgba, 0, 0, 4, 2)?;
//! assert_eq!(image.pixels().len(), 4 * 2 * 4);
//! # Ok::<(), crimp_core::Error>(())
//! ```

mod error;
mod geometry;
mod image;
mod image_type;
mod registry;
mod volume;

pub use error::{Error, Result};
pub use geometry::Geometry;
pub use image::{Image, Meta};
pub use image_type::ImageType;
pub use registry::ImageTypeRegistry;
pub use volume::Volume;
