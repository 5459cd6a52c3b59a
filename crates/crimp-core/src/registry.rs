//! Caller-owned image type registry.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ImageType;

/// Standard descriptors: name, bytes per pixel, channel names.
const BUILTINS: &[(&str, usize, &[&str])] = &[
    ("rgba", 4, &["red", "green", "blue", "alpha"]),
    ("rgb", 3, &["red", "green", "blue"]),
    ("hsv", 3, &["hue", "saturation", "value"]),
    ("grey8", 1, &["luma"]),
    ("grey16", 2, &["luma"]),
    ("grey32", 4, &["luma"]),
    ("float", 4, &["value"]),
    ("double", 8, &["value"]),
    ("fpcomplex", 8, &["real", "imaginary"]),
];

/// A name-to-type lookup table.
///
/// There is no global instance; create one and pass it to whatever needs to
/// resolve type names.
#[derive(Debug, Clone, Default)]
pub struct ImageTypeRegistry {
    types: FxHashMap<String, Arc<ImageType>>,
}

impl ImageTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for &(name, size, channels) in BUILTINS {
            let channels = channels.iter().map(|c| c.to_string()).collect();
            registry.types.insert(
                name.to_string(),
                Arc::new(ImageType::from_parts(name.to_string(), size, channels)),
            );
        }
        registry
    }

    /// Register a type, replacing any existing type of the same name.
    pub fn define(&mut self, image_type: ImageType) -> Arc<ImageType> {
        let image_type = Arc::new(image_type);
        let previous = self
            .types
            .insert(image_type.name().to_string(), Arc::clone(&image_type));

        if previous.is_some() {
            log::debug!("redefined image type {}", image_type);
        } else {
            log::debug!("defined image type {}", image_type);
        }
        image_type
    }

    /// Look up a type by name.
    pub fn find(&self, name: &str) -> Option<Arc<ImageType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ImageType>> {
        let mut types: Vec<&Arc<ImageType>> = self.types.values().collect();
        types.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        types.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = ImageTypeRegistry::with_builtins();

        assert_eq!(registry.len(), BUILTINS.len());
        let rgba = registry.find("rgba").unwrap();
        assert_eq!(rgba.size(), 4);
        assert_eq!(rgba.channels(), ["red", "green", "blue", "alpha"]);
        assert_eq!(registry.find("fpcomplex").unwrap().channel_count(), 2);
        assert!(registry.find("cmyk").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ImageTypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find("rgba").is_none());
    }

    #[test]
    fn test_define_and_redefine() {
        let mut registry = ImageTypeRegistry::new();

        registry.define(ImageType::new("yuv", 3, ["y", "u", "v"]).unwrap());
        assert!(registry.contains("yuv"));
        assert_eq!(registry.find("yuv").unwrap().size(), 3);

        registry.define(ImageType::new("yuv", 6, ["y", "u", "v"]).unwrap());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("yuv").unwrap().size(), 6);
    }

    #[test]
    fn test_previous_handles_survive_redefinition() {
        let mut registry = ImageTypeRegistry::with_builtins();
        let old = registry.find("grey8").unwrap();

        registry.define(ImageType::new("grey8", 1, ["gray"]).unwrap());
        assert_eq!(old.channels(), ["luma"]);
        assert_eq!(registry.find("grey8").unwrap().channels(), ["gray"]);
    }

    #[test]
    fn test_sorted_enumeration() {
        let registry = ImageTypeRegistry::with_builtins();
        let names = registry.names();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(
            registry.iter().map(|t| t.name()).collect::<Vec<_>>(),
            names
        );
    }
}
