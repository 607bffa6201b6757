use super::collection::ResourceCollection;
use super::material::Material;
use super::types::{Audio, FileResource, Font, Image, Texture, Video};
use crate::gfx::geometry::{Geometry, Shape};
use std::collections::HashMap;

/// Every resource of a scene, grouped by kind
///
/// Each group keeps insertion order, which is the order the asset explorer
/// lists them in.
#[derive(Debug, Default)]
pub struct ResourceManager {
    pub materials: ResourceCollection<Material>,
    pub geometries: ResourceCollection<Geometry>,
    pub textures: ResourceCollection<Texture>,
    pub fonts: ResourceCollection<Font>,
    pub images: ResourceCollection<Image>,
    pub videos: ResourceCollection<Video>,
    pub audio: ResourceCollection<Audio>,
    pub resources: ResourceCollection<FileResource>,
    /// Outlines for shape geometries, keyed by uuid
    pub shapes: HashMap<String, Shape>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> String {
        let uuid = material.uuid.clone();
        self.materials.insert(material);
        uuid
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> String {
        let uuid = geometry.uuid.clone();
        self.geometries.insert(geometry);
        uuid
    }

    pub fn add_texture(&mut self, texture: Texture) -> String {
        let uuid = texture.uuid.clone();
        self.textures.insert(texture);
        uuid
    }

    pub fn add_font(&mut self, font: Font) -> String {
        let uuid = font.uuid.clone();
        self.fonts.insert(font);
        uuid
    }

    pub fn add_image(&mut self, image: Image) -> String {
        let uuid = image.uuid.clone();
        self.images.insert(image);
        uuid
    }

    pub fn add_video(&mut self, video: Video) -> String {
        let uuid = video.uuid.clone();
        self.videos.insert(video);
        uuid
    }

    pub fn add_audio(&mut self, audio: Audio) -> String {
        let uuid = audio.uuid.clone();
        self.audio.insert(audio);
        uuid
    }

    pub fn add_resource(&mut self, resource: FileResource) -> String {
        let uuid = resource.uuid.clone();
        self.resources.insert(resource);
        uuid
    }

    /// Adds an outline for shape geometries, replacing one with the same uuid
    pub fn add_shape(&mut self, shape: Shape) -> String {
        let uuid = shape.uuid.clone();
        self.shapes.insert(uuid.clone(), shape);
        uuid
    }

    pub fn get_material(&self, uuid: &str) -> Option<&Material> {
        self.materials.get(uuid)
    }

    pub fn get_geometry(&self, uuid: &str) -> Option<&Geometry> {
        self.geometries.get(uuid)
    }

    pub fn get_texture(&self, uuid: &str) -> Option<&Texture> {
        self.textures.get(uuid)
    }

    pub fn get_image(&self, uuid: &str) -> Option<&Image> {
        self.images.get(uuid)
    }

    /// Removes a resource of any kind, returning whether something was removed
    pub fn remove(&mut self, uuid: &str) -> bool {
        self.materials.remove(uuid).is_some()
            || self.geometries.remove(uuid).is_some()
            || self.textures.remove(uuid).is_some()
            || self.fonts.remove(uuid).is_some()
            || self.images.remove(uuid).is_some()
            || self.videos.remove(uuid).is_some()
            || self.audio.remove(uuid).is_some()
            || self.resources.remove(uuid).is_some()
    }

    /// Total number of resources across all kinds
    pub fn len(&self) -> usize {
        self.materials.len()
            + self.geometries.len()
            + self.textures.len()
            + self.fonts.len()
            + self.images.len()
            + self.videos.len()
            + self.audio.len()
            + self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Images keyed by uuid, as a geometry loader expects them
    pub fn image_map(&self) -> HashMap<String, Image> {
        self.images
            .iter()
            .map(|image| (image.uuid.clone(), image.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{GeometryData, GeometryParameters};

    #[test]
    fn test_add_and_remove_any_kind() {
        let mut manager = ResourceManager::new();
        let material = manager.add_material(Material::default());
        let geometry = manager.add_geometry(Geometry::new(
            GeometryParameters::Buffer,
            GeometryData::new(),
        ));
        manager.add_audio(Audio::new("a-1", "Theme", "mp3", vec![]));
        assert_eq!(manager.len(), 3);

        assert!(manager.remove(&geometry));
        assert!(manager.get_geometry(&geometry).is_none());
        assert!(manager.get_material(&material).is_some());
        assert!(!manager.remove("unknown"));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_add_shape_replaces_same_uuid() {
        let mut manager = ResourceManager::new();
        manager.add_shape(Shape::new("s-1", vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]));
        let uuid = manager.add_shape(Shape::new("s-1", vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]));

        assert_eq!(uuid, "s-1");
        assert_eq!(manager.shapes.len(), 1);
        assert_eq!(manager.shapes["s-1"].points[1], [2.0, 0.0]);
        // Outlines are not listed resources
        assert!(manager.is_empty());
    }

    #[test]
    fn test_image_map() {
        let mut manager = ResourceManager::new();
        manager.add_image(Image::new("i-1", "Height", "png", vec![1]));
        let map = manager.image_map();
        assert_eq!(map.get("i-1").map(|i| i.name.as_str()), Some("Height"));
    }
}
