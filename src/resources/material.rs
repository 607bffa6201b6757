//! PBR materials
//!
//! Materials are plain data in the editor, listed by the asset explorer.

use super::collection::Resource;
use serde::{Deserialize, Serialize};

/// Material definition with PBR properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Material {
    pub uuid: String,
    pub name: String,
    /// Material class shown as asset metadata, e.g. `MeshStandardMaterial`
    #[serde(rename = "type")]
    pub material_type: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    pub occlusion_strength: f32,
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: "Default".to_string(),
            material_type: "MeshStandardMaterial".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            normal_scale: 1.0,
            occlusion_strength: 1.0,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Sets the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Sets metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Sets roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Sets emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }
}

impl Resource for Material {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_are_clamped() {
        let material = Material::new("Steel", [1.0; 4], 2.0, -1.0).with_roughness(1.5);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 1.0);

        let material = material
            .with_metallic(-0.5)
            .with_color(0.2, 0.3, 0.4)
            .with_emission(1.0, 0.5, 0.0);
        assert_eq!(material.metallic, 0.0);
        assert_eq!(material.base_color, [0.2, 0.3, 0.4, 1.0]);
        assert_eq!(material.emissive, [1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let material: Material =
            serde_json::from_str(r#"{ "uuid": "m-1", "name": "Red", "baseColor": [1, 0, 0, 1] }"#)
                .unwrap();
        assert_eq!(material.uuid, "m-1");
        assert_eq!(material.material_type, "MeshStandardMaterial");
        assert_eq!(material.base_color, [1.0, 0.0, 0.0, 1.0]);
    }
}
