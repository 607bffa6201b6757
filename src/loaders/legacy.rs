//! Legacy JSON model format
//!
//! Version 3 of the JSON model format stores flat `vertices`, `normals`, `colors`
//! and `uvs` arrays plus a `faces` stream. Each face starts with a bitmask that
//! says which index groups follow it:
//!
//! | bit | meaning |
//! | --- | --- |
//! | 0 | quad (four vertex indices instead of three) |
//! | 1 | material index |
//! | 2 | face uv (unused, no index follows) |
//! | 3 | per-vertex uv indices, once per uv layer |
//! | 4 | face normal index |
//! | 5 | per-vertex normal indices |
//! | 6 | face color index |
//! | 7 | per-vertex color indices |
//!
//! Faces are expanded into unshared vertices so that per-corner normals and
//! texture coordinates survive. Quads `abcd` split into `abd` and `bcd`.

use super::error::GeometryError;
use crate::gfx::geometry::{Geometry, GeometryData, GeometryParameters};
use serde_json::Value;

const QUAD: u64 = 1 << 0;
const MATERIAL: u64 = 1 << 1;
const FACE_VERTEX_UV: u64 = 1 << 3;
const FACE_NORMAL: u64 = 1 << 4;
const FACE_VERTEX_NORMAL: u64 = 1 << 5;
const FACE_COLOR: u64 = 1 << 6;
const FACE_VERTEX_COLOR: u64 = 1 << 7;

/// Result of parsing a legacy model
#[derive(Debug, Clone)]
pub struct LegacyModel {
    pub geometry: Geometry,
    /// Material index of every triangle, when the faces carry one
    pub material_indices: Vec<u32>,
    /// Material records carried alongside the geometry, left undecoded
    pub materials: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct LegacyGeometryLoader;

fn floats(value: Option<&Value>, key: &str) -> Result<Vec<f32>, GeometryError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| GeometryError::Legacy(format!("'{}' holds a non-number", key)))
            })
            .collect(),
        Some(_) => Err(GeometryError::Legacy(format!("'{}' is not an array", key))),
    }
}

/// Reads the face stream one integer at a time
struct FaceCursor<'a> {
    faces: &'a [Value],
    offset: usize,
}

impl FaceCursor<'_> {
    fn done(&self) -> bool {
        self.offset >= self.faces.len()
    }

    fn next(&mut self) -> Result<u64, GeometryError> {
        let value = self.faces.get(self.offset).ok_or_else(|| {
            GeometryError::Legacy(format!("face data truncated at {}", self.offset))
        })?;
        self.offset += 1;
        value.as_u64().ok_or_else(|| {
            GeometryError::Legacy(format!("face entry {} is not an index", self.offset - 1))
        })
    }

    fn take(&mut self, n: usize) -> Result<Vec<usize>, GeometryError> {
        (0..n).map(|_| self.next().map(|i| i as usize)).collect()
    }
}

/// `width` consecutive floats starting at element `index * width`
fn slice_at<'a>(source: &'a [f32], index: usize, width: usize) -> Option<&'a [f32]> {
    let start = index.checked_mul(width)?;
    source.get(start..start.checked_add(width)?)
}

fn triple(source: &[f32], index: usize, what: &str) -> Result<[f32; 3], GeometryError> {
    slice_at(source, index, 3)
        .map(|s| [s[0], s[1], s[2]])
        .ok_or_else(|| GeometryError::Legacy(format!("{} index {} out of range", what, index)))
}

fn pair(source: &[f32], index: usize) -> Result<[f32; 2], GeometryError> {
    slice_at(source, index, 2)
        .map(|s| [s[0], s[1]])
        .ok_or_else(|| GeometryError::Legacy(format!("uv index {} out of range", index)))
}

impl LegacyGeometryLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parses the `data` payload of a legacy geometry descriptor
    pub fn parse(&self, json: &Value) -> Result<LegacyModel, GeometryError> {
        if !json.is_object() {
            return Err(GeometryError::Legacy("payload is not an object".to_string()));
        }

        let scale = json.get("scale").and_then(Value::as_f64).unwrap_or(1.0) as f32;
        let scale = if scale == 0.0 { 1.0 } else { 1.0 / scale };

        let vertices = floats(json.get("vertices"), "vertices")?;
        let normals = floats(json.get("normals"), "normals")?;
        let uv_layers: Vec<Vec<f32>> = match json.get("uvs") {
            Some(Value::Array(layers)) => layers
                .iter()
                .map(|layer| floats(Some(layer), "uvs"))
                .collect::<Result<_, _>>()?,
            _ => Vec::new(),
        };
        // Empty layers still count for the face stream
        let layer_count = uv_layers.len();
        let uvs = uv_layers.first().cloned().unwrap_or_default();

        let faces = match json.get("faces") {
            Some(Value::Array(faces)) => faces.as_slice(),
            None | Some(Value::Null) => &[],
            Some(_) => return Err(GeometryError::Legacy("'faces' is not an array".to_string())),
        };

        let mut data = GeometryData::new();
        let mut material_indices = Vec::new();
        let mut has_normals = false;
        let mut cursor = FaceCursor { faces, offset: 0 };

        while !cursor.done() {
            let mask = cursor.next()?;
            let corners = if mask & QUAD != 0 { 4 } else { 3 };

            let positions = cursor.take(corners)?;
            let material = if mask & MATERIAL != 0 {
                Some(cursor.next()? as u32)
            } else {
                None
            };

            let mut corner_uvs = None;
            if mask & FACE_VERTEX_UV != 0 {
                for layer in 0..layer_count {
                    let indices = cursor.take(corners)?;
                    if layer == 0 {
                        corner_uvs = Some(indices);
                    }
                }
            }

            let face_normal = if mask & FACE_NORMAL != 0 {
                Some(cursor.next()? as usize)
            } else {
                None
            };
            let corner_normals = if mask & FACE_VERTEX_NORMAL != 0 {
                Some(cursor.take(corners)?)
            } else {
                None
            };

            // Colors are skipped
            if mask & FACE_COLOR != 0 {
                cursor.next()?;
            }
            if mask & FACE_VERTEX_COLOR != 0 {
                cursor.take(corners)?;
            }

            let triangles: &[[usize; 3]] = if corners == 4 {
                &[[0, 1, 3], [1, 2, 3]]
            } else {
                &[[0, 1, 2]]
            };

            for triangle in triangles {
                let mut indices = [0u32; 3];
                for (slot, &corner) in triangle.iter().enumerate() {
                    let p = triple(&vertices, positions[corner], "vertex")?;
                    let position = [p[0] * scale, p[1] * scale, p[2] * scale];

                    let normal = match (&corner_normals, face_normal) {
                        (Some(n), _) => Some(triple(&normals, n[corner], "normal")?),
                        (None, Some(n)) => Some(triple(&normals, n, "normal")?),
                        (None, None) => None,
                    };
                    has_normals |= normal.is_some();

                    let uv = match &corner_uvs {
                        Some(uv) => pair(&uvs, uv[corner])?,
                        None => [0.0, 0.0],
                    };

                    indices[slot] =
                        data.push_vertex(position, normal.unwrap_or([0.0, 0.0, 0.0]), uv);
                }
                data.push_triangle(indices[0], indices[1], indices[2]);
                if let Some(material) = material {
                    material_indices.push(material);
                }
            }
        }

        if !has_normals {
            data.compute_vertex_normals();
        }

        let materials = match json.get("materials") {
            Some(Value::Array(materials)) => materials.clone(),
            _ => Vec::new(),
        };

        log::debug!(
            "Parsed legacy geometry with {} triangles",
            data.triangle_count()
        );

        Ok(LegacyModel {
            geometry: Geometry::new(GeometryParameters::Legacy, data),
            material_indices,
            materials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_triangle() {
        let model = LegacyGeometryLoader::new()
            .parse(&json!({
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "faces": [0, 0, 1, 2]
            }))
            .unwrap();

        let data = &model.geometry.data;
        assert_eq!(data.triangle_count(), 1);
        assert_eq!(data.vertices[1], [1.0, 0.0, 0.0]);
        // Computed normals face +Z for a counter-clockwise triangle
        assert!((data.normals[0][2] - 1.0).abs() < 1e-6);
        assert_eq!(model.geometry.type_name(), "Geometry");
    }

    #[test]
    fn test_quad_with_material_uvs_and_normals() {
        // quad | material | vertex uv | vertex normal
        let mask = 1 | 2 | 8 | 32;
        let model = LegacyGeometryLoader::new()
            .parse(&json!({
                "scale": 2.0,
                "vertices": [0, 0, 0, 2, 0, 0, 2, 2, 0, 0, 2, 0],
                "normals": [0, 0, 1],
                "uvs": [[0, 0, 1, 0, 1, 1, 0, 1]],
                "faces": [mask, 0, 1, 2, 3, 7, 0, 1, 2, 3, 0, 0, 0, 0]
            }))
            .unwrap();

        let data = &model.geometry.data;
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.vertex_count(), 6);
        assert_eq!(model.material_indices, vec![7, 7]);
        // Scale divides positions
        assert_eq!(data.vertices[1], [1.0, 0.0, 0.0]);
        // Second triangle is b, c, d
        assert_eq!(data.tex_coords[3], [1.0, 0.0]);
        assert_eq!(data.tex_coords[4], [1.0, 1.0]);
        assert!(data.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_colors_are_skipped() {
        // face color | vertex colors
        let mask = 64 | 128;
        let model = LegacyGeometryLoader::new()
            .parse(&json!({
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "colors": [16777215],
                "faces": [mask, 0, 1, 2, 0, 0, 0, 0]
            }))
            .unwrap();
        assert_eq!(model.geometry.data.triangle_count(), 1);
    }

    #[test]
    fn test_truncated_faces() {
        let result = LegacyGeometryLoader::new().parse(&json!({
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "faces": [1, 0, 1, 2]
        }));
        assert!(matches!(result, Err(GeometryError::Legacy(_))));
    }

    #[test]
    fn test_out_of_range_vertex() {
        let result = LegacyGeometryLoader::new().parse(&json!({
            "vertices": [0, 0, 0],
            "faces": [0, 0, 1, 2]
        }));
        assert!(matches!(result, Err(GeometryError::Legacy(_))));
    }

    #[test]
    fn test_huge_indices_are_out_of_range() {
        let result = LegacyGeometryLoader::new().parse(&json!({
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "faces": [0, 0, 1, i64::MAX]
        }));
        assert!(matches!(result, Err(GeometryError::Legacy(_))));

        // uv layer index
        let result = LegacyGeometryLoader::new().parse(&json!({
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "uvs": [[0, 0]],
            "faces": [8, 0, 1, 2, 0, 0, u64::MAX]
        }));
        assert!(matches!(result, Err(GeometryError::Legacy(_))));
    }

    #[test]
    fn test_missing_payload() {
        let result = LegacyGeometryLoader::new().parse(&Value::Null);
        assert!(matches!(result, Err(GeometryError::Legacy(_))));
    }
}
