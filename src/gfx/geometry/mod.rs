//! # Procedural Geometry Generation
//!
//! This module holds the CPU-side mesh representation used by the editor and the
//! generators for every geometry kind a geometry descriptor can name.
//!
//! ## Supported Geometries
//!
//! - **Primitives**: box, sphere, plane, circle, ring, torus, cylinder and cone
//! - **Capsule**: cylinder or truncated cone closed by two hemispherical caps
//! - **Rounded box**: box whose edges and corners are rounded by a radius
//! - **Terrain**: grid displaced by the luminance of a height map image
//! - **Parametric**: surface sampled from a small expression program in `u` and `v`
//! - **Shape**: flat polygon triangulated by ear clipping
//!
//! All generators follow the Y-up, counter-clockwise winding convention used by the
//! scene descriptors.
//!
//! ## Usage
//!
//! ```rust
//! use tessera::gfx::geometry::{generate_box, generate_sphere, BoxParams, SphereParams};
//!
//! let cube = generate_box(&BoxParams::default());
//! let sphere = generate_sphere(&SphereParams::default());
//! assert_eq!(cube.triangle_count(), 12);
//! assert!(sphere.vertex_count() > 0);
//! ```

pub mod capsule;
pub mod expression;
pub mod lathe;
pub mod parametric;
pub mod primitives;
pub mod rounded_box;
pub mod shape;
pub mod terrain;

pub use capsule::{generate_capsule, CapsuleParams};
pub use parametric::{generate_parametric, ParametricParams};
pub use primitives::*;
pub use rounded_box::{generate_rounded_box, RoundedBoxParams};
pub use shape::{generate_shape, Shape, ShapeParams};
pub use terrain::{generate_terrain, TerrainParams};

use cgmath::{InnerSpace, Vector3};

/// Mesh buffers produced by the geometry generators and loaders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Appends a triangle
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends the geometry of `other`, offsetting its indices
    pub fn merge(&mut self, other: &GeometryData) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.tex_coords.extend_from_slice(&other.tex_coords);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Recomputes smooth per-vertex normals by accumulating area-weighted face normals
    ///
    /// Vertices not referenced by any triangle keep an up-facing normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let v0 = Vector3::from(self.vertices[i0]);
            let v1 = Vector3::from(self.vertices[i1]);
            let v2 = Vector3::from(self.vertices[i2]);

            // Cross product length is twice the triangle area
            let face_normal = (v1 - v0).cross(v2 - v0);

            accumulated[i0] += face_normal;
            accumulated[i1] += face_normal;
            accumulated[i2] += face_normal;
        }

        self.normals = accumulated
            .into_iter()
            .map(|n| {
                if n.magnitude2() > f32::EPSILON {
                    n.normalize().into()
                } else {
                    [0.0, 1.0, 0.0]
                }
            })
            .collect();
    }
}

/// Construction parameters a geometry was built from
///
/// One variant per geometry kind. The variant decides the type tag reported by
/// [`Geometry::type_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryParameters {
    Capsule(CapsuleParams),
    RoundedBox(RoundedBoxParams),
    Terrain(TerrainParams),
    Parametric(ParametricParams),
    /// Legacy JSON model geometry
    Legacy,
    Box(BoxParams),
    Sphere(SphereParams),
    Plane(PlaneParams),
    Cylinder(CylinderParams),
    Cone(ConeParams),
    Circle(CircleParams),
    Ring(RingParams),
    Torus(TorusParams),
    Shape(ShapeParams),
    /// Raw attribute buffers
    Buffer,
}

impl GeometryParameters {
    /// Type tag used in descriptors and shown as asset metadata
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryParameters::Capsule(_) => "CapsuleBufferGeometry",
            GeometryParameters::RoundedBox(_) => "RoundedBoxBufferGeometry",
            GeometryParameters::Terrain(_) => "TerrainBufferGeometry",
            GeometryParameters::Parametric(_) => "ParametricBufferGeometry",
            GeometryParameters::Legacy => "Geometry",
            GeometryParameters::Box(_) => "BoxBufferGeometry",
            GeometryParameters::Sphere(_) => "SphereBufferGeometry",
            GeometryParameters::Plane(_) => "PlaneBufferGeometry",
            GeometryParameters::Cylinder(_) => "CylinderBufferGeometry",
            GeometryParameters::Cone(_) => "ConeBufferGeometry",
            GeometryParameters::Circle(_) => "CircleBufferGeometry",
            GeometryParameters::Ring(_) => "RingBufferGeometry",
            GeometryParameters::Torus(_) => "TorusBufferGeometry",
            GeometryParameters::Shape(_) => "ShapeBufferGeometry",
            GeometryParameters::Buffer => "BufferGeometry",
        }
    }
}

/// A named geometry resource
///
/// Owned by whoever parsed it; the resource manager keys geometries by `uuid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub uuid: String,
    pub name: String,
    pub parameters: GeometryParameters,
    pub data: GeometryData,
}

impl Geometry {
    /// Default name given to geometries whose descriptor has none
    pub const DEFAULT_NAME: &'static str = "geometry";

    /// Creates a geometry with a fresh uuid and the default name
    pub fn new(parameters: GeometryParameters, data: GeometryData) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: Self::DEFAULT_NAME.to_string(),
            parameters,
            data,
        }
    }

    /// Builder pattern: set the geometry name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.parameters.type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = generate_plane(&PlaneParams::default());
        let b = generate_plane(&PlaneParams::default());
        let before = a.vertex_count() as u32;

        a.merge(&b);

        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.triangle_count(), 4);
        assert!(a.indices[6..].iter().all(|&i| i >= before));
    }

    #[test]
    fn test_compute_vertex_normals_flat_quad() {
        let mut data = GeometryData::new();
        data.push_vertex([0.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0]);
        data.push_vertex([1.0, 0.0, 0.0], [0.0; 3], [1.0, 0.0]);
        data.push_vertex([0.0, 1.0, 0.0], [0.0; 3], [0.0, 1.0]);
        data.push_triangle(0, 1, 2);

        data.compute_vertex_normals();

        for normal in &data.normals {
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_new_geometry_defaults() {
        let geometry = Geometry::new(GeometryParameters::Buffer, GeometryData::new());
        assert_eq!(geometry.name, "geometry");
        assert_eq!(geometry.type_name(), "BufferGeometry");
        assert!(uuid::Uuid::parse_str(&geometry.uuid).is_ok());
    }
}
