//! Height map terrain
//!
//! A horizontal grid in the XZ plane whose vertices are lifted along Y by the
//! luminance of a height map image.

use super::GeometryData;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Terrain parameters, in descriptor field order
///
/// `image` names the height map by resource uuid; the image itself is supplied
/// by the caller when the geometry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerrainParams {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Height of a white pixel
    pub scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 10,
            height_segments: 10,
            scale: 1.0,
            image: None,
        }
    }
}

/// Nearest-pixel luminance in `[0, 1]` at normalized coordinates
fn sample_height(height_map: &GrayImage, u: f32, v: f32) -> f32 {
    let (w, h) = height_map.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let x = (u.clamp(0.0, 1.0) * (w - 1) as f32).round() as u32;
    let y = (v.clamp(0.0, 1.0) * (h - 1) as f32).round() as u32;
    height_map.get_pixel(x, y).0[0] as f32 / 255.0
}

/// Generate a terrain grid centered at the origin
///
/// Without a height map the terrain is flat. Normals are recomputed from the
/// displaced surface.
pub fn generate_terrain(params: &TerrainParams, height_map: Option<&GrayImage>) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = params.width_segments.max(1);
    let h_segs = params.height_segments.max(1);

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let elevation = height_map
                .map(|map| sample_height(map, u, v) * params.scale)
                .unwrap_or(0.0);

            data.push_vertex(
                [(u - 0.5) * params.width, elevation, (v - 0.5) * params.height],
                [0.0, 1.0, 0.0],
                [u, 1.0 - v],
            );
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = (ix + 1) + row * (iy + 1);
            let d = (ix + 1) + row * iy;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    if height_map.is_some() {
        data.compute_vertex_normals();
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_flat_without_height_map() {
        let data = generate_terrain(&TerrainParams::default(), None);
        assert_eq!(data.vertex_count(), 11 * 11);
        assert_eq!(data.triangle_count(), 10 * 10 * 2);
        assert!(data.vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_height_follows_luminance() {
        // Left column black, right column white
        let map = GrayImage::from_fn(2, 2, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        let params = TerrainParams {
            width_segments: 1,
            height_segments: 1,
            scale: 4.0,
            ..Default::default()
        };

        let data = generate_terrain(&params, Some(&map));

        assert_eq!(data.vertices[0][1], 0.0);
        assert_eq!(data.vertices[1][1], 4.0);
        assert_eq!(data.vertices[2][1], 0.0);
        assert_eq!(data.vertices[3][1], 4.0);
    }

    #[test]
    fn test_flat_normals_point_up() {
        let map = GrayImage::from_pixel(4, 4, Luma([128]));
        let data = generate_terrain(&TerrainParams::default(), Some(&map));
        for n in &data.normals {
            assert!((n[1] - 1.0).abs() < 1e-5);
        }
    }
}
