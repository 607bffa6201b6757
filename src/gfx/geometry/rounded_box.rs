//! Rounded box geometry
//!
//! Built from a box whose faces carry extra rows near every edge. Vertices that
//! fall outside the inner box (the box shrunk by the radius) are pushed onto a
//! sphere of `radius` around their closest inner point, which rounds edges and
//! corners in one pass.

use super::primitives::box_faces;
use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Rounded box parameters, in descriptor field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundedBoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub radius: f32,
    pub radius_segments: u32,
}

impl Default for RoundedBoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            radius: 0.15,
            radius_segments: 1,
        }
    }
}

/// Coordinates along one axis: `segments` steps through each rounded band and
/// a single span across the flat middle
fn rounded_steps(size: f32, radius: f32, segments: u32) -> Vec<f32> {
    let half = size * 0.5;
    let mut steps = Vec::with_capacity(segments as usize * 2 + 2);

    for i in 0..=segments {
        steps.push(-half + radius * i as f32 / segments as f32);
    }
    for i in 0..=segments {
        let value = half - radius + radius * i as f32 / segments as f32;
        if steps.last().map_or(true, |last| value - last > f32::EPSILON) {
            steps.push(value);
        }
    }

    steps
}

/// Generate a box with rounded edges and corners
///
/// The radius is clamped to half of the smallest extent; a zero radius yields a
/// plain box with one quad per face.
pub fn generate_rounded_box(params: &RoundedBoxParams) -> GeometryData {
    let size = [params.width, params.height, params.depth];
    let min_extent = size.iter().fold(f32::MAX, |m, s| m.min(s.abs()));
    let radius = params.radius.clamp(0.0, min_extent * 0.5);
    let segments = params.radius_segments.max(1);

    if radius <= 0.0 {
        let steps = |s: f32| vec![-s * 0.5, s * 0.5];
        return box_faces(size, &steps(size[0]), &steps(size[1]), &steps(size[2]));
    }

    let xs = rounded_steps(size[0], radius, segments);
    let ys = rounded_steps(size[1], radius, segments);
    let zs = rounded_steps(size[2], radius, segments);
    let mut data = box_faces(size, &xs, &ys, &zs);

    let inner = Vector3::new(
        size[0] * 0.5 - radius,
        size[1] * 0.5 - radius,
        size[2] * 0.5 - radius,
    );

    for (position, normal) in data.vertices.iter_mut().zip(data.normals.iter_mut()) {
        let p = Vector3::from(*position);
        let core = Vector3::new(
            p.x.clamp(-inner.x, inner.x),
            p.y.clamp(-inner.y, inner.y),
            p.z.clamp(-inner.z, inner.z),
        );
        let offset = p - core;

        if offset.magnitude2() > f32::EPSILON {
            let direction = offset.normalize();
            *position = (core + direction * radius).into();
            *normal = direction.into();
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radius_is_plain_box() {
        let data = generate_rounded_box(&RoundedBoxParams {
            radius: 0.0,
            ..Default::default()
        });
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
    }

    #[test]
    fn test_vertices_stay_within_bounds() {
        let params = RoundedBoxParams {
            width: 2.0,
            height: 1.0,
            depth: 3.0,
            radius: 0.25,
            radius_segments: 3,
        };
        let data = generate_rounded_box(&params);

        for v in &data.vertices {
            assert!(v[0].abs() <= 1.0 + 1e-5);
            assert!(v[1].abs() <= 0.5 + 1e-5);
            assert!(v[2].abs() <= 1.5 + 1e-5);
        }
    }

    #[test]
    fn test_corners_are_rounded() {
        let data = generate_rounded_box(&RoundedBoxParams {
            radius: 0.5,
            radius_segments: 4,
            ..Default::default()
        });
        // Radius equal to half the size turns the unit box into a sphere
        for v in &data.vertices {
            let distance = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((distance - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_radius_is_clamped() {
        let data = generate_rounded_box(&RoundedBoxParams {
            width: 1.0,
            height: 0.2,
            depth: 1.0,
            radius: 5.0,
            radius_segments: 2,
        });
        for v in &data.vertices {
            assert!(v[1].abs() <= 0.1 + 1e-5);
        }
    }

    #[test]
    fn test_rounded_steps_merge_middle() {
        let steps = rounded_steps(1.0, 0.5, 2);
        assert_eq!(steps, vec![-0.5, -0.25, 0.0, 0.25, 0.5]);
    }
}
