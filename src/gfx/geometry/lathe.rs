//! Surface of revolution around the Y axis
//!
//! Cylinders, cones and capsules are all described by a 2D profile in the
//! (radius, height) plane that is swept around the vertical axis.

use super::GeometryData;

/// One point of a revolution profile
#[derive(Debug, Clone, Copy)]
pub struct ProfilePoint {
    /// Distance from the Y axis
    pub radius: f32,
    /// Height along Y
    pub y: f32,
    /// Profile normal as (radial, vertical)
    pub normal: [f32; 2],
    /// Texture v coordinate of this ring
    pub v: f32,
}

/// Sweeps a profile around the Y axis
///
/// Rings are emitted bottom to top, each with `radial_segments + 1` vertices so the
/// seam gets its own texture coordinates. A ring with zero radius still produces a
/// full row of vertices to keep indexing uniform.
pub fn revolve(
    profile: &[ProfilePoint],
    radial_segments: u32,
    theta_start: f32,
    theta_length: f32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = radial_segments.max(3);

    for point in profile {
        for x in 0..=segs {
            let u = x as f32 / segs as f32;
            let theta = theta_start + u * theta_length;
            let (sin_t, cos_t) = theta.sin_cos();

            data.push_vertex(
                [point.radius * sin_t, point.y, point.radius * cos_t],
                [point.normal[0] * sin_t, point.normal[1], point.normal[0] * cos_t],
                [u, point.v],
            );
        }
    }

    let row = segs + 1;
    for ring in 0..profile.len().saturating_sub(1) as u32 {
        for x in 0..segs {
            let a = ring * row + x;
            let b = (ring + 1) * row + x;
            let c = (ring + 1) * row + x + 1;
            let d = ring * row + x + 1;

            data.push_triangle(a, d, b);
            data.push_triangle(b, d, c);
        }
    }

    data
}

/// Flat disc cap at height `y`, facing up when `top` is set
pub fn cap(
    radius: f32,
    y: f32,
    radial_segments: u32,
    theta_start: f32,
    theta_length: f32,
    top: bool,
) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = radial_segments.max(3);
    let sign = if top { 1.0 } else { -1.0 };

    let center = data.push_vertex([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]);

    for x in 0..=segs {
        let theta = theta_start + x as f32 / segs as f32 * theta_length;
        let (sin_t, cos_t) = theta.sin_cos();
        data.push_vertex(
            [radius * sin_t, y, radius * cos_t],
            [0.0, sign, 0.0],
            [cos_t * 0.5 + 0.5, sin_t * 0.5 * sign + 0.5],
        );
    }

    for x in 0..segs {
        let current = center + 1 + x;
        let next = current + 1;
        if top {
            data.push_triangle(current, next, center);
        } else {
            data.push_triangle(next, current, center);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revolve_counts() {
        let profile = [
            ProfilePoint { radius: 1.0, y: 0.0, normal: [1.0, 0.0], v: 0.0 },
            ProfilePoint { radius: 1.0, y: 1.0, normal: [1.0, 0.0], v: 1.0 },
        ];
        let data = revolve(&profile, 8, 0.0, std::f32::consts::TAU);
        assert_eq!(data.vertex_count(), 18);
        assert_eq!(data.triangle_count(), 16);
    }

    #[test]
    fn test_cap_faces_up() {
        let data = cap(1.0, 0.5, 6, 0.0, std::f32::consts::TAU, true);
        assert_eq!(data.triangle_count(), 6);
        assert!(data.normals.iter().all(|n| n[1] == 1.0));
    }
}
