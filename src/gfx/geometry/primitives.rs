//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are generated with proper normals and texture coordinates, and each
//! takes a parameter record that deserializes from the matching descriptor fields.

use super::lathe::{self, ProfilePoint};
use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Box parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }
}

/// Evenly spaced coordinates covering `[-size / 2, size / 2]`
pub(crate) fn centered_steps(size: f32, segments: u32) -> Vec<f32> {
    let segs = segments.max(1);
    (0..=segs)
        .map(|i| i as f32 / segs as f32 * size - size * 0.5)
        .collect()
}

/// Emits one face of an axis-aligned box
///
/// `u`, `v` and `w` are axis indices; `u_coords`/`v_coords` are centered coordinates
/// along the face and `w_offset` places the face along its normal axis.
#[allow(clippy::too_many_arguments)]
fn build_face(
    data: &mut GeometryData,
    (u, v, w): (usize, usize, usize),
    u_dir: f32,
    v_dir: f32,
    u_coords: &[f32],
    v_coords: &[f32],
    u_size: f32,
    v_size: f32,
    w_offset: f32,
) {
    let base = data.vertex_count() as u32;
    let row = u_coords.len() as u32;
    let normal_sign = if w_offset < 0.0 { -1.0 } else { 1.0 };

    for &y in v_coords {
        for &x in u_coords {
            let mut position = [0.0; 3];
            position[u] = x * u_dir;
            position[v] = y * v_dir;
            position[w] = w_offset;

            let mut normal = [0.0; 3];
            normal[w] = normal_sign;

            let tex_u = if u_size != 0.0 { x / u_size + 0.5 } else { 0.0 };
            let tex_v = if v_size != 0.0 { 1.0 - (y / v_size + 0.5) } else { 0.0 };

            data.push_vertex(position, normal, [tex_u, tex_v]);
        }
    }

    for iy in 0..v_coords.len().saturating_sub(1) as u32 {
        for ix in 0..row - 1 {
            let a = base + ix + row * iy;
            let b = base + ix + row * (iy + 1);
            let c = base + (ix + 1) + row * (iy + 1);
            let d = base + (ix + 1) + row * iy;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }
}

/// Builds the six faces of a box from per-axis coordinate lists
pub(crate) fn box_faces(
    size: [f32; 3],
    xs: &[f32],
    ys: &[f32],
    zs: &[f32],
) -> GeometryData {
    let [width, height, depth] = size;
    let mut data = GeometryData::new();

    // +X, -X
    build_face(&mut data, (2, 1, 0), -1.0, -1.0, zs, ys, depth, height, width * 0.5);
    build_face(&mut data, (2, 1, 0), 1.0, -1.0, zs, ys, depth, height, -width * 0.5);
    // +Y, -Y
    build_face(&mut data, (0, 2, 1), 1.0, 1.0, xs, zs, width, depth, height * 0.5);
    build_face(&mut data, (0, 2, 1), 1.0, -1.0, xs, zs, width, depth, -height * 0.5);
    // +Z, -Z
    build_face(&mut data, (0, 1, 2), 1.0, -1.0, xs, ys, width, height, depth * 0.5);
    build_face(&mut data, (0, 1, 2), -1.0, -1.0, xs, ys, width, height, -depth * 0.5);

    data
}

/// Generate a box centered at the origin
///
/// Each face is subdivided by the segment counts of its two spanning axes.
pub fn generate_box(params: &BoxParams) -> GeometryData {
    let xs = centered_steps(params.width, params.width_segments);
    let ys = centered_steps(params.height, params.height_segments);
    let zs = centered_steps(params.depth, params.depth_segments);

    box_faces([params.width, params.height, params.depth], &xs, &ys, &zs)
}

/// UV sphere parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

/// Generate a UV sphere with specified resolution
///
/// Degenerate triangles at the poles are skipped unless the sphere is cut open
/// by its theta range.
pub fn generate_sphere(params: &SphereParams) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = params.width_segments.max(3);
    let lat_segs = params.height_segments.max(2);
    let theta_end = (params.theta_start + params.theta_length).min(PI);

    for lat in 0..=lat_segs {
        let v = lat as f32 / lat_segs as f32;
        let theta = params.theta_start + v * params.theta_length;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let u = long as f32 / long_segs as f32;
            let phi = params.phi_start + u * params.phi_length;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = -params.radius * cos_phi * sin_theta;
            let y = params.radius * cos_theta;
            let z = params.radius * sin_phi * sin_theta;

            let normal = Vector3::new(x, y, z);
            let normal = if normal.magnitude2() > 0.0 {
                normal.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            };

            data.push_vertex([x, y, z], normal, [u, 1.0 - v]);
        }
    }

    let row = long_segs + 1;
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let a = lat * row + long + 1;
            let b = lat * row + long;
            let c = (lat + 1) * row + long;
            let d = (lat + 1) * row + long + 1;

            if lat != 0 || params.theta_start > 0.0 {
                data.push_triangle(a, b, d);
            }
            if lat != lat_segs - 1 || theta_end < PI {
                data.push_triangle(b, c, d);
            }
        }
    }

    data
}

/// Plane parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaneParams {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

/// Generate a plane in the XY plane facing positive Z
///
/// Returns a plane centered at the origin with rows emitted top to bottom.
pub fn generate_plane(params: &PlaneParams) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = params.width_segments.max(1);
    let h_segs = params.height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (0.5 - v) * params.height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * params.width;

            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0], [u, 1.0 - v]);
        }
    }

    let row = w_segs + 1;
    for y in 0..h_segs {
        for x in 0..w_segs {
            let a = x + row * y;
            let b = x + row * (y + 1);
            let c = (x + 1) + row * (y + 1);
            let d = (x + 1) + row * y;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Cylinder parameters; `radius_top` may differ from `radius_bottom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 8,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Generate a cylinder (or truncated cone) along the Y axis
///
/// The body extends from `-height / 2` to `height / 2`; caps are added unless the
/// cylinder is open ended or the corresponding radius is zero.
pub fn generate_cylinder(params: &CylinderParams) -> GeometryData {
    let h_segs = params.height_segments.max(1);
    let half_height = params.height * 0.5;

    let slope = if params.height != 0.0 {
        (params.radius_bottom - params.radius_top) / params.height
    } else {
        0.0
    };
    let normal_len = (1.0 + slope * slope).sqrt();
    let normal = [1.0 / normal_len, slope / normal_len];

    let profile: Vec<ProfilePoint> = (0..=h_segs)
        .map(|i| {
            let t = i as f32 / h_segs as f32;
            ProfilePoint {
                radius: params.radius_bottom + (params.radius_top - params.radius_bottom) * t,
                y: -half_height + t * params.height,
                normal,
                v: t,
            }
        })
        .collect();

    let mut data = lathe::revolve(
        &profile,
        params.radial_segments,
        params.theta_start,
        params.theta_length,
    );

    if !params.open_ended {
        if params.radius_top > 0.0 {
            data.merge(&lathe::cap(
                params.radius_top,
                half_height,
                params.radial_segments,
                params.theta_start,
                params.theta_length,
                true,
            ));
        }
        if params.radius_bottom > 0.0 {
            data.merge(&lathe::cap(
                params.radius_bottom,
                -half_height,
                params.radial_segments,
                params.theta_start,
                params.theta_length,
                false,
            ));
        }
    }

    data
}

/// Cone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConeParams {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 1.0,
            radial_segments: 8,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Generate a cone with its apex at `+height / 2`
pub fn generate_cone(params: &ConeParams) -> GeometryData {
    generate_cylinder(&CylinderParams {
        radius_top: 0.0,
        radius_bottom: params.radius,
        height: params.height,
        radial_segments: params.radial_segments,
        height_segments: params.height_segments,
        open_ended: params.open_ended,
        theta_start: params.theta_start,
        theta_length: params.theta_length,
    })
}

/// Flat disc parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircleParams {
    pub radius: f32,
    pub segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 8,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Generate a disc (or sector) in the XY plane facing positive Z
pub fn generate_circle(params: &CircleParams) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = params.segments.max(3);

    data.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.5, 0.5]);

    for s in 0..=segs {
        let angle = params.theta_start + s as f32 / segs as f32 * params.theta_length;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex(
            [params.radius * cos_a, params.radius * sin_a, 0.0],
            [0.0, 0.0, 1.0],
            [(cos_a + 1.0) * 0.5, (sin_a + 1.0) * 0.5],
        );
    }

    for i in 1..=segs {
        data.push_triangle(i, i + 1, 0);
    }

    data
}

/// Flat annulus parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingParams {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub theta_segments: u32,
    pub phi_segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            inner_radius: 0.5,
            outer_radius: 1.0,
            theta_segments: 8,
            phi_segments: 1,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Generate a ring in the XY plane facing positive Z
pub fn generate_ring(params: &RingParams) -> GeometryData {
    let mut data = GeometryData::new();
    let theta_segs = params.theta_segments.max(3);
    let phi_segs = params.phi_segments.max(1);
    let radius_step = (params.outer_radius - params.inner_radius) / phi_segs as f32;
    let outer = if params.outer_radius != 0.0 {
        params.outer_radius
    } else {
        1.0
    };

    for j in 0..=phi_segs {
        let radius = params.inner_radius + radius_step * j as f32;
        for i in 0..=theta_segs {
            let segment = params.theta_start + i as f32 / theta_segs as f32 * params.theta_length;
            let (sin_s, cos_s) = segment.sin_cos();
            let x = radius * cos_s;
            let y = radius * sin_s;
            data.push_vertex(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x / outer + 1.0) * 0.5, (y / outer + 1.0) * 0.5],
            );
        }
    }

    let row = theta_segs + 1;
    for j in 0..phi_segs {
        for i in 0..theta_segs {
            let segment = i + j * row;
            let a = segment;
            let b = segment + row;
            let c = segment + row + 1;
            let d = segment + 1;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Torus parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TorusParams {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub arc: f32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.4,
            radial_segments: 8,
            tubular_segments: 6,
            arc: TAU,
        }
    }
}

/// Generate a torus lying in the XY plane
pub fn generate_torus(params: &TorusParams) -> GeometryData {
    let mut data = GeometryData::new();
    let radial = params.radial_segments.max(3);
    let tubular = params.tubular_segments.max(3);

    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * params.arc;
            let v = j as f32 / radial as f32 * TAU;
            let (sin_u, cos_u) = u.sin_cos();
            let (sin_v, cos_v) = v.sin_cos();

            let position = Vector3::new(
                (params.radius + params.tube * cos_v) * cos_u,
                (params.radius + params.tube * cos_v) * sin_u,
                params.tube * sin_v,
            );
            let center = Vector3::new(params.radius * cos_u, params.radius * sin_u, 0.0);
            let offset = position - center;
            let normal = if offset.magnitude2() > 0.0 {
                offset.normalize().into()
            } else {
                [0.0, 0.0, 1.0]
            };

            data.push_vertex(
                position.into(),
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}
