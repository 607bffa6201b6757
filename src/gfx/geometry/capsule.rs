//! Capsule geometry
//!
//! A capsule is a cylinder or truncated cone whose ends are closed by spherical
//! caps. The cone side is tangent to both caps, so a capsule with different radii
//! stays smooth where the caps meet the body.

use super::lathe::{self, ProfilePoint};
use super::GeometryData;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Capsule parameters, in descriptor field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapsuleParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    /// Distance between the two cap centers
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub caps_top_segments: u32,
    pub caps_bottom_segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CapsuleParams {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 8,
            height_segments: 1,
            caps_top_segments: 2,
            caps_bottom_segments: 2,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Builds the capsule outline from the bottom pole to the top pole
fn capsule_profile(params: &CapsuleParams) -> Vec<ProfilePoint> {
    let half_height = params.height * 0.5;
    let rt = params.radius_top.max(0.0);
    let rb = params.radius_bottom.max(0.0);

    // Angle between +Y and the normal of the side shared by both caps
    let alpha = if params.height > 0.0 {
        ((rb - rt) / params.height).clamp(-1.0, 1.0).acos()
    } else {
        PI * 0.5
    };

    let caps_bottom = params.caps_bottom_segments.max(1);
    let caps_top = params.caps_top_segments.max(1);
    let body = params.height_segments.max(1);

    let mut points = Vec::with_capacity((caps_bottom + body + caps_top + 1) as usize);

    // Bottom cap: normal sweeps from straight down up to the side normal
    for i in 0..=caps_bottom {
        let t = i as f32 / caps_bottom as f32;
        let beta = PI + (alpha - PI) * t;
        let (sin_b, cos_b) = beta.sin_cos();
        points.push(ProfilePoint {
            radius: rb * sin_b,
            y: -half_height + rb * cos_b,
            normal: [sin_b, cos_b],
            v: 0.0,
        });
    }

    // Body: straight segment between the two tangent rings
    let (sin_a, cos_a) = alpha.sin_cos();
    let bottom_tangent = (rb * sin_a, -half_height + rb * cos_a);
    let top_tangent = (rt * sin_a, half_height + rt * cos_a);
    for i in 1..=body {
        let t = i as f32 / body as f32;
        points.push(ProfilePoint {
            radius: bottom_tangent.0 + (top_tangent.0 - bottom_tangent.0) * t,
            y: bottom_tangent.1 + (top_tangent.1 - bottom_tangent.1) * t,
            normal: [sin_a, cos_a],
            v: 0.0,
        });
    }

    // Top cap: normal sweeps from the side normal up to straight up
    for i in 1..=caps_top {
        let t = i as f32 / caps_top as f32;
        let beta = alpha * (1.0 - t);
        let (sin_b, cos_b) = beta.sin_cos();
        points.push(ProfilePoint {
            radius: rt * sin_b,
            y: half_height + rt * cos_b,
            normal: [sin_b, cos_b],
            v: 0.0,
        });
    }

    // Texture v follows arc length along the outline
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    lengths.push(0.0);
    for pair in points.windows(2) {
        let dr = pair[1].radius - pair[0].radius;
        let dy = pair[1].y - pair[0].y;
        total += (dr * dr + dy * dy).sqrt();
        lengths.push(total);
    }
    if total > 0.0 {
        for (point, length) in points.iter_mut().zip(lengths) {
            point.v = length / total;
        }
    }

    points
}

/// Generate a capsule along the Y axis
///
/// The cap centers sit at `-height / 2` and `height / 2`, so the overall extent is
/// `height + radius_top + radius_bottom`.
pub fn generate_capsule(params: &CapsuleParams) -> GeometryData {
    let profile = capsule_profile(params);
    lathe::revolve(
        &profile,
        params.radial_segments,
        params.theta_start,
        params.theta_length,
    )
}
