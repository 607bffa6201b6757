//! Parametric surfaces
//!
//! Samples a [`SurfaceProgram`] over a `(slices + 1) x (stacks + 1)` grid of
//! `(u, v)` parameters.

use super::expression::{ExpressionError, SurfaceProgram};
use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Step used for finite-difference tangents
const EPS: f32 = 1e-4;

/// Parametric surface parameters, in descriptor field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParametricParams {
    /// Surface program source, see [`super::expression`]
    pub code: String,
    pub slices: u32,
    pub stacks: u32,
}

impl Default for ParametricParams {
    fn default() -> Self {
        Self {
            code: "x = u - 0.5; y = v - 0.5; z = 0".to_string(),
            slices: 8,
            stacks: 8,
        }
    }
}

/// Generate a parametric surface
///
/// Fails only when the program does not compile.
pub fn generate_parametric(params: &ParametricParams) -> Result<GeometryData, ExpressionError> {
    let program = SurfaceProgram::compile(&params.code)?;
    let mut data = GeometryData::new();
    let mut slots = Vec::new();

    let slices = params.slices.max(1);
    let stacks = params.stacks.max(1);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;

            let p = Vector3::from(program.eval_with(&mut slots, u, v));

            let pu = if u - EPS >= 0.0 {
                p - Vector3::from(program.eval_with(&mut slots, u - EPS, v))
            } else {
                Vector3::from(program.eval_with(&mut slots, u + EPS, v)) - p
            };
            let pv = if v - EPS >= 0.0 {
                p - Vector3::from(program.eval_with(&mut slots, u, v - EPS))
            } else {
                Vector3::from(program.eval_with(&mut slots, u, v + EPS)) - p
            };

            let normal = pu.cross(pv);
            let normal = if normal.magnitude2() > 0.0 {
                normal.normalize().into()
            } else {
                [0.0, 0.0, 1.0]
            };

            data.push_vertex(p.into(), normal, [u, v]);
        }
    }

    let row = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = i * row + j + 1;
            let c = (i + 1) * row + j + 1;
            let d = (i + 1) * row + j;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plane() {
        let data = generate_parametric(&ParametricParams::default()).unwrap();
        assert_eq!(data.vertex_count(), 81);
        assert_eq!(data.triangle_count(), 128);
        for n in &data.normals {
            assert!((n[2] - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sphere_program() {
        let params = ParametricParams {
            code: "
                let theta = v * pi
                let phi = u * 2 * pi
                x = sin(theta) * cos(phi)
                y = cos(theta)
                z = sin(theta) * sin(phi)
            "
            .to_string(),
            slices: 12,
            stacks: 6,
        };
        let data = generate_parametric(&params).unwrap();
        for p in &data.vertices {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_invalid_code_is_reported() {
        let params = ParametricParams {
            code: "x = u".to_string(),
            ..Default::default()
        };
        assert_eq!(
            generate_parametric(&params),
            Err(ExpressionError::MissingOutput("y"))
        );
    }
}
