//! Flat shapes
//!
//! Shapes are closed 2D outlines supplied by the caller and referenced from
//! descriptors by uuid. Each outline is triangulated by ear clipping and placed in
//! the XY plane facing positive Z.

use super::GeometryData;
use serde::{Deserialize, Serialize};

/// A closed 2D outline, already flattened to a polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub uuid: String,
    pub points: Vec<[f32; 2]>,
}

impl Shape {
    pub fn new(uuid: impl Into<String>, points: Vec<[f32; 2]>) -> Self {
        Self {
            uuid: uuid.into(),
            points,
        }
    }

    /// Twice the signed area, positive for counter-clockwise outlines
    fn signed_area2(points: &[[f32; 2]]) -> f32 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let p = points[i];
                let q = points[(i + 1) % n];
                p[0] * q[1] - q[0] * p[1]
            })
            .sum()
    }
}

/// One shape uuid or a list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeRefs {
    One(String),
    Many(Vec<String>),
}

impl ShapeRefs {
    pub fn uuids(&self) -> Vec<&str> {
        match self {
            ShapeRefs::One(uuid) => vec![uuid.as_str()],
            ShapeRefs::Many(uuids) => uuids.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for ShapeRefs {
    fn default() -> Self {
        ShapeRefs::Many(Vec::new())
    }
}

/// Shape geometry parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeParams {
    pub shapes: ShapeRefs,
    /// Kept for descriptor compatibility; outlines arrive already flattened
    pub curve_segments: u32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            shapes: ShapeRefs::default(),
            curve_segments: 12,
        }
    }
}

fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn inside_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear-clips a simple polygon, returning index triples into `points`
///
/// The outline may wind either way; triangles always come out counter-clockwise.
pub fn triangulate(points: &[[f32; 2]]) -> Vec<[usize; 3]> {
    let mut ring: Vec<usize> = (0..points.len()).collect();

    // Drop an explicit closing point
    if ring.len() > 1 && points[0] == points[ring.len() - 1] {
        ring.pop();
    }
    if ring.len() < 3 {
        return Vec::new();
    }

    let outline: Vec<[f32; 2]> = ring.iter().map(|&i| points[i]).collect();
    if Shape::signed_area2(&outline) < 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while ring.len() > 3 {
        let len = ring.len();
        let ear = (0..len).find(|&i| {
            let prev = ring[(i + len - 1) % len];
            let cur = ring[i];
            let next = ring[(i + 1) % len];
            let (a, b, c) = (points[prev], points[cur], points[next]);

            if cross(a, b, c) <= f32::EPSILON {
                return false;
            }

            ring.iter()
                .filter(|&&k| k != prev && k != cur && k != next)
                .all(|&k| !inside_triangle(points[k], a, b, c))
        });

        let Some(i) = ear else {
            // Self-intersecting or degenerate outline
            log::warn!("Shape outline is not simple, {} vertices left untriangulated", len);
            return triangles;
        };

        triangles.push([ring[(i + len - 1) % len], ring[i], ring[(i + 1) % len]]);
        ring.remove(i);
    }

    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

/// Generate flat geometry for a list of shapes
pub fn generate_shape(shapes: &[&Shape]) -> GeometryData {
    let mut data = GeometryData::new();

    for shape in shapes {
        let base = data.vertex_count() as u32;
        for p in &shape.points {
            data.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, 1.0], *p);
        }
        for [a, b, c] in triangulate(&shape.points) {
            data.push_triangle(base + a as u32, base + b as u32, base + c as u32);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_either_winding() {
        let ccw = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let mut cw = ccw;
        cw.reverse();

        for outline in [ccw, cw] {
            let triangles = triangulate(&outline);
            assert_eq!(triangles.len(), 2);
            for [a, b, c] in triangles {
                assert!(cross(outline[a], outline[b], outline[c]) > 0.0);
            }
        }
    }

    #[test]
    fn test_concave_outline() {
        // L shape
        let outline = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ];
        let triangles = triangulate(&outline);
        assert_eq!(triangles.len(), 4);

        let area: f32 = triangles
            .iter()
            .map(|[a, b, c]| cross(outline[*a], outline[*b], outline[*c]) * 0.5)
            .sum();
        assert!((area - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_closing_point_is_ignored() {
        let outline = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        assert_eq!(triangulate(&outline).len(), 1);
    }

    #[test]
    fn test_generate_multiple_shapes() {
        let a = Shape::new("a", vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let b = Shape::new("b", vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let data = generate_shape(&[&a, &b]);
        assert_eq!(data.vertex_count(), 7);
        assert_eq!(data.triangle_count(), 3);
        assert!(data.indices[3..].iter().all(|&i| i >= 3));
    }

    #[test]
    fn test_shape_refs_deserialize() {
        let one: ShapeRefs = serde_json::from_str("\"abc\"").unwrap();
        let many: ShapeRefs = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(one.uuids(), vec!["abc"]);
        assert_eq!(many.uuids(), vec!["a", "b"]);
    }
}
