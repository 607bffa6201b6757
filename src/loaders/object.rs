//! Generic geometry records
//!
//! Handles the standard geometry kinds of a scene file: the primitive set, flat
//! shapes and raw attribute buffers. Both the `...BufferGeometry` and the plain
//! `...Geometry` spelling of each tag are accepted.

use super::error::GeometryError;
use crate::gfx::geometry::{
    generate_box, generate_circle, generate_cone, generate_cylinder, generate_plane,
    generate_ring, generate_shape, generate_sphere, generate_torus, Geometry, GeometryData,
    GeometryParameters, Shape, ShapeParams,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

fn params<T: DeserializeOwned>(kind: &str, value: &Value) -> Result<T, GeometryError> {
    T::deserialize(value).map_err(|e| GeometryError::invalid(kind, e))
}

/// Reads `attributes.<name>.array` as floats grouped by `N`
fn attribute<const N: usize>(
    attributes: &Value,
    name: &str,
) -> Result<Option<Vec<[f32; N]>>, GeometryError> {
    let Some(array) = attributes.get(name).and_then(|a| a.get("array")) else {
        return Ok(None);
    };
    let values: Vec<f32> = params("BufferGeometry", array)?;

    if values.len() % N != 0 {
        return Err(GeometryError::Buffer(format!(
            "attribute '{}' length {} is not a multiple of {}",
            name,
            values.len(),
            N
        )));
    }

    Ok(Some(
        values
            .chunks_exact(N)
            .map(|chunk| {
                let mut item = [0.0; N];
                item.copy_from_slice(chunk);
                item
            })
            .collect(),
    ))
}

/// Builds mesh data from raw attribute arrays
///
/// Accepts both `{ data: { attributes, index } }` and a flat `{ attributes, index }`.
fn buffer_geometry(value: &Value) -> Result<GeometryData, GeometryError> {
    let body = value.get("data").unwrap_or(value);
    let attributes = body
        .get("attributes")
        .ok_or(GeometryError::MissingField("attributes"))?;

    let vertices = attribute::<3>(attributes, "position")?
        .ok_or(GeometryError::MissingField("attributes.position"))?;
    let count = vertices.len();

    let normals = attribute::<3>(attributes, "normal")?;
    let tex_coords = attribute::<2>(attributes, "uv")?.unwrap_or_else(|| vec![[0.0, 0.0]; count]);

    let indices: Vec<u32> = match body.get("index").and_then(|i| i.get("array")) {
        Some(array) => params("BufferGeometry", array)?,
        None => (0..count as u32).collect(),
    };

    if let Some(bad) = indices.iter().find(|&&i| i as usize >= count) {
        return Err(GeometryError::Buffer(format!(
            "index {} out of range for {} vertices",
            bad, count
        )));
    }
    if tex_coords.len() != count || normals.as_ref().is_some_and(|n| n.len() != count) {
        return Err(GeometryError::Buffer(
            "attribute lengths do not match position".to_string(),
        ));
    }

    let mut data = GeometryData {
        vertices,
        tex_coords,
        normals: normals.clone().unwrap_or_default(),
        indices,
    };
    if normals.is_none() {
        data.compute_vertex_normals();
    }

    Ok(data)
}

fn parse_geometry(
    value: &Value,
    shapes: &HashMap<String, Shape>,
) -> Result<Geometry, GeometryError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(GeometryError::MissingType)?;

    let base = kind
        .strip_suffix("BufferGeometry")
        .or_else(|| kind.strip_suffix("Geometry"))
        .unwrap_or(kind);

    let (parameters, data) = match base {
        "Box" => {
            let p = params(kind, value)?;
            let data = generate_box(&p);
            (GeometryParameters::Box(p), data)
        }
        "Sphere" => {
            let p = params(kind, value)?;
            let data = generate_sphere(&p);
            (GeometryParameters::Sphere(p), data)
        }
        "Plane" => {
            let p = params(kind, value)?;
            let data = generate_plane(&p);
            (GeometryParameters::Plane(p), data)
        }
        "Cylinder" => {
            let p = params(kind, value)?;
            let data = generate_cylinder(&p);
            (GeometryParameters::Cylinder(p), data)
        }
        "Cone" => {
            let p = params(kind, value)?;
            let data = generate_cone(&p);
            (GeometryParameters::Cone(p), data)
        }
        "Circle" => {
            let p = params(kind, value)?;
            let data = generate_circle(&p);
            (GeometryParameters::Circle(p), data)
        }
        "Ring" => {
            let p = params(kind, value)?;
            let data = generate_ring(&p);
            (GeometryParameters::Ring(p), data)
        }
        "Torus" => {
            let p = params(kind, value)?;
            let data = generate_torus(&p);
            (GeometryParameters::Torus(p), data)
        }
        "Shape" => {
            let p: ShapeParams = params(kind, value)?;
            let outlines = p
                .shapes
                .uuids()
                .into_iter()
                .map(|uuid| {
                    shapes
                        .get(uuid)
                        .ok_or_else(|| GeometryError::MissingShape(uuid.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let data = generate_shape(&outlines);
            (GeometryParameters::Shape(p), data)
        }
        "" if kind == "BufferGeometry" => (GeometryParameters::Buffer, buffer_geometry(value)?),
        _ => return Err(GeometryError::UnsupportedType(kind.to_string())),
    };

    let mut geometry = Geometry::new(parameters, data);
    if let Some(uuid) = value.get("uuid").and_then(Value::as_str) {
        geometry.uuid = uuid.to_string();
    }
    if let Some(name) = value.get("name").and_then(Value::as_str) {
        geometry.name = name.to_string();
    }

    Ok(geometry)
}

/// Parses a list of geometry records, preserving input order
///
/// `shapes` supplies the outlines referenced by shape geometries.
pub fn parse_geometries(
    values: &[Value],
    shapes: &HashMap<String, Shape>,
) -> Result<Vec<Geometry>, GeometryError> {
    values
        .iter()
        .map(|value| parse_geometry(value, shapes))
        .collect()
}

/// Parses a list of shape outlines, keyed by uuid for [`parse_geometries`]
///
/// Each record is `{ "uuid": .., "points": [[x, y], ..] }`.
pub fn parse_shapes(values: &[Value]) -> Result<HashMap<String, Shape>, GeometryError> {
    values
        .iter()
        .map(|value| {
            let shape: Shape = params("Shape", value)?;
            Ok((shape.uuid.clone(), shape))
        })
        .collect()
}
