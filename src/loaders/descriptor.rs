//! Geometry descriptors
//!
//! A descriptor is a JSON record `{ type | format, ...parameters, uuid, name }`.
//! [`GeometryDescriptor::classify`] turns one into a closed set of variants so the
//! loader can match on the kind instead of comparing strings.

use super::error::GeometryError;
use crate::gfx::geometry::{CapsuleParams, ParametricParams, RoundedBoxParams, TerrainParams};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const CAPSULE: &str = "CapsuleBufferGeometry";
pub const ROUNDED_BOX: &str = "RoundedBoxBufferGeometry";
pub const TERRAIN: &str = "TerrainBufferGeometry";
pub const PARAMETRIC: &str = "ParametricBufferGeometry";
pub const LEGACY: &str = "Geometry";
pub const CHUNK_FORMAT: &str = "chunk";

/// Identity fields that travel beside every descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorHeader {
    pub uuid: Option<String>,
    pub name: Option<String>,
}

impl DescriptorHeader {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            uuid: text("uuid"),
            name: text("name"),
        }
    }
}

/// What a descriptor asks the loader to build
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    Capsule(CapsuleParams),
    RoundedBox(RoundedBoxParams),
    Terrain(TerrainParams),
    Parametric(ParametricParams),
    /// Payload of a legacy JSON model, the descriptor's `data` field
    Legacy(Value),
    /// Geometry stored in a side file, relative to the project directory
    Chunk { path: String },
    /// Anything else, handed whole to the generic parser
    Generic(Value),
}

fn params<T: DeserializeOwned>(kind: &str, value: &Value) -> Result<T, GeometryError> {
    T::deserialize(value).map_err(|e| GeometryError::invalid(kind, e))
}

impl GeometryDescriptor {
    /// Classifies a descriptor
    ///
    /// Named `type` tags win; then, when `allow_chunk` is set, `format == "chunk"`;
    /// everything else is generic.
    pub fn classify(value: &Value, allow_chunk: bool) -> Result<Self, GeometryError> {
        let descriptor = match value.get("type").and_then(Value::as_str) {
            Some(CAPSULE) => GeometryDescriptor::Capsule(params(CAPSULE, value)?),
            Some(ROUNDED_BOX) => GeometryDescriptor::RoundedBox(params(ROUNDED_BOX, value)?),
            Some(TERRAIN) => GeometryDescriptor::Terrain(params(TERRAIN, value)?),
            Some(PARAMETRIC) => GeometryDescriptor::Parametric(params(PARAMETRIC, value)?),
            Some(LEGACY) => {
                GeometryDescriptor::Legacy(value.get("data").cloned().unwrap_or(Value::Null))
            }
            _ if allow_chunk
                && value.get("format").and_then(Value::as_str) == Some(CHUNK_FORMAT) =>
            {
                let path = value
                    .get("path")
                    .and_then(Value::as_str)
                    .ok_or(GeometryError::MissingField("path"))?;
                GeometryDescriptor::Chunk {
                    path: path.to_string(),
                }
            }
            _ => GeometryDescriptor::Generic(value.clone()),
        };

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rounded_box_fields() {
        let value = json!({
            "type": "RoundedBoxBufferGeometry",
            "width": 2.0, "height": 3.0, "depth": 4.0,
            "radius": 0.25, "radiusSegments": 5
        });
        let descriptor = GeometryDescriptor::classify(&value, true).unwrap();
        assert_eq!(
            descriptor,
            GeometryDescriptor::RoundedBox(RoundedBoxParams {
                width: 2.0,
                height: 3.0,
                depth: 4.0,
                radius: 0.25,
                radius_segments: 5,
            })
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let value = json!({ "type": "CapsuleBufferGeometry", "height": 5.0 });
        match GeometryDescriptor::classify(&value, true).unwrap() {
            GeometryDescriptor::Capsule(params) => {
                assert_eq!(params.height, 5.0);
                assert_eq!(params.radial_segments, CapsuleParams::default().radial_segments);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_type_is_an_error() {
        let value = json!({ "type": "TerrainBufferGeometry", "width": "wide" });
        assert!(matches!(
            GeometryDescriptor::classify(&value, true),
            Err(GeometryError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_type_wins_over_chunk_format() {
        let value = json!({ "type": "ParametricBufferGeometry", "format": "chunk", "path": "a.json" });
        assert!(matches!(
            GeometryDescriptor::classify(&value, true).unwrap(),
            GeometryDescriptor::Parametric(_)
        ));
    }

    #[test]
    fn test_chunk_only_when_allowed() {
        let value = json!({ "format": "chunk", "path": "geometry/a.json" });
        assert_eq!(
            GeometryDescriptor::classify(&value, true).unwrap(),
            GeometryDescriptor::Chunk {
                path: "geometry/a.json".to_string()
            }
        );
        assert_eq!(
            GeometryDescriptor::classify(&value, false).unwrap(),
            GeometryDescriptor::Generic(value.clone())
        );
    }

    #[test]
    fn test_chunk_without_path() {
        let value = json!({ "format": "chunk" });
        assert!(matches!(
            GeometryDescriptor::classify(&value, true),
            Err(GeometryError::MissingField("path"))
        ));
    }

    #[test]
    fn test_header() {
        let header = DescriptorHeader::from_value(&json!({ "uuid": "u-1" }));
        assert_eq!(header.uuid.as_deref(), Some("u-1"));
        assert_eq!(header.name, None);
    }
}
