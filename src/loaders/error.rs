use crate::gfx::geometry::expression::ExpressionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning geometry descriptors into meshes
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Unsupported geometry type: {0}")]
    UnsupportedType(String),
    #[error("Geometry descriptor has no type")]
    MissingType,
    #[error("Descriptor field '{0}' is missing")]
    MissingField(&'static str),
    #[error("Invalid parameters for {kind}: {source}")]
    InvalidParameters {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid parametric code: {0}")]
    Expression(#[from] ExpressionError),
    #[error("Shape not found: {0}")]
    MissingShape(String),
    #[error("Height map {uuid} could not be decoded: {source}")]
    HeightMap {
        uuid: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Malformed legacy geometry: {0}")]
    Legacy(String),
    #[error("Malformed buffer geometry: {0}")]
    Buffer(String),
    #[error("Failed to read chunk {path}: {source}")]
    ChunkRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode chunk {path}: {source}")]
    ChunkDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeometryError {
    pub(crate) fn invalid(kind: &str, source: serde_json::Error) -> Self {
        GeometryError::InvalidParameters {
            kind: kind.to_string(),
            source,
        }
    }
}
