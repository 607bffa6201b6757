//! Geometry descriptor loader
//!
//! Turns JSON geometry descriptors into [`Geometry`] resources. Procedural kinds
//! are generated directly, legacy models go through [`LegacyGeometryLoader`],
//! chunk descriptors are read from a side file in the project directory, and
//! everything else is handed to [`parse_geometries`].

use super::descriptor::{DescriptorHeader, GeometryDescriptor};
use super::error::GeometryError;
use super::legacy::LegacyGeometryLoader;
use super::object::parse_geometries;
use crate::gfx::geometry::{
    generate_capsule, generate_parametric, generate_rounded_box, generate_terrain, Geometry,
    GeometryData, GeometryParameters, Shape, TerrainParams,
};
use crate::resources::Image;
use futures::io::{AllowStdIo, AsyncReadExt};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Bytes read per step by [`GeometryLoader::load_async`]
const READ_BLOCK: usize = 64 * 1024;

/// Progress of a file load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    /// File size, when the file system reports one
    pub total: Option<u64>,
}

/// Loads geometry descriptors
///
/// Terrain descriptors look their height map up in the images given to
/// [`set_images`](Self::set_images); shape descriptors look their outlines up in
/// the shapes given to [`set_shapes`](Self::set_shapes).
#[derive(Debug, Clone)]
pub struct GeometryLoader {
    project_path: PathBuf,
    images: HashMap<String, Image>,
    shapes: HashMap<String, Shape>,
}

impl Default for GeometryLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl GeometryLoader {
    /// Creates a loader resolving chunk paths against `project_path`
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            images: HashMap::new(),
            shapes: HashMap::new(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Images available to terrain descriptors, keyed by uuid
    pub fn set_images(&mut self, images: HashMap<String, Image>) -> &mut Self {
        self.images = images;
        self
    }

    /// Outlines available to shape descriptors, keyed by uuid
    pub fn set_shapes(&mut self, shapes: HashMap<String, Shape>) -> &mut Self {
        self.shapes = shapes;
        self
    }

    /// Resolves a chunk path, which may use either separator, against the project
    pub fn chunk_path(&self, relative: &str) -> PathBuf {
        relative
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .fold(self.project_path.clone(), |path, part| path.join(part))
    }

    /// Parses a geometry descriptor
    ///
    /// The result carries the descriptor's `uuid` (a fresh one when it has none)
    /// and `name` (`"geometry"` when it has none). A chunk descriptor instead
    /// returns whatever [`parse_chunk`](Self::parse_chunk) makes of its side file.
    pub fn parse(&self, data: &Value) -> Result<Geometry, GeometryError> {
        match GeometryDescriptor::classify(data, true)? {
            GeometryDescriptor::Chunk { path } => {
                let chunk = self.read_chunk(&path)?;
                self.parse_chunk(&chunk)
            }
            descriptor => {
                let geometry = self.build(descriptor)?;
                Ok(Self::stamp(geometry, DescriptorHeader::from_value(data)))
            }
        }
    }

    /// Parses the record stored in a chunk file
    ///
    /// Same as [`parse`](Self::parse) except that chunk descriptors are not
    /// followed; they go to the generic parser like any other unknown record.
    pub fn parse_chunk(&self, data: &Value) -> Result<Geometry, GeometryError> {
        let descriptor = GeometryDescriptor::classify(data, false)?;
        let geometry = self.build(descriptor)?;
        Ok(Self::stamp(geometry, DescriptorHeader::from_value(data)))
    }

    fn read_chunk(&self, relative: &str) -> Result<Value, GeometryError> {
        let path = self.chunk_path(relative);
        log::debug!("Reading geometry chunk {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|source| GeometryError::ChunkRead {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| GeometryError::ChunkDecode { path, source })
    }

    fn build(&self, descriptor: GeometryDescriptor) -> Result<Geometry, GeometryError> {
        let geometry = match descriptor {
            GeometryDescriptor::Capsule(params) => {
                let data = generate_capsule(&params);
                Geometry::new(GeometryParameters::Capsule(params), data)
            }
            GeometryDescriptor::RoundedBox(params) => {
                let data = generate_rounded_box(&params);
                Geometry::new(GeometryParameters::RoundedBox(params), data)
            }
            GeometryDescriptor::Terrain(params) => {
                let data = self.build_terrain(&params)?;
                Geometry::new(GeometryParameters::Terrain(params), data)
            }
            GeometryDescriptor::Parametric(params) => {
                let data = generate_parametric(&params)?;
                Geometry::new(GeometryParameters::Parametric(params), data)
            }
            GeometryDescriptor::Legacy(payload) => {
                LegacyGeometryLoader::new().parse(&payload)?.geometry
            }
            GeometryDescriptor::Generic(value) => {
                let mut geometries = parse_geometries(std::slice::from_ref(&value), &self.shapes)?;
                if geometries.is_empty() {
                    return Err(GeometryError::MissingType);
                }
                geometries.swap_remove(0)
            }
            GeometryDescriptor::Chunk { path } => {
                // Only reachable through parse, which follows the chunk itself
                return Err(GeometryError::UnsupportedType(format!("chunk {}", path)));
            }
        };

        log::debug!("Built {} geometry", geometry.type_name());
        Ok(geometry)
    }

    fn build_terrain(&self, params: &TerrainParams) -> Result<GeometryData, GeometryError> {
        let height_map = match params.image.as_deref() {
            Some(uuid) => match self.images.get(uuid) {
                Some(image) => Some(
                    image
                        .decode()
                        .map_err(|source| GeometryError::HeightMap {
                            uuid: uuid.to_string(),
                            source,
                        })?
                        .to_luma8(),
                ),
                None => {
                    log::warn!("Height map {} not found, terrain will be flat", uuid);
                    None
                }
            },
            None => None,
        };

        Ok(generate_terrain(params, height_map.as_ref()))
    }

    fn stamp(mut geometry: Geometry, header: DescriptorHeader) -> Geometry {
        geometry.uuid = header
            .uuid
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        geometry.name = header
            .name
            .unwrap_or_else(|| Geometry::DEFAULT_NAME.to_string());
        geometry
    }

    /// Reads and parses a descriptor file, reporting progress after each block
    pub async fn load_async<P>(
        &self,
        path: impl AsRef<Path>,
        mut on_progress: P,
    ) -> Result<Geometry, GeometryError>
    where
        P: FnMut(LoadProgress),
    {
        let file = std::fs::File::open(path.as_ref())?;
        let total = file.metadata().ok().map(|m| m.len());

        let mut reader = AllowStdIo::new(file);
        let mut buffer = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut block = vec![0u8; READ_BLOCK];

        loop {
            let read = reader.read(&mut block).await?;
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&block[..read]);
            on_progress(LoadProgress {
                loaded: buffer.len() as u64,
                total,
            });
        }

        let value: Value = serde_json::from_slice(&buffer)?;
        self.parse(&value)
    }

    /// Blocking wrapper around [`load_async`](Self::load_async)
    ///
    /// Exactly one of `on_load` and `on_error` is called.
    pub fn load<L, P, E>(&self, path: impl AsRef<Path>, on_load: L, on_progress: P, on_error: E)
    where
        L: FnOnce(Geometry),
        P: FnMut(LoadProgress),
        E: FnOnce(GeometryError),
    {
        let path = path.as_ref();
        match pollster::block_on(self.load_async(path, on_progress)) {
            Ok(geometry) => on_load(geometry),
            Err(e) => {
                log::warn!("Failed to load geometry {}: {}", path.display(), e);
                on_error(e);
            }
        }
    }
}
