//! Importing dropped files into a resource manager

use super::manager::ResourceManager;
use super::sniff;
use super::types::{display_name, Audio, Font, Image, Texture, TextureSource, Video};
use crate::gfx::geometry::{Geometry, GeometryData, GeometryParameters};
use std::cell::RefCell;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a valid image: {1}")]
    Image(String, #[source] image::ImageError),
    #[error("{0} is not a valid model: {1}")]
    Model(String, #[source] tobj::LoadError),
}

/// A file handed to the editor, e.g. by drag and drop
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFile {
    /// File name including extension
    pub name: String,
    /// Where the file came from, when it came from disk
    pub path: Option<PathBuf>,
    pub data: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: None,
            data,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            data,
        })
    }

    pub fn kind(&self) -> Option<sniff::MediaKind> {
        sniff::classify(&self.name, &self.data)
    }
}

/// Which collection an imported resource landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportedKind {
    Geometry,
    Texture,
    Font,
    Image,
    Video,
    Audio,
}

/// A resource created by an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub kind: ImportedKind,
    pub uuid: String,
}

impl Imported {
    fn new(kind: ImportedKind, uuid: String) -> Self {
        Self { kind, uuid }
    }
}

/// Entry points that turn files into scene resources
///
/// Each call returns every resource it created, in creation order.
pub trait AssetImporter {
    /// Image file into an image plus a texture using it
    fn load_texture(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError>;
    /// Video file into a video plus a texture playing it
    fn load_video_texture(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError>;
    fn load_audio(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError>;
    fn load_font(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError>;
    /// Model file into one geometry per mesh
    fn load_model(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError>;
}

/// Imports into a shared [`ResourceManager`]
pub struct ResourceImporter {
    manager: Rc<RefCell<ResourceManager>>,
}

impl ResourceImporter {
    pub fn new(manager: Rc<RefCell<ResourceManager>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Rc<RefCell<ResourceManager>> {
        &self.manager
    }
}

/// Converts one triangulated, single-index OBJ mesh
fn mesh_to_geometry(mesh: &tobj::Mesh) -> GeometryData {
    let vertices: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let count = vertices.len();

    let tex_coords = if mesh.texcoords.len() == count * 2 {
        mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
    } else {
        vec![[0.0, 0.0]; count]
    };

    let mut data = GeometryData {
        vertices,
        tex_coords,
        normals: Vec::new(),
        indices: mesh.indices.clone(),
    };

    // Use normals from the file if available, otherwise calculate them
    if mesh.normals.len() == count * 3 {
        data.normals = mesh
            .normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect();
    } else {
        data.compute_vertex_normals();
    }

    data
}

impl AssetImporter for ResourceImporter {
    fn load_texture(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
        let image = Image::from_file(&file.name, file.data.clone());
        image
            .decode()
            .map_err(|e| ImportError::Image(file.name.clone(), e))?;

        let mut manager = self.manager.borrow_mut();
        let texture = Texture::new(image.name.clone(), TextureSource::Image(image.uuid.clone()));
        let image = manager.add_image(image);
        let texture = manager.add_texture(texture);
        log::info!("Imported texture {}", file.name);

        Ok(vec![
            Imported::new(ImportedKind::Image, image),
            Imported::new(ImportedKind::Texture, texture),
        ])
    }

    fn load_video_texture(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
        let video = Video::from_file(&file.name, file.data.clone());

        let mut manager = self.manager.borrow_mut();
        let texture = Texture::new(video.name.clone(), TextureSource::Video(video.uuid.clone()));
        let video = manager.add_video(video);
        let texture = manager.add_texture(texture);
        log::info!("Imported video texture {}", file.name);

        Ok(vec![
            Imported::new(ImportedKind::Video, video),
            Imported::new(ImportedKind::Texture, texture),
        ])
    }

    fn load_audio(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
        let audio = Audio::from_file(&file.name, file.data.clone());
        let uuid = self.manager.borrow_mut().add_audio(audio);
        log::info!("Imported audio {}", file.name);

        Ok(vec![Imported::new(ImportedKind::Audio, uuid)])
    }

    fn load_font(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
        let font = Font::from_file(&file.name, file.data.clone());
        let uuid = self.manager.borrow_mut().add_font(font);
        log::info!("Imported font {}", file.name);

        Ok(vec![Imported::new(ImportedKind::Font, uuid)])
    }

    fn load_model(&mut self, file: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
        let directory = file
            .path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf);

        let (models, _materials) = tobj::load_obj_buf(
            &mut BufReader::new(file.data.as_slice()),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |mtl_path| match &directory {
                Some(dir) => tobj::load_mtl(dir.join(mtl_path)),
                None => Err(tobj::LoadError::OpenFileFailed),
            },
        )
        .map_err(|e| ImportError::Model(file.name.clone(), e))?;

        let base_name = display_name(&file.name);
        let mut manager = self.manager.borrow_mut();
        let mut imported = Vec::with_capacity(models.len());

        for (i, model) in models.iter().enumerate() {
            let name = if model.name.is_empty() || model.name == "unnamed_object" {
                format!("{}_{}", base_name, i)
            } else {
                model.name.clone()
            };

            let geometry = Geometry::new(GeometryParameters::Buffer, mesh_to_geometry(&model.mesh))
                .with_name(name);
            log::debug!(
                "Model mesh '{}': {} vertices, {} triangles",
                geometry.name,
                geometry.data.vertex_count(),
                geometry.data.triangle_count()
            );
            imported.push(Imported::new(
                ImportedKind::Geometry,
                manager.add_geometry(geometry),
            ));
        }

        log::info!("Imported model {} ({} meshes)", file.name, imported.len());
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn png_bytes() -> Vec<u8> {
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        png
    }

    fn importer() -> ResourceImporter {
        ResourceImporter::new(Rc::new(RefCell::new(ResourceManager::new())))
    }

    #[test]
    fn test_texture_creates_image_and_texture() {
        let mut importer = importer();
        let imported = importer
            .load_texture(&DroppedFile::new("bricks.png", png_bytes()))
            .unwrap();

        let kinds: Vec<ImportedKind> = imported.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ImportedKind::Image, ImportedKind::Texture]);

        let manager = importer.manager().borrow();
        let texture = manager.get_texture(&imported[1].uuid).unwrap();
        assert_eq!(texture.source, TextureSource::Image(imported[0].uuid.clone()));
        assert_eq!(texture.name, "bricks");
    }

    #[test]
    fn test_invalid_texture_is_rejected() {
        let mut importer = importer();
        let result = importer.load_texture(&DroppedFile::new("fake.png", vec![1, 2, 3]));
        assert!(matches!(result, Err(ImportError::Image(..))));
        assert!(importer.manager().borrow().is_empty());
    }

    #[test]
    fn test_model_meshes_become_geometries() {
        let mut importer = importer();
        let imported = importer
            .load_model(&DroppedFile::new("tri.obj", TRIANGLE_OBJ.as_bytes().to_vec()))
            .unwrap();

        assert_eq!(imported.len(), 1);
        let manager = importer.manager().borrow();
        let geometry = manager.get_geometry(&imported[0].uuid).unwrap();
        assert_eq!(geometry.name, "Tri");
        assert_eq!(geometry.data.triangle_count(), 1);
        assert!((geometry.data.normals[0][2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3\x04\0\0\0\0").unwrap();

        let file = DroppedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "song.mp3");
        assert_eq!(file.kind(), Some(sniff::MediaKind::Audio));
    }
}
