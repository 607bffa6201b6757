//! Scene resources
//!
//! Everything a scene is authored from lives in a [`ResourceManager`]: materials,
//! geometries, textures, fonts, images, videos, audio and plain files. Files come
//! in through an [`AssetImporter`], which sniffs their content to decide what
//! they are.

pub mod collection;
pub mod import;
pub mod manager;
pub mod material;
pub mod sniff;
pub mod types;

pub use collection::{Resource, ResourceCollection};
pub use import::{AssetImporter, DroppedFile, ImportError, Imported, ImportedKind, ResourceImporter};
pub use manager::ResourceManager;
pub use material::Material;
pub use sniff::MediaKind;
pub use types::{Audio, FileResource, Font, Image, Texture, TextureSource, Video};
