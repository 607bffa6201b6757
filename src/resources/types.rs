//! Binary resources held by the editor
//!
//! Images, videos, audio clips, fonts and generic files all keep their encoded
//! bytes plus a short encoding name. Textures reference an image or a video by
//! uuid.

use super::collection::Resource;
use super::sniff;
use crate::gfx::geometry::Geometry;
use serde::{Deserialize, Serialize};

macro_rules! binary_resource {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $ty {
            pub uuid: String,
            pub name: String,
            /// Short encoding name, e.g. `png` or `mp3`
            pub encoding: String,
            #[serde(skip)]
            pub data: Vec<u8>,
        }

        impl $ty {
            pub fn new(
                uuid: impl Into<String>,
                name: impl Into<String>,
                encoding: impl Into<String>,
                data: Vec<u8>,
            ) -> Self {
                Self {
                    uuid: uuid.into(),
                    name: name.into(),
                    encoding: encoding.into(),
                    data,
                }
            }

            /// Wraps file contents under a fresh uuid, sniffing the encoding
            pub fn from_file(file_name: &str, data: Vec<u8>) -> Self {
                Self::new(
                    uuid::Uuid::new_v4().to_string(),
                    display_name(file_name),
                    sniff::encoding(file_name, &data),
                    data,
                )
            }

            pub fn size(&self) -> usize {
                self.data.len()
            }
        }

        impl Resource for $ty {
            fn uuid(&self) -> &str {
                &self.uuid
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

/// File name without directories and extension
pub fn display_name(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

binary_resource!(
    /// Encoded still image
    Image
);
binary_resource!(
    /// Encoded video
    Video
);
binary_resource!(
    /// Encoded audio clip
    Audio
);
binary_resource!(
    /// Font file
    Font
);
binary_resource!(
    /// Any other file kept with the project
    FileResource
);

impl Image {
    pub fn decode(&self) -> Result<image::DynamicImage, image::ImageError> {
        image::load_from_memory(&self.data)
    }
}

/// Where a texture takes its pixels from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "uuid")]
pub enum TextureSource {
    /// Uuid of an [`Image`]
    Image(String),
    /// Uuid of a [`Video`]
    Video(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub uuid: String,
    pub name: String,
    pub source: TextureSource,
}

impl Texture {
    pub fn new(name: impl Into<String>, source: TextureSource) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            source,
        }
    }

    /// `Texture` for image textures, `VideoTexture` for video textures
    pub fn type_name(&self) -> &'static str {
        match self.source {
            TextureSource::Image(_) => "Texture",
            TextureSource::Video(_) => "VideoTexture",
        }
    }
}

impl Resource for Texture {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Geometry {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file() {
        let image = Image::from_file("textures/Brick Wall.PNG", vec![1, 2, 3]);
        assert_eq!(image.name, "Brick Wall");
        assert_eq!(image.encoding, "png");
        assert_eq!(image.size(), 3);
        assert!(uuid::Uuid::parse_str(&image.uuid).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let image = Image::new("i", "broken", "png", vec![0; 8]);
        assert!(image.decode().is_err());
    }

    #[test]
    fn test_texture_type_name() {
        let still = Texture::new("a", TextureSource::Image("i".to_string()));
        let moving = Texture::new("b", TextureSource::Video("v".to_string()));
        assert_eq!(still.type_name(), "Texture");
        assert_eq!(moving.type_name(), "VideoTexture");
    }
}
