//! Content sniffing for dropped and imported files
//!
//! Magic bytes decide first; the file extension is only consulted when the
//! content is not recognized.

use std::path::Path;

/// Broad kind of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Font,
    Model,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tga", "tif", "tiff", "ico",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv", "ogv", "avi"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "flac", "aac", "m4a", "opus"];
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2", "ttc"];
const MODEL_EXTENSIONS: &[&str] = &["obj"];

/// Lowercase extension of a file name, if any
pub fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn has_extension(name: &str, list: &[&str]) -> bool {
    extension(name).is_some_and(|e| list.contains(&e.as_str()))
}

/// ISO base media brand (`ftyp` box), e.g. `isom` or `M4A `
fn ftyp_brand(data: &[u8]) -> Option<&[u8]> {
    (data.len() >= 12 && &data[4..8] == b"ftyp").then(|| &data[8..12])
}

fn riff_form(data: &[u8]) -> Option<&[u8]> {
    (data.len() >= 12 && data.starts_with(b"RIFF")).then(|| &data[8..12])
}

fn is_ogg_video(data: &[u8]) -> bool {
    data.starts_with(b"OggS") && data.windows(6).take(128).any(|w| w == b"theora")
}

fn image_magic(data: &[u8]) -> bool {
    image::guess_format(data).is_ok()
}

fn video_magic(data: &[u8]) -> bool {
    if let Some(brand) = ftyp_brand(data) {
        return !matches!(brand, b"M4A " | b"M4B " | b"M4P ");
    }
    data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3])
        || riff_form(data) == Some(b"AVI ".as_slice())
        || is_ogg_video(data)
}

fn audio_magic(data: &[u8]) -> bool {
    if let Some(brand) = ftyp_brand(data) {
        return matches!(brand, b"M4A " | b"M4B " | b"M4P ");
    }
    data.starts_with(b"ID3")
        || data.starts_with(b"fLaC")
        || riff_form(data) == Some(b"WAVE".as_slice())
        || (data.starts_with(b"OggS") && !is_ogg_video(data))
        || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
}

fn font_magic(data: &[u8]) -> bool {
    data.starts_with(&[0x00, 0x01, 0x00, 0x00])
        || data.starts_with(b"OTTO")
        || data.starts_with(b"true")
        || data.starts_with(b"ttcf")
        || data.starts_with(b"wOFF")
        || data.starts_with(b"wOF2")
}

/// Whether the file holds an image
pub fn is_image(name: &str, data: &[u8]) -> bool {
    image_magic(data) || (!known_magic(data) && has_extension(name, IMAGE_EXTENSIONS))
}

/// Whether the file holds a video
pub fn is_video(name: &str, data: &[u8]) -> bool {
    video_magic(data) || (!known_magic(data) && has_extension(name, VIDEO_EXTENSIONS))
}

/// Whether the file holds audio
pub fn is_audio(name: &str, data: &[u8]) -> bool {
    audio_magic(data) || (!known_magic(data) && has_extension(name, AUDIO_EXTENSIONS))
}

/// Whether the file holds a font
pub fn is_font(name: &str, data: &[u8]) -> bool {
    font_magic(data) || (!known_magic(data) && has_extension(name, FONT_EXTENSIONS))
}

/// Whether the file holds a 3D model; models have no magic and go by extension
pub fn is_model(name: &str, data: &[u8]) -> bool {
    !known_magic(data) && has_extension(name, MODEL_EXTENSIONS)
}

fn known_magic(data: &[u8]) -> bool {
    image_magic(data) || video_magic(data) || audio_magic(data) || font_magic(data)
}

/// Classifies a file, trying image, video, audio, font and model in that order
pub fn classify(name: &str, data: &[u8]) -> Option<MediaKind> {
    if is_image(name, data) {
        Some(MediaKind::Image)
    } else if is_video(name, data) {
        Some(MediaKind::Video)
    } else if is_audio(name, data) {
        Some(MediaKind::Audio)
    } else if is_font(name, data) {
        Some(MediaKind::Font)
    } else if is_model(name, data) {
        Some(MediaKind::Model)
    } else {
        None
    }
}

/// Short encoding name for a file, e.g. `png` or `mp3`
pub fn encoding(name: &str, data: &[u8]) -> String {
    if let Ok(format) = image::guess_format(data) {
        if let Some(ext) = format.extensions_str().first() {
            return ext.to_string();
        }
    }
    extension(name).unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const MP4: &[u8] = b"\0\0\0\x18ftypisom\0\0\0\0";
    const M4A: &[u8] = b"\0\0\0\x18ftypM4A \0\0\0\0";
    const WAV: &[u8] = b"RIFF\x24\0\0\0WAVEfmt ";
    const TTF: &[u8] = &[0x00, 0x01, 0x00, 0x00, 0x00, 0x0A];

    #[test]
    fn test_magic_beats_extension() {
        assert_eq!(classify("photo.mp3", PNG), Some(MediaKind::Image));
        assert_eq!(classify("clip.png", MP4), Some(MediaKind::Video));
    }

    #[test]
    fn test_container_brands() {
        assert_eq!(classify("a", MP4), Some(MediaKind::Video));
        assert_eq!(classify("a", M4A), Some(MediaKind::Audio));
        assert_eq!(classify("a", WAV), Some(MediaKind::Audio));
        assert_eq!(classify("a", b"ID3\x04\0\0\0\0"), Some(MediaKind::Audio));
    }

    #[test]
    fn test_fonts() {
        assert_eq!(classify("font", TTF), Some(MediaKind::Font));
        assert_eq!(classify("font", b"wOF2\0\x01"), Some(MediaKind::Font));
        assert_eq!(classify("font", b"OTTO\0\x0A"), Some(MediaKind::Font));
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(classify("Scene.OBJ", b"v 0 0 0\n"), Some(MediaKind::Model));
        assert_eq!(classify("sprite.tga", &[0, 0, 2, 0]), Some(MediaKind::Image));
        assert_eq!(classify("notes.txt", b"hello"), None);
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encoding("whatever", PNG), "png");
        assert_eq!(encoding("song.MP3", b"ID3"), "mp3");
        assert_eq!(encoding("blob", b"\0"), "bin");
    }
}
