//! Editor settings
//!
//! Settings are stored as JSON. A missing file means defaults; unknown fields are
//! ignored and missing fields take their defaults, so older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// General editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Edge length of asset previews in the asset explorer, in pixels
    pub file_preview_size: f32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            file_preview_size: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    pub general: GeneralSettings,
    /// Directory that chunk paths and relative project files resolve against
    pub project_path: PathBuf,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            project_path: PathBuf::from("."),
        }
    }
}

impl EditorSettings {
    /// Loads settings from `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EditorSettings::load(dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(settings.general.file_preview_size, 100.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = EditorSettings::default();
        settings.general.file_preview_size = 64.0;
        settings.project_path = PathBuf::from("/projects/demo");
        settings.save(&path).unwrap();

        assert_eq!(EditorSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "general": { "filePreviewSize": 80 } }"#).unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings.general.file_preview_size, 80.0);
        assert_eq!(settings.project_path, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EditorSettings::load(&path),
            Err(SettingsError::Json { .. })
        ));
    }
}
