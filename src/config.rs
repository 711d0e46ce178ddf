//! Raster output configuration, persisted as TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Settings controlling the rasterized output: the world-space scene window
/// that maps onto each image, the image resolution, and where PNGs are
/// written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub scene_width: f64,
    pub scene_height: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub output_prefix: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            scene_width: 192.0,
            scene_height: 108.0,
            image_width: 1920,
            image_height: 1080,
            output_prefix: "slice".to_string(),
        }
    }
}

impl RasterConfig {
    /// Loads from a TOML file, falling back to defaults on any read or parse
    /// failure. Malformed or missing config is a warning, not a hard error:
    /// slicing can always proceed with sane defaults.
    pub fn load_from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!(
                        "failed to parse raster config {}: {err}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "failed to read raster config {}: {err}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Loads from `path` if given and present on disk, otherwise returns the
    /// hardcoded default.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p),
            _ => Self::default(),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_falls_back_to_default() {
        let config = RasterConfig::load_or_default(None);
        assert_eq!(config, RasterConfig::default());
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raster.toml");
        let mut config = RasterConfig::default();
        config.image_width = 256;
        config.output_prefix = "layer".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = RasterConfig::load_or_default(Some(&path));
        assert_eq!(loaded, config);
    }

    #[test]
    fn a_malformed_file_falls_back_to_default_instead_of_failing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raster.toml");
        fs::write(&path, "this is not valid toml {{{").unwrap();
        let loaded = RasterConfig::load_or_default(Some(&path));
        assert_eq!(loaded, RasterConfig::default());
    }
}
