//! Runtime settings: where the data lives and how maps are drawn.

use crate::charts::{BaseMap, PngMapRenderer};
use crate::data::FarsDataset;
use crate::error::{FarsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarsConfig {
    /// Directory holding `accident_<year>.csv.bz2` files.
    pub data_dir: PathBuf,
    /// Directory rendered maps are written to.
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Optional GeoJSON file of state outlines.
    pub boundaries: Option<PathBuf>,
    /// Draw title and axis labels.
    pub annotate: bool,
}

impl Default for FarsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            width: 1024,
            height: 768,
            boundaries: None,
            annotate: true,
        }
    }
}

impl FarsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| FarsError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(FarsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    pub fn dataset(&self) -> FarsDataset {
        FarsDataset::new(&self.data_dir)
    }

    pub fn renderer(&self) -> Result<PngMapRenderer> {
        let base_map = match &self.boundaries {
            Some(path) => BaseMap::load(path)?,
            None => BaseMap::default(),
        };
        Ok(PngMapRenderer::new(&self.output_dir, self.width, self.height)
            .with_annotations(self.annotate)
            .with_base_map(base_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fars.json");
        fs::write(&path, r#"{ "data_dir": "/srv/fars", "width": 640 }"#).unwrap();

        let cfg = FarsConfig::load(&path).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/fars"));
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.height, 768);
        assert!(cfg.annotate);
        assert_eq!(cfg.dataset(), FarsDataset::new("/srv/fars"));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempdir().unwrap();
        let cfg = FarsConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, FarsConfig::default());
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fars.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FarsConfig::load_or_default(&path),
            Err(FarsError::Config { .. })
        ));
    }

    #[test]
    fn renderer_reports_bad_boundaries_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("states.geojson");
        fs::write(&path, r#"{ "1": [] }"#).unwrap();
        let cfg = FarsConfig {
            boundaries: Some(path),
            ..FarsConfig::default()
        };
        assert!(matches!(cfg.renderer(), Err(FarsError::Boundaries { .. })));
    }
}
