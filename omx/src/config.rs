//! Container configuration
//!
//! [`OmxConfig`] carries the producer string and the default filter pipeline
//! applied to new matrices. It can be built with `with_*` methods or loaded
//! from JSON. [`OpenOptions`] bundles a config with an open mode and an
//! optional shape hint.

use std::path::Path;

use omx_core::Shape;
use serde::{Deserialize, Serialize};

use crate::container::OmxFile;
use crate::error::{OmxError, OmxResult};
use crate::storage::{FileEngine, OpenMode, StorageEngine};

/// Declared filter pipeline for an array node
///
/// Recorded with each node; payloads themselves are stored raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Compression library name
    pub complib: String,
    /// Compression level, 0-9
    pub complevel: u8,
    /// Byte-shuffle before compression
    pub shuffle: bool,
    /// Fletcher32 checksum
    pub fletcher32: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            complib: "zlib".to_string(),
            complevel: 1,
            shuffle: true,
            fletcher32: false,
        }
    }
}

impl Filters {
    /// Set the compression library and level
    pub fn with_compression(mut self, complib: impl Into<String>, complevel: u8) -> Self {
        self.complib = complib.into();
        self.complevel = complevel.min(9);
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_fletcher32(mut self, fletcher32: bool) -> Self {
        self.fletcher32 = fletcher32;
        self
    }
}

/// Container-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmxConfig {
    /// Written to `OMX_CREATED_WITH` when absent
    pub producer: String,
    /// Filters used when a matrix is created without its own
    pub filters: Option<Filters>,
}

impl Default for OmxConfig {
    fn default() -> Self {
        Self {
            producer: concat!("rust omx ", env!("CARGO_PKG_VERSION")).to_string(),
            filters: Some(Filters::default()),
        }
    }
}

impl OmxConfig {
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Create matrices with no declared filters
    pub fn without_filters(mut self) -> Self {
        self.filters = None;
        self
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> OmxResult<Self> {
        serde_json::from_str(json).map_err(|e| OmxError::Config(e.to_string()))
    }

    /// Load a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> OmxResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| OmxError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

/// How to open a container
#[derive(Debug, Clone)]
pub struct OpenOptions {
    mode: OpenMode,
    shape: Option<Shape>,
    config: OmxConfig,
}

impl OpenOptions {
    pub fn new(mode: OpenMode) -> Self {
        Self {
            mode,
            shape: None,
            config: OmxConfig::default(),
        }
    }

    /// Fix the container shape up front
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_config(mut self, config: OmxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn config(&self) -> &OmxConfig {
        &self.config
    }

    /// Open a single-file container
    pub fn open(self, path: impl AsRef<Path>) -> OmxResult<OmxFile<FileEngine>> {
        let engine = FileEngine::open(path, self.mode)?;
        self.attach(engine)
    }

    /// Attach to an already opened engine; the engine's own mode applies
    pub fn attach<E: StorageEngine>(self, engine: E) -> OmxResult<OmxFile<E>> {
        OmxFile::with_engine(engine, self.shape, self.config)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new(OpenMode::Append)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OmxConfig::default();
        assert!(config.producer.starts_with("rust omx "));
        let filters = config.filters.unwrap();
        assert_eq!(filters.complib, "zlib");
        assert_eq!(filters.complevel, 1);
        assert!(filters.shuffle);
        assert!(!filters.fletcher32);
    }

    #[test]
    fn test_from_json() {
        let config = OmxConfig::from_json_str(
            r#"{"producer": "skims", "filters": {"complevel": 4, "fletcher32": true}}"#,
        )
        .unwrap();
        assert_eq!(config.producer, "skims");
        let filters = config.filters.unwrap();
        assert_eq!(filters.complib, "zlib");
        assert_eq!(filters.complevel, 4);
        assert!(filters.fletcher32);

        let config = OmxConfig::from_json_str(r#"{"filters": null}"#).unwrap();
        assert_eq!(config.filters, None);

        assert!(matches!(
            OmxConfig::from_json_str("{"),
            Err(OmxError::Config(_))
        ));
    }

    #[test]
    fn test_builders() {
        let filters = Filters::default()
            .with_compression("blosc", 12)
            .with_shuffle(false);
        assert_eq!(filters.complib, "blosc");
        assert_eq!(filters.complevel, 9);
        assert!(!filters.shuffle);

        let options = OpenOptions::new(OpenMode::WriteCreate)
            .with_shape((5, 5))
            .with_config(OmxConfig::default().without_filters());
        assert_eq!(options.mode(), OpenMode::WriteCreate);
        assert_eq!(options.shape(), Some(Shape::new(5, 5)));
        assert!(options.config().filters.is_none());
    }
}
