//! The container façade
//!
//! [`OmxFile`] owns one storage engine and composes the shape registry, the
//! matrix and mapping stores and the query engine. It is the only type most
//! callers need:
//!
//! ```no_run
//! use omx::{MatrixCollection, MatrixData, OmxFile, OpenMode, Predicate};
//!
//! # fn main() -> omx::OmxResult<()> {
//! let mut file = OmxFile::open("skims.omx", OpenMode::WriteCreate, None)?;
//! file.set("dist", MatrixData::filled((5, 5), 1.0f64)?)?;
//! file.set_matrix_attribute("dist", "timeperiod", "am")?;
//! file.create_mapping("taz", vec![1, 2, 3, 4, 5], false)?;
//!
//! let am = file.query(&Predicate::new().with("timeperiod", "am"))?;
//! assert_eq!(am.len(), 1);
//! file.close()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use omx_core::format::constants::{attrs, DATA_GROUP, LOOKUP_GROUP, OMX_FORMAT_VERSION};
use omx_core::{AttrValue, Attributes, Predicate, ReverseLookup, Scalar, Shape};
use tracing::{debug, warn};

use crate::array::MatrixData;
use crate::config::{OmxConfig, OpenOptions};
use crate::error::{OmxError, OmxResult};
use crate::mapping_store::MappingStore;
use crate::matrix::{Mapping, Matrix, MatrixOptions, MatrixSource};
use crate::matrix_store::MatrixStore;
use crate::query::AttributeQueryEngine;
use crate::shape_registry::ShapeRegistry;
use crate::storage::{FileEngine, OpenMode, StorageEngine};
use crate::summary::{ContainerSummary, MappingSummary};

/// Collection-style access to the matrices of a container
pub trait MatrixCollection {
    /// Lazy iterator over matrix handles, in listing order
    type Iter<'a>: Iterator<Item = OmxResult<Matrix>>
    where
        Self: 'a;

    /// Number of matrices
    fn len(&self) -> OmxResult<usize>;

    fn is_empty(&self) -> OmxResult<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, name: &str) -> OmxResult<bool>;

    /// Each call starts a fresh pass over the collection
    fn iter(&self) -> Self::Iter<'_>;

    fn get(&self, name: &str) -> OmxResult<Matrix>;

    /// Assign a matrix under `name`
    ///
    /// A dense array creates a new matrix with inferred type and shape. An
    /// existing matrix handle is copied with its title, filters and
    /// attributes. Either way the shape must match the container's.
    fn set(&mut self, name: &str, source: impl Into<MatrixSource>) -> OmxResult<Matrix>;

    fn delete(&mut self, name: &str) -> OmxResult<()>;
}

/// An open OMX container
#[derive(Debug)]
pub struct OmxFile<E: StorageEngine = FileEngine> {
    engine: E,
    shapes: ShapeRegistry,
    matrices: MatrixStore,
    mappings: MappingStore,
    query: AttributeQueryEngine,
    config: OmxConfig,
}

impl OmxFile<FileEngine> {
    /// Open a single-file container with default configuration
    pub fn open(
        path: impl AsRef<Path>,
        mode: OpenMode,
        shape: Option<Shape>,
    ) -> OmxResult<Self> {
        let mut options = OpenOptions::new(mode);
        if let Some(shape) = shape {
            options = options.with_shape(shape);
        }
        options.open(path)
    }

    /// Rewrite `src` into a fresh container at `dst`
    ///
    /// Every matrix is copied with its attributes, and every mapping with its
    /// entries. The producer string of `src` is kept.
    pub fn repack(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> OmxResult<()> {
        let mut source = Self::open(src, OpenMode::Read, None)?;

        let mut config = OmxConfig::default();
        if let Some(producer) = source.created_with()? {
            config = config.with_producer(producer);
        }
        let mut options = OpenOptions::new(OpenMode::WriteCreate).with_config(config);
        if let Some(shape) = source.shape()? {
            options = options.with_shape(shape);
        }

        let mut target = options.open(dst)?;
        source.copy_into(&mut target)?;
        target.close()?;
        source.close()
    }
}

impl<E: StorageEngine> OmxFile<E> {
    /// Attach to an engine
    ///
    /// On a writable engine the format metadata and both groups are created
    /// when absent. A shape hint fixes the container shape if none is
    /// established yet, and fails with [`OmxError::ShapeMismatch`] if a
    /// different one is.
    pub fn with_engine(engine: E, shape: Option<Shape>, config: OmxConfig) -> OmxResult<Self> {
        let mut file = Self {
            engine,
            shapes: ShapeRegistry::new(),
            matrices: MatrixStore::new(config.filters.clone()),
            mappings: MappingStore::new(),
            query: AttributeQueryEngine,
            config,
        };
        file.initialize(shape)?;
        debug!(mode = %file.engine.mode(), "opened container");
        Ok(file)
    }

    fn initialize(&mut self, hint: Option<Shape>) -> OmxResult<()> {
        if self.engine.is_writable() {
            if self.engine.root_attr(attrs::VERSION)?.is_none() {
                self.engine
                    .set_root_attr(attrs::VERSION, AttrValue::from(OMX_FORMAT_VERSION))?;
            }
            if self.engine.root_attr(attrs::CREATED_WITH)?.is_none() {
                let producer = Scalar::from(self.config.producer.as_str());
                self.engine
                    .set_root_attr(attrs::CREATED_WITH, AttrValue::Scalar(producer))?;
            }
            for group in [DATA_GROUP, LOOKUP_GROUP] {
                if !self.engine.has_group(group)? {
                    self.engine.create_group(group)?;
                }
            }
        }

        let Some(hint) = hint else {
            return Ok(());
        };
        match self.shapes.shape(&mut self.engine)? {
            Some(existing) if existing != hint => Err(OmxError::ShapeMismatch {
                name: attrs::SHAPE.to_string(),
                expected: existing,
                found: hint,
            }),
            Some(_) => Ok(()),
            None if self.engine.is_writable() => {
                self.shapes.record_shape(&mut self.engine, hint)
            }
            None => {
                debug!(%hint, "ignoring shape hint on read-only container");
                Ok(())
            }
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &OmxConfig {
        &self.config
    }

    pub fn mode(&self) -> OpenMode {
        self.engine.mode()
    }

    /// The persisted `OMX_VERSION`
    pub fn version(&self) -> OmxResult<Option<String>> {
        self.root_string(attrs::VERSION)
    }

    /// The persisted `OMX_CREATED_WITH`
    pub fn created_with(&self) -> OmxResult<Option<String>> {
        self.root_string(attrs::CREATED_WITH)
    }

    fn root_string(&self, key: &str) -> OmxResult<Option<String>> {
        Ok(self
            .engine
            .root_attr(key)?
            .as_ref()
            .and_then(AttrValue::as_scalar)
            .and_then(Scalar::as_str)
            .map(str::to_string))
    }

    /// The container shape, once established
    pub fn shape(&mut self) -> OmxResult<Option<Shape>> {
        self.shapes.shape(&mut self.engine)
    }

    pub fn create_matrix(
        &mut self,
        name: &str,
        data: MatrixData,
        options: MatrixOptions,
    ) -> OmxResult<Matrix> {
        self.matrices
            .create(&mut self.engine, &mut self.shapes, name, data, options)
    }

    /// Matrix names in listing order
    pub fn list_matrices(&self) -> OmxResult<Vec<String>> {
        self.matrices.list(&self.engine)
    }

    /// Sorted union of attribute keys across all matrices
    pub fn list_all_attributes(&self) -> OmxResult<Vec<String>> {
        self.matrices.list_attribute_keys(&self.engine)
    }

    pub fn matrix_attributes(&self, name: &str) -> OmxResult<Attributes> {
        self.matrices.attributes(&self.engine, name)
    }

    pub fn set_matrix_attribute(
        &mut self,
        name: &str,
        key: &str,
        value: impl Into<Scalar>,
    ) -> OmxResult<()> {
        self.matrices
            .set_attribute(&mut self.engine, name, key, value.into())
    }

    /// Matrices whose attributes satisfy every predicate term
    pub fn query(&self, predicate: &Predicate) -> OmxResult<Vec<Matrix>> {
        self.query.query_all(&self.engine, &self.matrices, predicate)
    }

    /// Names of matrices whose attributes satisfy every predicate term
    pub fn query_names(&self, predicate: &Predicate) -> OmxResult<Vec<String>> {
        self.query
            .query_names(&self.engine, &self.matrices, predicate)
    }

    /// Store a mapping; an existing one is replaced only with `overwrite`
    pub fn create_mapping(
        &mut self,
        name: &str,
        entries: Vec<u32>,
        overwrite: bool,
    ) -> OmxResult<Mapping> {
        self.mappings
            .create(&mut self.engine, &mut self.shapes, name, entries, overwrite)
    }

    pub fn delete_mapping(&mut self, name: &str) -> OmxResult<()> {
        self.mappings.delete(&mut self.engine, name)
    }

    pub fn list_mappings(&self) -> OmxResult<Vec<String>> {
        self.mappings.list(&self.engine)
    }

    /// The stored entries of a mapping
    pub fn mapping_entries(&self, name: &str) -> OmxResult<Vec<u32>> {
        Ok(self.mappings.get(&self.engine, name)?.entries)
    }

    /// Value to zero-based offset; on duplicate values the last offset wins
    pub fn mapping(&self, name: &str) -> OmxResult<ReverseLookup> {
        self.mappings.reverse_lookup(&self.engine, name)
    }

    pub fn get_mapping(&self, name: &str) -> OmxResult<Mapping> {
        self.mappings.get(&self.engine, name)
    }

    /// Describe the container without reading any matrix payload
    pub fn summary(&mut self) -> OmxResult<ContainerSummary> {
        let shape = self.shape()?;
        let matrices = self
            .list_matrices()?
            .iter()
            .map(|name| self.matrices.describe(&self.engine, name))
            .collect::<OmxResult<Vec<_>>>()?;
        let mappings = self
            .list_mappings()?
            .into_iter()
            .map(|name| {
                let len = self.mappings.get(&self.engine, &name)?.len();
                Ok(MappingSummary { name, len })
            })
            .collect::<OmxResult<Vec<_>>>()?;

        Ok(ContainerSummary {
            version: self.version()?,
            created_with: self.created_with()?,
            shape,
            matrices,
            mappings,
        })
    }

    /// Copy every matrix and mapping into another container
    pub fn copy_into<F: StorageEngine>(&self, target: &mut OmxFile<F>) -> OmxResult<()> {
        for matrix in self.iter() {
            let matrix = matrix?;
            let name = matrix.name().to_string();
            target.set(&name, matrix)?;
        }
        for name in self.list_mappings()? {
            let mapping = self.get_mapping(&name)?;
            target.create_mapping(&name, mapping.entries, false)?;
        }
        Ok(())
    }

    /// Push pending writes to the backing resource
    pub fn flush(&mut self) -> OmxResult<()> {
        Ok(self.engine.flush()?)
    }

    /// Flush and release the backing resource; calling it again is a no-op
    pub fn close(&mut self) -> OmxResult<()> {
        if self.engine.is_closed() {
            return Ok(());
        }
        self.engine.close()?;
        debug!("closed container");
        Ok(())
    }
}

impl<E: StorageEngine> Drop for OmxFile<E> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close container");
        }
    }
}

impl<E: StorageEngine> MatrixCollection for OmxFile<E> {
    type Iter<'a>
        = Matrices<'a, E>
    where
        Self: 'a;

    fn len(&self) -> OmxResult<usize> {
        self.matrices.len(&self.engine)
    }

    fn contains(&self, name: &str) -> OmxResult<bool> {
        self.matrices.contains(&self.engine, name)
    }

    fn iter(&self) -> Self::Iter<'_> {
        Matrices {
            file: self,
            names: None,
        }
    }

    fn get(&self, name: &str) -> OmxResult<Matrix> {
        self.matrices.get(&self.engine, name)
    }

    fn set(&mut self, name: &str, source: impl Into<MatrixSource>) -> OmxResult<Matrix> {
        match source.into() {
            MatrixSource::Array(data) => self.create_matrix(name, data, MatrixOptions::default()),
            MatrixSource::Matrix(matrix) => {
                self.matrices
                    .copy_from(&mut self.engine, &mut self.shapes, name, matrix)
            }
        }
    }

    fn delete(&mut self, name: &str) -> OmxResult<()> {
        self.matrices.delete(&mut self.engine, name)
    }
}

/// Iterator over the matrices of an [`OmxFile`]
///
/// Names are listed on the first call to `next`; each matrix is read as it is
/// reached.
pub struct Matrices<'a, E: StorageEngine> {
    file: &'a OmxFile<E>,
    names: Option<std::vec::IntoIter<String>>,
}

impl<E: StorageEngine> Iterator for Matrices<'_, E> {
    type Item = OmxResult<Matrix>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.names.is_none() {
            match self.file.list_matrices() {
                Ok(names) => self.names = Some(names.into_iter()),
                Err(err) => {
                    self.names = Some(Vec::new().into_iter());
                    return Some(Err(err));
                }
            }
        }
        let name = self.names.as_mut()?.next()?;
        Some(self.file.get(&name))
    }
}

impl<'a, E: StorageEngine> IntoIterator for &'a OmxFile<E> {
    type Item = OmxResult<Matrix>;
    type IntoIter = Matrices<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryEngine, StorageError};
    use omx_core::DataType;
    use rand::Rng;

    fn memory_file() -> OmxFile<MemoryEngine> {
        OmxFile::with_engine(MemoryEngine::new(), None, OmxConfig::default()).unwrap()
    }

    fn ones(rows: usize, cols: usize) -> MatrixData {
        MatrixData::filled((rows, cols), 1.0f64).unwrap()
    }

    #[test]
    fn test_metadata_written_on_open() {
        let file = memory_file();
        assert_eq!(file.version().unwrap().as_deref(), Some("0.2"));
        assert!(file
            .created_with()
            .unwrap()
            .is_some_and(|p| p.starts_with("rust omx")));
        assert!(file.engine().has_group(DATA_GROUP).unwrap());
        assert!(file.engine().has_group(LOOKUP_GROUP).unwrap());
        assert_eq!(file.mode(), OpenMode::WriteCreate);
    }

    #[test]
    fn test_shape_is_fixed_by_first_matrix() {
        let mut file = memory_file();
        assert_eq!(file.shape().unwrap(), None);

        file.set("m1", ones(5, 5)).unwrap();
        assert_eq!(file.shape().unwrap(), Some(Shape::new(5, 5)));

        let err = file.set("m4", ones(8, 8)).unwrap_err();
        assert!(err.is_shape_mismatch());
        file.delete("m1").unwrap();
        assert_eq!(file.shape().unwrap(), Some(Shape::new(5, 5)));
        assert!(file.set("m4", ones(8, 8)).is_err());
    }

    #[test]
    fn test_shape_hint() {
        let mut file =
            OmxFile::with_engine(MemoryEngine::new(), Some(Shape::new(3, 3)), OmxConfig::default())
                .unwrap();
        assert_eq!(file.shape().unwrap(), Some(Shape::new(3, 3)));
        assert!(file.set("m1", ones(2, 2)).unwrap_err().is_shape_mismatch());
        assert!(file
            .create_mapping("taz", vec![1, 2], false)
            .unwrap_err()
            .is_shape_mismatch());
        file.create_mapping("taz", vec![1, 2, 3], false).unwrap();
    }

    #[test]
    fn test_collection_surface() {
        let mut file = memory_file();
        for name in ["m2", "m1", "m3"] {
            file.set(name, ones(5, 5)).unwrap();
        }
        assert_eq!(file.len().unwrap(), 3);
        assert!(file.contains("m2").unwrap());
        assert_eq!(file.list_matrices().unwrap(), vec!["m1", "m2", "m3"]);

        let names: Vec<String> = file
            .iter()
            .map(|m| m.unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["m1", "m2", "m3"]);
        // restartable
        assert_eq!(file.iter().count(), 3);
        assert_eq!((&file).into_iter().count(), 3);

        assert!(matches!(
            file.set("m1", ones(5, 5)),
            Err(OmxError::DuplicateName(_))
        ));

        file.delete("m2").unwrap();
        assert!(!file.contains("m2").unwrap());
        assert_eq!(file.len().unwrap(), 2);
        assert!(file.get("m2").unwrap_err().is_not_found());
        assert!(file.delete("m2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_data_round_trip() {
        let mut rng = rand::thread_rng();
        let values: Vec<f32> = (0..20).map(|_| rng.gen_range(0.0..100.0)).collect();

        let mut file = memory_file();
        file.set("random", MatrixData::new((4, 5), values.clone()).unwrap())
            .unwrap();

        let matrix = file.get("random").unwrap();
        assert_eq!(matrix.data_type(), DataType::F32);
        assert_eq!(matrix.values::<f32>(), Some(values.as_slice()));
        assert_eq!(matrix.value(3, 4), Some(f64::from(values[19])));
    }

    #[test]
    fn test_query() {
        let mut file = memory_file();
        let tags: [(&str, &[(&str, &str)]); 3] = [
            ("m1", &[("timeperiod", "am"), ("mode", "hwy")]),
            ("m2", &[("timeperiod", "md")]),
            ("m3", &[("timeperiod", "am"), ("mode", "trn")]),
        ];
        for (name, attrs) in tags {
            file.set(name, ones(5, 5)).unwrap();
            for (key, value) in attrs.iter() {
                file.set_matrix_attribute(name, key, *value).unwrap();
            }
        }

        let am = file
            .query(&Predicate::new().with("timeperiod", "am"))
            .unwrap();
        let names: Vec<&str> = am.iter().map(Matrix::name).collect();
        assert_eq!(names, vec!["m1", "m3"]);

        let hwy_am = file
            .query_names(&Predicate::new().with("mode", "hwy").with("timeperiod", "am"))
            .unwrap();
        assert_eq!(hwy_am, vec!["m1"]);

        assert_eq!(file.list_all_attributes().unwrap(), vec!["mode", "timeperiod"]);
        assert_eq!(
            file.matrix_attributes("m2").unwrap().get("timeperiod"),
            Some(&Scalar::from("md"))
        );
    }

    #[test]
    fn test_mappings() {
        let mut file = memory_file();
        assert!(file.list_mappings().unwrap().is_empty());

        file.create_mapping("taz", vec![1, 2, 3], false).unwrap();
        let lookup = file.mapping("taz").unwrap();
        assert_eq!(lookup.len(), 3);
        assert_eq!((lookup[&1], lookup[&2], lookup[&3]), (0, 1, 2));
        assert_eq!(file.mapping_entries("taz").unwrap(), vec![1, 2, 3]);

        assert!(matches!(
            file.create_mapping("taz", vec![4, 5, 6], false),
            Err(OmxError::DuplicateMapping(_))
        ));
        file.create_mapping("taz", vec![4, 5, 6], true).unwrap();
        assert_eq!(file.get_mapping("taz").unwrap().entries(), &[4, 5, 6]);

        file.delete_mapping("taz").unwrap();
        assert!(file.mapping("taz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_copies_between_containers() {
        let mut source = memory_file();
        source
            .create_matrix(
                "skim",
                ones(3, 3),
                MatrixOptions::new()
                    .with_title("travel time")
                    .with_attribute("mode", "hwy"),
            )
            .unwrap();
        let skim = source.get("skim").unwrap();

        let mut target = memory_file();
        target.set("skim_copy", &skim).unwrap();
        let copy = target.get("skim_copy").unwrap();
        assert_eq!(copy.title(), "travel time");
        assert_eq!(copy.attribute("mode"), Some(&Scalar::from("hwy")));
        assert_eq!(copy.data(), skim.data());
        assert_eq!(target.shape().unwrap(), Some(Shape::new(3, 3)));

        // copies are still held to the container shape
        target.set("other", ones(3, 3)).unwrap();
        let mut small = memory_file();
        small.set("tiny", ones(1, 1)).unwrap();
        let tiny = small.get("tiny").unwrap();
        assert!(target.set("tiny", tiny).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_summary() {
        let mut file = memory_file();
        file.create_matrix(
            "m1",
            ones(2, 2),
            MatrixOptions::new().with_attribute("timeperiod", "am"),
        )
        .unwrap();
        file.create_mapping("taz", vec![7, 8], false).unwrap();

        let summary = file.summary().unwrap();
        assert_eq!(summary.version.as_deref(), Some("0.2"));
        assert_eq!(summary.shape, Some(Shape::new(2, 2)));
        assert_eq!(summary.matrices.len(), 1);
        assert_eq!(summary.matrices[0].data_type, DataType::F64);
        assert_eq!(summary.mappings[0].len, 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut file = memory_file();
        file.close().unwrap();
        file.close().unwrap();
        assert!(matches!(
            file.list_matrices(),
            Err(OmxError::Storage(StorageError::Closed))
        ));
    }

    #[test]
    fn test_end_to_end_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.omx");

        {
            let mut file = OmxFile::open(&path, OpenMode::WriteCreate, None).unwrap();
            for name in ["m1", "m2", "m3"] {
                file.set(name, ones(5, 5)).unwrap();
            }
            assert_eq!(file.len().unwrap(), 3);
            assert_eq!(file.list_matrices().unwrap(), vec!["m1", "m2", "m3"]);
            assert!(file.set("m4", ones(8, 8)).unwrap_err().is_shape_mismatch());

            file.set_matrix_attribute("m1", "timeperiod", "am").unwrap();
            file.create_mapping("taz", vec![1, 2, 3, 4, 5], false)
                .unwrap();
            file.close().unwrap();
        }

        let mut file = OmxFile::open(&path, OpenMode::Read, None).unwrap();
        assert_eq!(file.mode(), OpenMode::Read);
        assert_eq!(file.version().unwrap().as_deref(), Some("0.2"));
        assert_eq!(file.shape().unwrap(), Some(Shape::new(5, 5)));
        assert_eq!(file.len().unwrap(), 3);
        assert_eq!(file.get("m2").unwrap().data(), &ones(5, 5));
        assert_eq!(
            file.query_names(&Predicate::new().with("timeperiod", "am"))
                .unwrap(),
            vec!["m1"]
        );
        assert_eq!(file.mapping("taz").unwrap()[&5], 4);

        assert!(matches!(
            file.set("m4", ones(5, 5)),
            Err(OmxError::ReadOnly)
        ));
        assert!(matches!(file.delete("m1"), Err(OmxError::ReadOnly)));
        assert!(matches!(
            file.create_mapping("zones", vec![1, 2, 3, 4, 5], false),
            Err(OmxError::ReadOnly)
        ));
    }

    #[test]
    fn test_drop_persists_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.omx");

        {
            let mut file = OmxFile::open(&path, OpenMode::WriteCreate, Some(Shape::new(2, 3)))
                .unwrap();
            file.set("m1", MatrixData::filled((2, 3), 7i32).unwrap())
                .unwrap();
        }

        let mut file = OmxFile::open(&path, OpenMode::Append, None).unwrap();
        assert_eq!(file.shape().unwrap(), Some(Shape::new(2, 3)));
        assert_eq!(file.get("m1").unwrap().value(1, 2), Some(7.0));
        file.set("m2", MatrixData::filled((2, 3), 1i32).unwrap())
            .unwrap();
        assert_eq!(file.len().unwrap(), 2);
    }

    #[test]
    fn test_hint_conflicts_with_existing_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hint.omx");
        {
            let mut file = OmxFile::open(&path, OpenMode::WriteCreate, None).unwrap();
            file.set("m1", ones(5, 5)).unwrap();
        }
        let err = OmxFile::open(&path, OpenMode::Append, Some(Shape::new(8, 8))).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(OmxFile::open(&path, OpenMode::Read, Some(Shape::new(5, 5))).is_ok());
    }

    #[test]
    fn test_non_finite_attributes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factors.omx");
        {
            let mut file = OmxFile::open(&path, OpenMode::WriteCreate, None).unwrap();
            file.set("m1", ones(3, 3)).unwrap();
            file.set_matrix_attribute("m1", "factor", f64::NAN).unwrap();
            file.set_matrix_attribute("m1", "cap", f64::INFINITY).unwrap();
            file.set_matrix_attribute("m1", "floor", f64::NEG_INFINITY).unwrap();
            file.close().unwrap();
        }

        let file = OmxFile::open(&path, OpenMode::Read, None).unwrap();
        let attrs = file.matrix_attributes("m1").unwrap();
        assert!(attrs.get("factor").and_then(Scalar::as_float).unwrap().is_nan());
        assert_eq!(attrs.get("cap"), Some(&Scalar::Float(f64::INFINITY)));
        assert_eq!(attrs.get("floor"), Some(&Scalar::Float(f64::NEG_INFINITY)));
        assert_eq!(file.get("m1").unwrap().value(2, 2), Some(1.0));
    }

    #[test]
    fn test_repack() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.omx");
        let dst = dir.path().join("dst.omx");
        {
            let mut file = OmxFile::open(&src, OpenMode::WriteCreate, None).unwrap();
            file.create_matrix(
                "m1",
                ones(4, 4),
                MatrixOptions::new().with_attribute("year", 2010i64),
            )
            .unwrap();
            file.set("m2", ones(4, 4)).unwrap();
            file.delete("m2").unwrap();
            file.create_mapping("taz", vec![10, 20, 30, 40], false)
                .unwrap();
        }

        OmxFile::repack(&src, &dst).unwrap();

        let file = OmxFile::open(&dst, OpenMode::Read, None).unwrap();
        assert_eq!(file.list_matrices().unwrap(), vec!["m1"]);
        assert_eq!(
            file.matrix_attributes("m1").unwrap().get("year"),
            Some(&Scalar::Int(2010))
        );
        assert_eq!(file.mapping_entries("taz").unwrap(), vec![10, 20, 30, 40]);
    }
}
