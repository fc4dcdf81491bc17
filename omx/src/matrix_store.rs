//! The matrix namespace (`data` group)

use std::collections::BTreeSet;

use omx_core::format::constants::DATA_GROUP;
use omx_core::{validate_name, AttrValue, Attributes, Scalar, Shape};
use tracing::{debug, warn};

use crate::array::MatrixData;
use crate::config::Filters;
use crate::error::{OmxError, OmxResult};
use crate::matrix::{Matrix, MatrixOptions};
use crate::shape_registry::ShapeRegistry;
use crate::storage::{ArraySpec, StorageEngine, StorageError};
use crate::summary::MatrixSummary;

#[derive(Debug, Default)]
pub struct MatrixStore {
    default_filters: Option<Filters>,
}

impl MatrixStore {
    /// A store that applies `default_filters` when a matrix declares none
    pub fn new(default_filters: Option<Filters>) -> Self {
        Self { default_filters }
    }

    /// Create a matrix, validating its name and shape first
    pub fn create<E: StorageEngine>(
        &self,
        engine: &mut E,
        shapes: &mut ShapeRegistry,
        name: &str,
        data: MatrixData,
        options: MatrixOptions,
    ) -> OmxResult<Matrix> {
        let filters = options.filters.or_else(|| self.default_filters.clone());
        let matrix = Matrix {
            name: name.to_string(),
            data,
            title: options.title,
            filters,
            attributes: options.attributes,
        };
        self.write(engine, shapes, matrix)
    }

    /// Copy an existing matrix, with its title, filters and attributes
    pub fn copy_from<E: StorageEngine>(
        &self,
        engine: &mut E,
        shapes: &mut ShapeRegistry,
        name: &str,
        source: Matrix,
    ) -> OmxResult<Matrix> {
        let matrix = Matrix {
            name: name.to_string(),
            ..source
        };
        self.write(engine, shapes, matrix)
    }

    fn write<E: StorageEngine>(
        &self,
        engine: &mut E,
        shapes: &mut ShapeRegistry,
        matrix: Matrix,
    ) -> OmxResult<Matrix> {
        let name = matrix.name.as_str();
        validate_name(name).map_err(|_| OmxError::InvalidName(name.to_string()))?;
        if self.contains(engine, name)? {
            return Err(OmxError::DuplicateName(name.to_string()));
        }

        let shape = matrix.shape();
        let established = shapes.shape(engine)?;
        shapes.validate(engine, name, shape)?;

        ensure_group(engine)?;
        let spec = ArraySpec {
            dims: shape.dims().to_vec(),
            title: matrix.title.clone(),
            filters: matrix.filters.clone(),
        };
        engine
            .create_array(DATA_GROUP, name, spec, matrix.data.values().clone())
            .map_err(|err| match err {
                StorageError::NodeExists { .. } => OmxError::DuplicateName(name.to_string()),
                other => other.into(),
            })?;

        if established.is_none() {
            shapes.record_shape(engine, shape)?;
        }

        for (key, value) in matrix.attributes.iter() {
            engine.set_node_attr(DATA_GROUP, name, key, AttrValue::Scalar(value.clone()))?;
        }

        debug!(matrix = name, %shape, dtype = %matrix.data_type(), "created matrix");
        Ok(matrix)
    }

    /// Matrix names in engine listing order
    pub fn list<E: StorageEngine>(&self, engine: &E) -> OmxResult<Vec<String>> {
        if !engine.has_group(DATA_GROUP)? {
            return Ok(Vec::new());
        }
        Ok(engine.list_nodes(DATA_GROUP)?)
    }

    pub fn contains<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<bool> {
        Ok(engine.has_node(DATA_GROUP, name)?)
    }

    pub fn len<E: StorageEngine>(&self, engine: &E) -> OmxResult<usize> {
        Ok(self.list(engine)?.len())
    }

    /// Read a matrix with its payload
    pub fn get<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<Matrix> {
        if !self.contains(engine, name)? {
            return Err(OmxError::matrix_not_found(name));
        }
        let info = engine.node_info(DATA_GROUP, name)?;
        let shape = Shape::from_dims(&info.dims)?;
        let values = engine.read_array(DATA_GROUP, name)?;
        let attributes = scalar_attributes(name, info.attrs);
        Matrix::from_parts(name, shape, values, info.title, info.filters, attributes)
    }

    /// Remove a matrix and its attributes
    pub fn delete<E: StorageEngine>(&self, engine: &mut E, name: &str) -> OmxResult<()> {
        if !self.contains(engine, name)? {
            return Err(OmxError::matrix_not_found(name));
        }
        engine.remove_node(DATA_GROUP, name)?;
        debug!(matrix = name, "deleted matrix");
        Ok(())
    }

    /// Attributes of one matrix, without reading its payload
    pub fn attributes<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<Attributes> {
        if !self.contains(engine, name)? {
            return Err(OmxError::matrix_not_found(name));
        }
        let info = engine.node_info(DATA_GROUP, name)?;
        Ok(scalar_attributes(name, info.attrs))
    }

    pub fn set_attribute<E: StorageEngine>(
        &self,
        engine: &mut E,
        name: &str,
        key: &str,
        value: Scalar,
    ) -> OmxResult<()> {
        if !self.contains(engine, name)? {
            return Err(OmxError::matrix_not_found(name));
        }
        engine.set_node_attr(DATA_GROUP, name, key, AttrValue::Scalar(value))?;
        Ok(())
    }

    /// Type, shape and attributes of one matrix, without reading its payload
    pub fn describe<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<MatrixSummary> {
        if !self.contains(engine, name)? {
            return Err(OmxError::matrix_not_found(name));
        }
        let info = engine.node_info(DATA_GROUP, name)?;
        Ok(MatrixSummary {
            name: name.to_string(),
            data_type: info.dtype,
            shape: Shape::from_dims(&info.dims)?,
            attributes: scalar_attributes(name, info.attrs),
        })
    }

    /// Sorted union of every attribute key on any matrix
    pub fn list_attribute_keys<E: StorageEngine>(&self, engine: &E) -> OmxResult<Vec<String>> {
        let mut keys = BTreeSet::new();
        for name in self.list(engine)? {
            let info = engine.node_info(DATA_GROUP, &name)?;
            keys.extend(info.attrs.keys().map(str::to_string));
        }
        Ok(keys.into_iter().collect())
    }
}

fn ensure_group<E: StorageEngine>(engine: &mut E) -> OmxResult<()> {
    if !engine.has_group(DATA_GROUP)? {
        engine.create_group(DATA_GROUP)?;
    }
    Ok(())
}

/// Keep scalar attributes; anything else was not written by this crate
fn scalar_attributes(name: &str, attrs: omx_core::AttrMap<AttrValue>) -> Attributes {
    attrs
        .into_iter()
        .filter_map(|(key, value)| match value {
            AttrValue::Scalar(scalar) => Some((key, scalar)),
            AttrValue::IntArray(_) => {
                warn!(matrix = name, key = %key, "skipping non-scalar matrix attribute");
                None
            }
        })
        .collect()
}
