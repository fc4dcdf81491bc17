//! The single canonical shape of a container
//!
//! The shape is fixed by the first matrix created or by an explicit hint, and
//! never changes afterwards. Lookup order is: cached value, persisted `SHAPE`
//! root attribute, then the dimensions of the first matrix in `data`. The
//! cache is never invalidated.

use omx_core::format::constants::{attrs, DATA_GROUP};
use omx_core::{AttrValue, Shape};
use tracing::debug;

use crate::error::{OmxError, OmxResult};
use crate::storage::StorageEngine;

#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shape: Option<Shape>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The established shape, if any
    ///
    /// A shape inferred from an existing matrix is persisted only when the
    /// engine is writable.
    pub fn shape<E: StorageEngine>(&mut self, engine: &mut E) -> OmxResult<Option<Shape>> {
        if let Some(shape) = self.shape {
            return Ok(Some(shape));
        }

        if let Some(value) = engine.root_attr(attrs::SHAPE)? {
            let dims = value
                .as_int_array()
                .ok_or(OmxError::Format(omx_core::FormatError::InvalidShape))?;
            let shape = Shape::from_attr(dims)?;
            self.shape = Some(shape);
            return Ok(Some(shape));
        }

        if !engine.has_group(DATA_GROUP)? {
            return Ok(None);
        }
        let Some(first) = engine.list_nodes(DATA_GROUP)?.into_iter().next() else {
            return Ok(None);
        };

        let info = engine.node_info(DATA_GROUP, &first)?;
        let shape = Shape::from_dims(&info.dims)?;
        self.shape = Some(shape);
        if engine.is_writable() {
            persist(engine, shape)?;
        }
        debug!(%shape, matrix = %first, "inferred container shape");
        Ok(Some(shape))
    }

    /// Fix the shape if none is recorded yet; later calls are no-ops
    pub fn record_shape<E: StorageEngine>(
        &mut self,
        engine: &mut E,
        shape: Shape,
    ) -> OmxResult<()> {
        if self.shape.is_some() {
            return Ok(());
        }
        persist(engine, shape)?;
        self.shape = Some(shape);
        debug!(%shape, "recorded container shape");
        Ok(())
    }

    /// Reject a matrix whose shape differs from the established one
    pub fn validate<E: StorageEngine>(
        &mut self,
        engine: &mut E,
        name: &str,
        candidate: Shape,
    ) -> OmxResult<()> {
        match self.shape(engine)? {
            Some(expected) if expected != candidate => Err(OmxError::ShapeMismatch {
                name: name.to_string(),
                expected,
                found: candidate,
            }),
            _ => Ok(()),
        }
    }

    /// Reject a mapping whose length fits neither dimension
    pub fn validate_mapping_len<E: StorageEngine>(
        &mut self,
        engine: &mut E,
        name: &str,
        len: usize,
    ) -> OmxResult<()> {
        match self.shape(engine)? {
            Some(shape) if !shape.accepts_mapping_len(len) => Err(OmxError::MappingLength {
                name: name.to_string(),
                len,
                shape,
            }),
            _ => Ok(()),
        }
    }
}

fn persist<E: StorageEngine>(engine: &mut E, shape: Shape) -> OmxResult<()> {
    engine.set_root_attr(attrs::SHAPE, AttrValue::IntArray(shape.to_attr().to_vec()))?;
    Ok(())
}
