//! The mapping namespace (`lookup` group)
//!
//! A mapping is a 1-D `u32` array whose length equals the row or the column
//! count. Reverse lookups are built on read and never stored.

use omx_core::format::constants::LOOKUP_GROUP;
use omx_core::{reverse_lookup, validate_name, ReverseLookup};
use tracing::debug;

use crate::array::ArrayData;
use crate::error::{OmxError, OmxResult};
use crate::matrix::Mapping;
use crate::shape_registry::ShapeRegistry;
use crate::storage::{ArraySpec, StorageEngine, StorageError};

#[derive(Debug, Default)]
pub struct MappingStore;

impl MappingStore {
    pub fn new() -> Self {
        Self
    }

    /// Create a mapping, replacing an existing one only when `overwrite` is set
    pub fn create<E: StorageEngine>(
        &self,
        engine: &mut E,
        shapes: &mut ShapeRegistry,
        name: &str,
        entries: Vec<u32>,
        overwrite: bool,
    ) -> OmxResult<Mapping> {
        validate_name(name).map_err(|_| OmxError::InvalidName(name.to_string()))?;
        shapes.validate_mapping_len(engine, name, entries.len())?;

        if self.contains(engine, name)? {
            if !overwrite {
                return Err(OmxError::DuplicateMapping(name.to_string()));
            }
            engine.remove_node(LOOKUP_GROUP, name)?;
            debug!(mapping = name, "replacing mapping");
        }

        if !engine.has_group(LOOKUP_GROUP)? {
            engine.create_group(LOOKUP_GROUP)?;
        }

        let spec = ArraySpec {
            dims: vec![entries.len()],
            title: String::new(),
            filters: None,
        };
        engine
            .create_array(LOOKUP_GROUP, name, spec, ArrayData::from_vec(entries.clone()))
            .map_err(|err| match err {
                StorageError::NodeExists { .. } => OmxError::DuplicateMapping(name.to_string()),
                other => other.into(),
            })?;

        debug!(mapping = name, len = entries.len(), "created mapping");
        Ok(Mapping {
            name: name.to_string(),
            entries,
        })
    }

    pub fn delete<E: StorageEngine>(&self, engine: &mut E, name: &str) -> OmxResult<()> {
        if !self.contains(engine, name)? {
            return Err(OmxError::mapping_not_found(name));
        }
        engine.remove_node(LOOKUP_GROUP, name)?;
        debug!(mapping = name, "deleted mapping");
        Ok(())
    }

    /// Mapping names; empty when the namespace was never created
    pub fn list<E: StorageEngine>(&self, engine: &E) -> OmxResult<Vec<String>> {
        if !engine.has_group(LOOKUP_GROUP)? {
            return Ok(Vec::new());
        }
        Ok(engine.list_nodes(LOOKUP_GROUP)?)
    }

    pub fn contains<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<bool> {
        Ok(engine.has_node(LOOKUP_GROUP, name)?)
    }

    /// The stored entries, verbatim
    pub fn get<E: StorageEngine>(&self, engine: &E, name: &str) -> OmxResult<Mapping> {
        if !self.contains(engine, name)? {
            return Err(OmxError::mapping_not_found(name));
        }
        let data = engine.read_array(LOOKUP_GROUP, name)?;
        let entries = match data {
            ArrayData::U32(entries) => entries,
            other => {
                return Err(OmxError::Storage(StorageError::Corrupted(format!(
                    "mapping {name} holds {} values, expected u32",
                    other.data_type()
                ))))
            }
        };
        Ok(Mapping {
            name: name.to_string(),
            entries,
        })
    }

    /// Value to zero-based offset
    ///
    /// Duplicate values are not rejected; the last offset wins. A mapping
    /// with repeated values is probably malformed, see
    /// [`omx_core::first_duplicate`].
    pub fn reverse_lookup<E: StorageEngine>(
        &self,
        engine: &E,
        name: &str,
    ) -> OmxResult<ReverseLookup> {
        let mapping = self.get(engine, name)?;
        Ok(reverse_lookup(mapping.entries()))
    }
}
