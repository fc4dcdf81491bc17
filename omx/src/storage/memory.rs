//! In-memory storage engine
//!
//! Groups and nodes live in ordered maps, so listing is always in name order.
//! [`FileEngine`](super::FileEngine) persists this same tree.

use std::collections::BTreeMap;

use omx_core::{AttrMap, AttrValue};

use super::{ArraySpec, NodeInfo, OpenMode, StorageEngine, StorageError, StorageResult};
use crate::array::ArrayData;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) info: NodeInfo,
    pub(crate) data: ArrayData,
}

/// An ordered, in-memory hierarchical array store
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    mode: OpenMode,
    closed: bool,
    root_attrs: AttrMap<AttrValue>,
    groups: BTreeMap<String, BTreeMap<String, Node>>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// An empty, writable store
    pub fn new() -> Self {
        Self::with_mode(OpenMode::WriteCreate)
    }

    /// An empty store with the given mode
    pub fn with_mode(mode: OpenMode) -> Self {
        Self {
            mode,
            closed: false,
            root_attrs: AttrMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Reopen the same tree under a different mode
    pub fn into_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self.closed = false;
        self
    }

    pub(crate) fn root_attrs(&self) -> &AttrMap<AttrValue> {
        &self.root_attrs
    }

    /// Every group with its nodes, in name order
    pub(crate) fn groups(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Node>)> + '_ {
        self.groups.iter().map(|(name, nodes)| (name.as_str(), nodes))
    }

    /// Rebuild from decoded parts, bypassing mode checks
    pub(crate) fn restore(
        mode: OpenMode,
        root_attrs: AttrMap<AttrValue>,
        groups: BTreeMap<String, BTreeMap<String, Node>>,
    ) -> Self {
        Self {
            mode,
            closed: false,
            root_attrs,
            groups,
        }
    }

    fn check_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    fn check_writable(&self) -> StorageResult<()> {
        self.check_open()?;
        if !self.mode.is_writable() {
            return Err(StorageError::ReadOnly);
        }
        Ok(())
    }

    fn group(&self, group: &str) -> StorageResult<&BTreeMap<String, Node>> {
        self.groups
            .get(group)
            .ok_or_else(|| StorageError::NoSuchGroup(group.to_string()))
    }

    fn node(&self, group: &str, name: &str) -> StorageResult<&Node> {
        self.group(group)?
            .get(name)
            .ok_or_else(|| no_such_node(group, name))
    }

    fn node_mut(&mut self, group: &str, name: &str) -> StorageResult<&mut Node> {
        self.groups
            .get_mut(group)
            .ok_or_else(|| StorageError::NoSuchGroup(group.to_string()))?
            .get_mut(name)
            .ok_or_else(|| no_such_node(group, name))
    }
}

fn no_such_node(group: &str, name: &str) -> StorageError {
    StorageError::NoSuchNode {
        group: group.to_string(),
        name: name.to_string(),
    }
}

impl StorageEngine for MemoryEngine {
    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn root_attr(&self, key: &str) -> StorageResult<Option<AttrValue>> {
        self.check_open()?;
        Ok(self.root_attrs.get(key).cloned())
    }

    fn set_root_attr(&mut self, key: &str, value: AttrValue) -> StorageResult<()> {
        self.check_writable()?;
        self.root_attrs.insert(key, value);
        Ok(())
    }

    fn has_group(&self, group: &str) -> StorageResult<bool> {
        self.check_open()?;
        Ok(self.groups.contains_key(group))
    }

    fn create_group(&mut self, group: &str) -> StorageResult<()> {
        self.check_writable()?;
        if self.groups.contains_key(group) {
            return Err(StorageError::GroupExists(group.to_string()));
        }
        self.groups.insert(group.to_string(), BTreeMap::new());
        Ok(())
    }

    fn list_nodes(&self, group: &str) -> StorageResult<Vec<String>> {
        self.check_open()?;
        Ok(self.group(group)?.keys().cloned().collect())
    }

    fn has_node(&self, group: &str, name: &str) -> StorageResult<bool> {
        self.check_open()?;
        Ok(self
            .groups
            .get(group)
            .is_some_and(|nodes| nodes.contains_key(name)))
    }

    fn node_info(&self, group: &str, name: &str) -> StorageResult<NodeInfo> {
        self.check_open()?;
        Ok(self.node(group, name)?.info.clone())
    }

    fn create_array(
        &mut self,
        group: &str,
        name: &str,
        spec: ArraySpec,
        data: ArrayData,
    ) -> StorageResult<()> {
        self.check_writable()?;

        let expected = spec
            .dims
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d));
        if expected != Some(data.len()) {
            return Err(StorageError::DimensionMismatch {
                dims: spec.dims,
                len: data.len(),
            });
        }

        let nodes = self
            .groups
            .get_mut(group)
            .ok_or_else(|| StorageError::NoSuchGroup(group.to_string()))?;
        if nodes.contains_key(name) {
            return Err(StorageError::NodeExists {
                group: group.to_string(),
                name: name.to_string(),
            });
        }

        let info = NodeInfo {
            dtype: data.data_type(),
            dims: spec.dims,
            title: spec.title,
            filters: spec.filters,
            attrs: AttrMap::new(),
        };
        nodes.insert(name.to_string(), Node { info, data });
        Ok(())
    }

    fn read_array(&self, group: &str, name: &str) -> StorageResult<ArrayData> {
        self.check_open()?;
        Ok(self.node(group, name)?.data.clone())
    }

    fn set_node_attr(
        &mut self,
        group: &str,
        name: &str,
        key: &str,
        value: AttrValue,
    ) -> StorageResult<()> {
        self.check_writable()?;
        self.node_mut(group, name)?.info.attrs.insert(key, value);
        Ok(())
    }

    fn remove_node(&mut self, group: &str, name: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.groups
            .get_mut(group)
            .ok_or_else(|| StorageError::NoSuchGroup(group.to_string()))?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| no_such_node(group, name))
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.check_open()
    }

    fn close(&mut self) -> StorageResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omx_core::{DataType, Scalar};

    fn spec(dims: &[usize]) -> ArraySpec {
        ArraySpec {
            dims: dims.to_vec(),
            title: "t".into(),
            filters: None,
        }
    }

    #[test]
    fn test_groups_and_nodes() {
        let mut engine = MemoryEngine::new();
        engine.create_group("data").unwrap();
        assert!(matches!(
            engine.create_group("data"),
            Err(StorageError::GroupExists(_))
        ));

        engine
            .create_array("data", "b", spec(&[2, 2]), ArrayData::from_vec(vec![1.0f64; 4]))
            .unwrap();
        engine
            .create_array("data", "a", spec(&[2, 2]), ArrayData::from_vec(vec![2i32; 4]))
            .unwrap();

        assert_eq!(engine.list_nodes("data").unwrap(), vec!["a", "b"]);
        assert!(engine.has_node("data", "a").unwrap());
        assert!(!engine.has_node("lookup", "a").unwrap());

        let info = engine.node_info("data", "a").unwrap();
        assert_eq!(info.dtype, DataType::I32);
        assert_eq!(info.dims, vec![2, 2]);
        assert_eq!(info.title, "t");

        assert!(matches!(
            engine.create_array("data", "a", spec(&[2, 2]), ArrayData::from_vec(vec![0i32; 4])),
            Err(StorageError::NodeExists { .. })
        ));
        assert!(matches!(
            engine.list_nodes("lookup"),
            Err(StorageError::NoSuchGroup(_))
        ));
    }

    #[test]
    fn test_dimension_check() {
        let mut engine = MemoryEngine::new();
        engine.create_group("data").unwrap();
        assert!(matches!(
            engine.create_array("data", "m", spec(&[3, 3]), ArrayData::from_vec(vec![0u32; 8])),
            Err(StorageError::DimensionMismatch { len: 8, .. })
        ));
    }

    #[test]
    fn test_attrs_and_remove() {
        let mut engine = MemoryEngine::new();
        engine.create_group("data").unwrap();
        engine
            .create_array("data", "m", spec(&[1]), ArrayData::from_vec(vec![0u32]))
            .unwrap();
        engine
            .set_node_attr("data", "m", "mode", AttrValue::from("hwy"))
            .unwrap();
        let info = engine.node_info("data", "m").unwrap();
        assert_eq!(
            info.attrs.get("mode").and_then(AttrValue::as_scalar),
            Some(&Scalar::from("hwy"))
        );

        engine.remove_node("data", "m").unwrap();
        assert!(!engine.has_node("data", "m").unwrap());
        assert!(matches!(
            engine.remove_node("data", "m"),
            Err(StorageError::NoSuchNode { .. })
        ));
    }

    #[test]
    fn test_read_only_and_closed() {
        let mut engine = MemoryEngine::new();
        engine.set_root_attr("OMX_VERSION", AttrValue::from("0.2")).unwrap();

        let mut engine = engine.into_mode(OpenMode::Read);
        assert!(!engine.is_writable());
        assert!(matches!(
            engine.create_group("data"),
            Err(StorageError::ReadOnly)
        ));
        assert_eq!(
            engine.root_attr("OMX_VERSION").unwrap(),
            Some(AttrValue::from("0.2"))
        );

        engine.close().unwrap();
        engine.close().unwrap();
        assert!(engine.is_closed());
        assert!(matches!(
            engine.root_attr("OMX_VERSION"),
            Err(StorageError::Closed)
        ));
    }
}
