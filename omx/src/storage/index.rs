//! Single-file layout: encoding and decoding a whole tree
//!
//! A container file is a [`FileHeader`], the raw little-endian payload of
//! every node (each starting on an 8-byte boundary) and finally a JSON
//! [`ContainerIndex`] describing the tree and where each payload lives.

use std::collections::BTreeMap;

use omx_core::format::constants::ALIGNMENT_BOUNDARY;
use omx_core::validation::{align_to_8, expected_payload_size};
use omx_core::{AttrMap, AttrValue, DataType, FileHeader};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::memory::{MemoryEngine, Node};
use super::{NodeInfo, OpenMode, StorageError, StorageResult};
use crate::array::ArrayData;
use crate::config::Filters;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ContainerIndex {
    pub root_attrs: AttrMap<AttrValue>,
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GroupEntry {
    pub name: String,
    pub nodes: Vec<NodeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NodeEntry {
    pub name: String,
    pub dtype: DataType,
    pub dims: Vec<usize>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filters: Option<Filters>,
    #[serde(default)]
    pub attrs: AttrMap<AttrValue>,
    /// Payload offset from file start
    pub offset: u64,
    /// Payload size in bytes
    pub size: u64,
}

/// Serialize a tree into a complete container image
pub(crate) fn encode(tree: &MemoryEngine) -> StorageResult<Vec<u8>> {
    let nodes: Vec<(&str, &str, &Node)> = tree
        .groups()
        .flat_map(|(group, nodes)| {
            nodes
                .iter()
                .map(move |(name, node)| (group, name.as_str(), node))
        })
        .collect();

    let payloads: Vec<Vec<u8>> = nodes
        .par_iter()
        .map(|(_, _, node)| node.data.to_le_bytes())
        .collect();

    let mut image = FileHeader::new().to_bytes().to_vec();
    let mut groups: Vec<GroupEntry> = tree
        .groups()
        .map(|(name, _)| GroupEntry {
            name: name.to_string(),
            nodes: Vec::new(),
        })
        .collect();

    for ((group, name, node), payload) in nodes.into_iter().zip(payloads) {
        image.resize(align_to_8(image.len()), 0);
        let entry = NodeEntry {
            name: name.to_string(),
            dtype: node.info.dtype,
            dims: node.info.dims.clone(),
            title: node.info.title.clone(),
            filters: node.info.filters.clone(),
            attrs: node.info.attrs.clone(),
            offset: image.len() as u64,
            size: payload.len() as u64,
        };
        image.extend_from_slice(&payload);

        if let Some(slot) = groups.iter_mut().find(|g| g.name == group) {
            slot.nodes.push(entry);
        }
    }

    image.resize(align_to_8(image.len()), 0);
    let index = ContainerIndex {
        root_attrs: tree.root_attrs().clone(),
        groups,
    };
    let index_bytes = serde_json::to_vec(&index)?;

    let mut header = FileHeader::new();
    header.index_offset = image.len() as u64;
    header.index_size = index_bytes.len() as u64;
    image.extend_from_slice(&index_bytes);
    image[..FileHeader::SIZE].copy_from_slice(&header.to_bytes());

    Ok(image)
}

/// Rebuild a tree from a container image
pub(crate) fn decode(bytes: &[u8], mode: OpenMode) -> StorageResult<MemoryEngine> {
    let header = FileHeader::from_bytes(bytes)?;
    let range = header.index_range(bytes.len())?;
    let index: ContainerIndex = serde_json::from_slice(&bytes[range.clone()])?;

    let mut groups = BTreeMap::new();
    for group in index.groups {
        let mut nodes = BTreeMap::new();
        for entry in group.nodes {
            let data = read_payload(bytes, &entry, range.start)?;
            let info = NodeInfo {
                dtype: entry.dtype,
                dims: entry.dims,
                title: entry.title,
                filters: entry.filters,
                attrs: entry.attrs,
            };
            nodes.insert(entry.name, Node { info, data });
        }
        groups.insert(group.name, nodes);
    }

    Ok(MemoryEngine::restore(mode, index.root_attrs, groups))
}

fn read_payload(bytes: &[u8], entry: &NodeEntry, index_start: usize) -> StorageResult<ArrayData> {
    let corrupted = |what: &str| StorageError::Corrupted(format!("node {}: {what}", entry.name));

    let start = usize::try_from(entry.offset).map_err(|_| corrupted("offset overflow"))?;
    let size = usize::try_from(entry.size).map_err(|_| corrupted("size overflow"))?;
    let end = start
        .checked_add(size)
        .ok_or_else(|| corrupted("size overflow"))?;

    if start < FileHeader::SIZE || end > index_start {
        return Err(corrupted("payload outside data region"));
    }
    if start % ALIGNMENT_BOUNDARY != 0 {
        return Err(corrupted("misaligned payload"));
    }

    let count = entry
        .dims
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(*d))
        .ok_or_else(|| corrupted("dimension overflow"))?;
    if expected_payload_size(count, entry.dtype)? != size {
        return Err(corrupted("payload size disagrees with dimensions"));
    }

    Ok(ArrayData::from_le_bytes(entry.dtype, &bytes[start..end])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ArraySpec, StorageEngine};

    fn sample_tree() -> MemoryEngine {
        let mut tree = MemoryEngine::new();
        tree.set_root_attr("SHAPE", AttrValue::IntArray(vec![2, 3]))
            .unwrap();
        tree.create_group("data").unwrap();
        tree.create_group("lookup").unwrap();
        tree.create_array(
            "data",
            "m1",
            ArraySpec {
                dims: vec![2, 3],
                title: "ones".into(),
                filters: Some(Filters::default()),
            },
            ArrayData::from_vec(vec![1.0f32; 6]),
        )
        .unwrap();
        tree.create_array(
            "lookup",
            "taz",
            ArraySpec {
                dims: vec![3],
                ..ArraySpec::default()
            },
            ArrayData::from_vec(vec![10u32, 20, 30]),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_image_layout() {
        let image = encode(&sample_tree()).unwrap();
        let header = FileHeader::from_bytes(&image).unwrap();
        assert_eq!(header.index_offset % 8, 0);
        assert_eq!(
            header.index_range(image.len()).unwrap().end,
            image.len()
        );
    }

    #[test]
    fn test_decode_restores_tree() {
        let image = encode(&sample_tree()).unwrap();
        let tree = decode(&image, OpenMode::Read).unwrap();

        assert_eq!(tree.mode(), OpenMode::Read);
        assert_eq!(
            tree.root_attr("SHAPE").unwrap(),
            Some(AttrValue::IntArray(vec![2, 3]))
        );
        let info = tree.node_info("data", "m1").unwrap();
        assert_eq!(info.title, "ones");
        assert_eq!(info.filters, Some(Filters::default()));
        assert_eq!(
            tree.read_array("lookup", "taz").unwrap(),
            ArrayData::from_vec(vec![10u32, 20, 30])
        );
    }

    #[test]
    fn test_decode_rejects_truncated_image() {
        let image = encode(&sample_tree()).unwrap();
        assert!(decode(&image[..image.len() - 1], OpenMode::Read).is_err());
        assert!(matches!(
            decode(&image[..16], OpenMode::Read),
            Err(StorageError::Format(_))
        ));
    }
}
