//! Hierarchical array storage engines
//!
//! The container layer never touches bytes directly. It talks to a
//! [`StorageEngine`]: named groups holding typed N-dimensional array nodes,
//! each with a title, declared filters and a bag of attributes, plus a set of
//! root attributes. The engine owns open-mode enforcement: every mutation on a
//! read-only handle fails with [`StorageError::ReadOnly`].
//!
//! Two engines are provided:
//!
//! - [`MemoryEngine`]: an in-memory tree, listing nodes in name order
//! - [`FileEngine`]: a single-file container built on top of the memory tree

pub mod error;
pub mod file;
mod index;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileEngine;
pub use memory::MemoryEngine;

use omx_core::{AttrMap, AttrValue, DataType};
use serde::{Deserialize, Serialize};

use crate::array::ArrayData;
use crate::config::Filters;

/// How a storage resource is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenMode {
    /// Read-only; every mutation fails at the engine
    Read,
    /// Create the resource, truncating anything already there
    WriteCreate,
    /// Read/write an existing resource, creating it when absent
    Append,
}

impl OpenMode {
    pub const fn is_writable(&self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenMode::Read => write!(f, "r"),
            OpenMode::WriteCreate => write!(f, "w"),
            OpenMode::Append => write!(f, "a"),
        }
    }
}

/// Creation parameters for an array node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySpec {
    /// Dimensions; their product must equal the payload length
    pub dims: Vec<usize>,
    /// Short description
    pub title: String,
    /// Declared filter pipeline
    pub filters: Option<Filters>,
}

/// Everything an engine knows about a node except its payload
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub dtype: DataType,
    pub dims: Vec<usize>,
    pub title: String,
    pub filters: Option<Filters>,
    pub attrs: AttrMap<AttrValue>,
}

/// A generic hierarchical array store
///
/// Listing order is engine-defined and stable for an unchanged store; the
/// bundled engines list in name order.
pub trait StorageEngine {
    /// Mode the handle was opened with
    fn mode(&self) -> OpenMode;

    /// Whether mutations are permitted
    fn is_writable(&self) -> bool {
        self.mode().is_writable()
    }

    /// Whether [`StorageEngine::close`] has run
    fn is_closed(&self) -> bool;

    /// Read a root attribute
    fn root_attr(&self, key: &str) -> StorageResult<Option<AttrValue>>;

    /// Write a root attribute, replacing any previous value
    fn set_root_attr(&mut self, key: &str, value: AttrValue) -> StorageResult<()>;

    fn has_group(&self, group: &str) -> StorageResult<bool>;

    fn create_group(&mut self, group: &str) -> StorageResult<()>;

    /// Node names in a group, in listing order
    fn list_nodes(&self, group: &str) -> StorageResult<Vec<String>>;

    fn has_node(&self, group: &str, name: &str) -> StorageResult<bool>;

    fn node_info(&self, group: &str, name: &str) -> StorageResult<NodeInfo>;

    /// Create an array node and write its payload
    fn create_array(
        &mut self,
        group: &str,
        name: &str,
        spec: ArraySpec,
        data: ArrayData,
    ) -> StorageResult<()>;

    /// Read an array node's full payload
    fn read_array(&self, group: &str, name: &str) -> StorageResult<ArrayData>;

    fn set_node_attr(
        &mut self,
        group: &str,
        name: &str,
        key: &str,
        value: AttrValue,
    ) -> StorageResult<()>;

    /// Remove a node together with its attributes
    fn remove_node(&mut self, group: &str, name: &str) -> StorageResult<()>;

    /// Push pending writes to the backing resource
    fn flush(&mut self) -> StorageResult<()>;

    /// Flush and release the resource; calling it again is a no-op
    fn close(&mut self) -> StorageResult<()>;
}
