//! Single-file storage engine
//!
//! The whole tree is loaded into a [`MemoryEngine`] on open and written back
//! as a fresh image on flush. Writes go to a uniquely named temporary file in
//! the same directory, which is then persisted over the target, so a failed
//! flush never leaves a torn file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use omx_core::AttrValue;
use tempfile::NamedTempFile;
use tracing::debug;

use super::index;
use super::{ArraySpec, MemoryEngine, NodeInfo, OpenMode, StorageEngine, StorageResult};
use crate::array::ArrayData;

/// A container stored in a single file
#[derive(Debug)]
pub struct FileEngine {
    path: PathBuf,
    tree: MemoryEngine,
    dirty: bool,
}

impl FileEngine {
    /// Open or create a container file
    ///
    /// - `Read` requires the file to exist
    /// - `WriteCreate` truncates and immediately writes an empty container
    /// - `Append` loads the file if it exists, otherwise starts empty
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let (tree, dirty) = match mode {
            OpenMode::Read => (load(&path, mode)?, false),
            OpenMode::Append if path.exists() => (load(&path, mode)?, false),
            OpenMode::Append | OpenMode::WriteCreate => (MemoryEngine::with_mode(mode), true),
        };

        let mut engine = Self { path, tree, dirty };
        if engine.dirty {
            engine.flush()?;
        }
        debug!(path = %engine.path.display(), %mode, "opened container file");
        Ok(engine)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mark_dirty<T>(&mut self, result: StorageResult<T>) -> StorageResult<T> {
        if result.is_ok() {
            self.dirty = true;
        }
        result
    }
}

fn load(path: &Path, mode: OpenMode) -> StorageResult<MemoryEngine> {
    #[cfg(feature = "mmap")]
    {
        let file = fs::File::open(path)?;
        // SAFETY: read-only mapping; the image is decoded into owned buffers
        // before the map is dropped
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        index::decode(&mmap, mode)
    }

    #[cfg(not(feature = "mmap"))]
    {
        let bytes = fs::read(path)?;
        index::decode(&bytes, mode)
    }
}

impl StorageEngine for FileEngine {
    fn mode(&self) -> OpenMode {
        self.tree.mode()
    }

    fn is_closed(&self) -> bool {
        self.tree.is_closed()
    }

    fn root_attr(&self, key: &str) -> StorageResult<Option<AttrValue>> {
        self.tree.root_attr(key)
    }

    fn set_root_attr(&mut self, key: &str, value: AttrValue) -> StorageResult<()> {
        let result = self.tree.set_root_attr(key, value);
        self.mark_dirty(result)
    }

    fn has_group(&self, group: &str) -> StorageResult<bool> {
        self.tree.has_group(group)
    }

    fn create_group(&mut self, group: &str) -> StorageResult<()> {
        let result = self.tree.create_group(group);
        self.mark_dirty(result)
    }

    fn list_nodes(&self, group: &str) -> StorageResult<Vec<String>> {
        self.tree.list_nodes(group)
    }

    fn has_node(&self, group: &str, name: &str) -> StorageResult<bool> {
        self.tree.has_node(group, name)
    }

    fn node_info(&self, group: &str, name: &str) -> StorageResult<NodeInfo> {
        self.tree.node_info(group, name)
    }

    fn create_array(
        &mut self,
        group: &str,
        name: &str,
        spec: ArraySpec,
        data: ArrayData,
    ) -> StorageResult<()> {
        let result = self.tree.create_array(group, name, spec, data);
        self.mark_dirty(result)
    }

    fn read_array(&self, group: &str, name: &str) -> StorageResult<ArrayData> {
        self.tree.read_array(group, name)
    }

    fn set_node_attr(
        &mut self,
        group: &str,
        name: &str,
        key: &str,
        value: AttrValue,
    ) -> StorageResult<()> {
        let result = self.tree.set_node_attr(group, name, key, value);
        self.mark_dirty(result)
    }

    fn remove_node(&mut self, group: &str, name: &str) -> StorageResult<()> {
        let result = self.tree.remove_node(group, name);
        self.mark_dirty(result)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.tree.flush()?;
        if !self.tree.is_writable() || !self.dirty {
            return Ok(());
        }

        let image = index::encode(&self.tree)?;
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&image)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        self.dirty = false;
        debug!(path = %self.path.display(), bytes = image.len(), "flushed container file");
        Ok(())
    }

    fn close(&mut self) -> StorageResult<()> {
        if self.tree.is_closed() {
            return Ok(());
        }
        self.flush()?;
        self.tree.close()
    }
}
