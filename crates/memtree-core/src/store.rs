//! Scoped storage handle: memory, index, and repair operations bound to one
//! store's root directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::index::reindex::{ReindexReport, Reindexer};
use crate::index::store::IndexStore;
use crate::index::types::MemoryEntry;
use crate::index::update::IndexUpdater;
use crate::path::{CategoryPath, MemoryPath};
use crate::record::{MemoryRecord, RECORD_EXTENSION};

/// All operations over one store, resolved from the registry by name.
#[derive(Debug, Clone)]
pub struct Store {
    name: String,
    root: PathBuf,
    indexes: IndexStore,
}

impl Store {
    /// Bind to a store root. Usually reached via
    /// [`LoadedRegistry::get_store`](crate::registry::LoadedRegistry::get_store).
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: name.into(),
            indexes: IndexStore::new(&root),
            root,
        }
    }

    /// The registered store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index and category operations for this store.
    pub fn indexes(&self) -> &IndexStore {
        &self.indexes
    }

    /// Absolute path of a memory's record file.
    pub fn memory_file_path(&self, path: &MemoryPath) -> PathBuf {
        self.indexes
            .category_dir(path.category())
            .join(format!("{}.{}", path.slug(), RECORD_EXTENSION))
    }

    /// Persist a memory record and incrementally update its category's index
    /// and every ancestor.
    ///
    /// The record lands through a temp file and rename, so the tree never
    /// holds a half-written record. The record write and the N index writes
    /// are still independent operations; a failure partway leaves earlier
    /// writes in place, and a later [`Store::reindex`] converges the indexes.
    pub fn write_memory(&self, path: &MemoryPath, record: &MemoryRecord) -> Result<()> {
        let file = self.memory_file_path(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let text = record.encode()?;
        let temp = file.with_extension(format!("{RECORD_EXTENSION}.tmp"));
        fs::write(&temp, text).map_err(|e| Error::io(&temp, e))?;
        fs::rename(&temp, &file).map_err(|e| Error::io(&file, e))?;
        debug!(store = %self.name, memory = %path, "wrote memory record");

        IndexUpdater::new(&self.indexes).on_memory_written(path, record)
    }

    /// Read a memory record. A missing file is [`Error::MemoryNotFound`].
    pub fn read_memory(&self, path: &MemoryPath) -> Result<MemoryRecord> {
        let file = self.memory_file_path(path);
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MemoryNotFound(path.to_string()));
            }
            Err(e) => return Err(Error::io(&file, e)),
        };
        MemoryRecord::decode(&text, &file)
    }

    /// Remove a memory's record file. Returns whether a file was removed.
    ///
    /// Indexes are deliberately not patched here; stale entries are cleaned
    /// up by [`Store::reindex`] (or use [`Store::delete_memory_and_reindex`]).
    pub fn delete_memory(&self, path: &MemoryPath) -> Result<bool> {
        let file = self.memory_file_path(path);
        match fs::remove_file(&file) {
            Ok(()) => {
                debug!(store = %self.name, memory = %path, "deleted memory record");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&file, e)),
        }
    }

    /// Delete a memory and immediately reconcile all indexes.
    pub fn delete_memory_and_reindex(&self, path: &MemoryPath) -> Result<ReindexReport> {
        self.delete_memory(path)?;
        self.reindex()
    }

    /// List a category's direct memories from its index. A category without
    /// an index has no content: the list is empty.
    pub fn list_memories(&self, category: &CategoryPath) -> Result<Vec<MemoryEntry>> {
        Ok(self.indexes.read(category, true)?.memories)
    }

    /// Full reconciliation: rebuild every index in this store from the
    /// record files on disk. This is the repair path for partial failures
    /// and out-of-band deletions.
    pub fn reindex(&self) -> Result<ReindexReport> {
        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;
        info!(store = %self.name, "starting full reindex");
        Reindexer::new(&self.indexes).run()
    }
}
