//! Per-category index file and directory operations.
//!
//! An [`IndexStore`] is bound to one store root. Each category with content
//! owns an `index.yaml` directly inside its directory; the root category's
//! index sits at the store root itself.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::index::codec::{self, INDEX_FILE_NAME};
use crate::index::types::{CategoryIndex, MemoryEntry, SubcategoryEntry};
use crate::path::CategoryPath;

/// Index file and category directory operations scoped to one store root.
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    /// Bind to a store root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root this index store operates under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute directory of a category.
    pub fn category_dir(&self, category: &CategoryPath) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in category.segments() {
            dir.push(segment);
        }
        dir
    }

    /// Absolute path of a category's index file.
    pub fn index_path(&self, category: &CategoryPath) -> PathBuf {
        self.category_dir(category).join(INDEX_FILE_NAME)
    }

    /// Whether an index file exists for the category.
    pub fn exists(&self, category: &CategoryPath) -> bool {
        self.index_path(category).is_file()
    }

    /// Create the category directory tree. Idempotent.
    pub fn ensure(&self, category: &CategoryPath) -> Result<()> {
        let dir = self.category_dir(category);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))
    }

    /// Recursively remove the category directory and all contents.
    /// Idempotent: a missing directory is success. The root category cannot
    /// be deleted this way (that would remove the store itself).
    pub fn delete(&self, category: &CategoryPath) -> Result<()> {
        if category.is_root() {
            return Err(Error::invalid_path("", "cannot delete the root category"));
        }

        let dir = self.category_dir(category);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(category = %category, "deleted category directory");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&dir, e)),
        }
    }

    /// Read a category's index. A missing file yields an empty index when
    /// `create_when_missing`, otherwise [`Error::IndexNotFound`].
    pub fn read(&self, category: &CategoryPath, create_when_missing: bool) -> Result<CategoryIndex> {
        let path = self.index_path(category);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if create_when_missing {
                    return Ok(CategoryIndex::default());
                }
                return Err(Error::IndexNotFound(category.to_string()));
            }
            Err(e) => return Err(Error::io(&path, e)),
        };

        codec::decode(&text, &path)
    }

    /// Serialize and overwrite a category's index, creating parent
    /// directories as needed. The write goes through a temp file and rename
    /// so readers never observe a half-written index.
    pub fn write(&self, category: &CategoryPath, index: &CategoryIndex) -> Result<()> {
        let path = self.index_path(category);
        let text = codec::encode(index, &path)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &text).map_err(|e| Error::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| Error::io(&path, e))?;

        debug!(category = %category, memories = index.memories.len(), "wrote index");
        Ok(())
    }

    /// Remove a category's index file only (not the directory). Idempotent;
    /// returns whether a file was removed.
    pub fn remove_index_file(&self, category: &CategoryPath) -> Result<bool> {
        let path = self.index_path(category);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Replace or insert a memory entry in the category's index, creating
    /// the index if missing.
    pub fn upsert_memory_entry(&self, category: &CategoryPath, entry: MemoryEntry) -> Result<()> {
        let mut index = self.read(category, true)?;
        index.upsert_memory(entry);
        self.write(category, &index)
    }

    /// Replace or insert the subcategory entry for `child` in the category's
    /// index, preserving any existing description.
    pub fn upsert_subcategory_entry(
        &self,
        category: &CategoryPath,
        child: &CategoryPath,
        memory_count: u64,
    ) -> Result<()> {
        let mut index = self.read(category, true)?;
        index.upsert_subcategory(child.clone(), memory_count);
        self.write(category, &index)
    }

    /// Set or clear the description carried by `category`'s entry in its
    /// parent's index. Setting creates the parent index and the entry as
    /// needed; clearing prunes the entry when the child holds no memories.
    pub fn set_description(&self, category: &CategoryPath, description: Option<&str>) -> Result<()> {
        if category.is_root() {
            return Err(Error::invalid_path(
                "",
                "the root category has no parent entry to describe",
            ));
        }

        let parent = category.parent();
        let mut index = self.read(&parent, true)?;

        match description {
            Some(text) => {
                if let Some(entry) = index.subcategory_mut(category) {
                    entry.description = Some(text.to_string());
                } else {
                    // Entry exists purely to carry the description; count
                    // reflects the child's current direct memories.
                    let memory_count = self.read(category, true)?.memories.len() as u64;
                    index.subcategories.push(SubcategoryEntry {
                        path: category.clone(),
                        memory_count,
                        description: Some(text.to_string()),
                    });
                    index.sort();
                }
            }
            None => {
                if let Some(entry) = index.subcategory_mut(category) {
                    entry.description = None;
                    if entry.memory_count == 0 {
                        index.remove_subcategory(category);
                    }
                } else {
                    return Ok(());
                }
            }
        }

        self.write(&parent, &index)
    }

    /// Remove `child`'s entry from `parent`'s index. A missing parent index
    /// is a no-op success.
    pub fn remove_subcategory_entry(
        &self,
        parent: &CategoryPath,
        child: &CategoryPath,
    ) -> Result<()> {
        let mut index = match self.read(parent, false) {
            Ok(index) => index,
            Err(Error::IndexNotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };

        if index.remove_subcategory(child) {
            self.write(parent, &index)?;
        }
        Ok(())
    }
}
