//! Incremental index maintenance after a single memory write.
//!
//! Writing a memory at `a/b/c/slug` touches four indexes: the memory entry
//! lands in `a/b/c`, then subcategory entries ripple up (`a/b` gains `a/b/c`,
//! `a` gains `a/b`, root gains `a`). Each ancestor's `memory_count` is read
//! from that level's current index, so counts cover direct memories only.
//!
//! The ripple issues independent read-modify-write operations with no
//! cross-file transaction; a failure partway leaves earlier writes in place.
//! The reconciliation engine is the repair path for that case. Deletions are
//! not patched incrementally at all — they also rely on reconciliation.

use tracing::debug;

use crate::error::{Error, Result};
use crate::index::store::IndexStore;
use crate::index::types::MemoryEntry;
use crate::path::MemoryPath;
use crate::record::{self, MemoryRecord};

/// Applies a single memory write to its category's index and all ancestors.
#[derive(Debug, Clone)]
pub struct IndexUpdater<'a> {
    indexes: &'a IndexStore,
}

impl<'a> IndexUpdater<'a> {
    pub fn new(indexes: &'a IndexStore) -> Self {
        Self { indexes }
    }

    /// Update indexes after `record` was written at `path`.
    ///
    /// Failures carry the category being updated; earlier successful writes
    /// are not rolled back.
    pub fn on_memory_written(&self, path: &MemoryPath, record: &MemoryRecord) -> Result<()> {
        let category = path.category();

        // 1. Upsert the memory entry into its own category's index.
        let text = record.encode()?;
        let entry = MemoryEntry {
            path: path.clone(),
            token_estimate: record::token_estimate(&text),
            updated_at: Some(record.meta.updated_at),
        };
        self.indexes
            .upsert_memory_entry(category, entry)
            .map_err(|e| Error::index_update(category.to_string(), e))?;

        // 2–3. Ripple membership and counts up every ancestor level. Each
        // level's count is its own current direct-memory list length.
        for child in category.ancestors() {
            let parent = child.parent();
            let memory_count = self
                .indexes
                .read(&child, true)
                .map_err(|e| Error::index_update(child.to_string(), e))?
                .memories
                .len() as u64;

            self.indexes
                .upsert_subcategory_entry(&parent, &child, memory_count)
                .map_err(|e| Error::index_update(parent.to_string(), e))?;
        }

        debug!(memory = %path, "incremental index update complete");
        Ok(())
    }
}
