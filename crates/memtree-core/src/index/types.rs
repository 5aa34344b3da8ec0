//! In-memory model of a category's sidecar index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::{CategoryPath, MemoryPath};

/// One memory directly inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Full path of the memory.
    pub path: MemoryPath,
    /// Approximate token count of the record file.
    pub token_estimate: u64,
    /// Last-update time, when the record metadata was readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One direct child category that (transitively) contains memories, or that
/// carries a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryEntry {
    /// Full path of the child category.
    pub path: CategoryPath,
    /// Number of memories directly inside the child (not transitive).
    pub memory_count: u64,
    /// Optional human-written description. Independent of content-driven
    /// entry existence: a described-but-empty child keeps its entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A category's index: its direct memories and its child categories.
///
/// Entries are unique by path and kept sorted by path for deterministic
/// output. Instances are transient: read, mutated, and rewritten per
/// operation; nothing holds one across calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryIndex {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memories: Vec<MemoryEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<SubcategoryEntry>,
}

impl CategoryIndex {
    /// Both lists empty.
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty() && self.subcategories.is_empty()
    }

    /// Replace or insert a memory entry, keeping the list sorted.
    pub fn upsert_memory(&mut self, entry: MemoryEntry) {
        self.memories.retain(|e| e.path != entry.path);
        self.memories.push(entry);
        self.sort();
    }

    /// Replace or insert a subcategory entry with the given count, preserving
    /// any description already stored for that child.
    pub fn upsert_subcategory(&mut self, path: CategoryPath, memory_count: u64) {
        let existing_description = self
            .subcategories
            .iter()
            .find(|e| e.path == path)
            .and_then(|e| e.description.clone());

        self.subcategories.retain(|e| e.path != path);
        self.subcategories.push(SubcategoryEntry {
            path,
            memory_count,
            description: existing_description,
        });
        self.sort();
    }

    /// Remove a subcategory entry if present. Returns whether anything changed.
    pub fn remove_subcategory(&mut self, path: &CategoryPath) -> bool {
        let before = self.subcategories.len();
        self.subcategories.retain(|e| &e.path != path);
        self.subcategories.len() != before
    }

    /// Find a subcategory entry by path.
    pub fn subcategory(&self, path: &CategoryPath) -> Option<&SubcategoryEntry> {
        self.subcategories.iter().find(|e| &e.path == path)
    }

    /// Mutable lookup of a subcategory entry by path.
    pub fn subcategory_mut(&mut self, path: &CategoryPath) -> Option<&mut SubcategoryEntry> {
        self.subcategories.iter_mut().find(|e| &e.path == path)
    }

    /// Sort both lists by path.
    pub fn sort(&mut self) {
        self.memories.sort_by(|a, b| a.path.cmp(&b.path));
        self.subcategories.sort_by(|a, b| a.path.cmp(&b.path));
    }
}
