//! Full index reconciliation: rebuild every index from the memory files
//! physically on disk.
//!
//! This is the repair path for everything the incremental updater cannot
//! guarantee: partial ripple failures, bulk deletions, files dropped into the
//! tree by hand. It is idempotent and convergent — running it twice with no
//! intervening writes produces identical output.
//!
//! The pass is structured as: snapshot existing index files, walk the tree
//! for memory files, rebuild all indexes in memory, write them, then delete
//! any snapshot index file that was not rewritten (a category keeps an index
//! iff it or a descendant holds a memory). Unmappable file names and path
//! collisions are reported as warnings, never as failures; the first real
//! I/O failure aborts the pass.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::index::codec::{self, INDEX_FILE_NAME};
use crate::index::store::IndexStore;
use crate::index::types::{CategoryIndex, MemoryEntry, SubcategoryEntry};
use crate::path::{CategoryPath, MemoryPath, slugify};
use crate::record::{self, RECORD_EXTENSION};

/// A non-fatal problem found during reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReindexWarning {
    /// A record file whose relative path could not be normalized into a
    /// memory path, or a stale index file parked in a directory that is not
    /// a valid category. The file is left in place and not managed.
    UnmappablePath { file: PathBuf },
    /// Two record files normalized to the same memory path. The first file
    /// in walk order wins; the loser is left in place and not indexed.
    /// `suggested` is a free slug the loser could be renamed to.
    Collision {
        file: PathBuf,
        path: MemoryPath,
        suggested: String,
    },
    /// A description harvested from the previous indexes whose parent index
    /// no longer exists. The description is lost unless re-set by hand.
    DroppedDescription { category: CategoryPath },
}

impl fmt::Display for ReindexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappablePath { file } => {
                write!(f, "skipped unmappable file {}", file.display())
            }
            Self::Collision {
                file,
                path,
                suggested,
            } => write!(
                f,
                "skipped {}: collides with memory '{}' (consider renaming to '{}')",
                file.display(),
                path,
                suggested
            ),
            Self::DroppedDescription { category } => write!(
                f,
                "dropped description of '{}': no index references the category anymore",
                category
            ),
        }
    }
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Default)]
pub struct ReindexReport {
    /// Memories indexed.
    pub indexed: usize,
    /// Index files written.
    pub written: usize,
    /// Stale index files deleted.
    pub deleted: usize,
    /// Non-fatal problems, in deterministic walk order.
    pub warnings: Vec<ReindexWarning>,
}

/// Rebuilds every category index under one store root from disk.
#[derive(Debug)]
pub struct Reindexer<'a> {
    indexes: &'a IndexStore,
}

impl<'a> Reindexer<'a> {
    pub fn new(indexes: &'a IndexStore) -> Self {
        Self { indexes }
    }

    /// Run a full reconciliation pass.
    pub fn run(&self) -> Result<ReindexReport> {
        let root = self.indexes.root().to_path_buf();
        let mut report = ReindexReport::default();

        // 1–2. Snapshot existing index files and collect record files, in
        // one sorted depth-first walk.
        let mut index_files = Vec::new();
        let mut memory_files = Vec::new();
        walk(&root, &mut index_files, &mut memory_files)?;

        // Descriptions live in subcategory entries of existing indexes;
        // harvest them so the rebuild can re-attach them. Unreadable or
        // malformed indexes contribute nothing.
        let descriptions = harvest_descriptions(&index_files);

        // 3–4. Normalize record paths and build per-category memory lists.
        let mut build: BTreeMap<CategoryPath, CategoryIndex> = BTreeMap::new();
        let mut claimed: BTreeMap<MemoryPath, PathBuf> = BTreeMap::new();

        for file in &memory_files {
            let rel = file
                .strip_prefix(&root)
                .expect("walked file is under the root");

            let Some(path) = normalize_record_path(rel) else {
                report
                    .warnings
                    .push(ReindexWarning::UnmappablePath { file: file.clone() });
                continue;
            };

            if claimed.contains_key(&path) {
                let suggested = suggest_free_slug(&path, &claimed);
                report.warnings.push(ReindexWarning::Collision {
                    file: file.clone(),
                    path,
                    suggested,
                });
                continue;
            }

            let text = fs::read_to_string(file).map_err(|e| Error::io(file, e))?;
            let (token_estimate, updated_at) = record::probe(&text);

            build
                .entry(path.category().clone())
                .or_default()
                .upsert_memory(MemoryEntry {
                    path: path.clone(),
                    token_estimate,
                    updated_at,
                });
            claimed.insert(path, file.clone());
            report.indexed += 1;
        }

        // 5. Every memory's ancestor chain gets an index (ancestors-of-
        // content rule), and every parent→child edge on those chains is
        // recorded, including root→top-level.
        let mut edges: BTreeSet<(CategoryPath, CategoryPath)> = BTreeSet::new();
        let categories_with_memories: Vec<CategoryPath> = build.keys().cloned().collect();
        for category in &categories_with_memories {
            for child in category.ancestors().collect::<Vec<_>>() {
                build.entry(child.parent()).or_default();
                build.entry(child.clone()).or_default();
                edges.insert((child.parent(), child));
            }
        }

        // 6. Synthesize subcategory entries; counts are the child's own
        // direct-memory list length. Harvested descriptions re-attach here.
        let counts: BTreeMap<CategoryPath, u64> = build
            .iter()
            .map(|(category, index)| (category.clone(), index.memories.len() as u64))
            .collect();

        for (parent, child) in &edges {
            let description = descriptions.get(child).cloned();
            let entry = SubcategoryEntry {
                path: child.clone(),
                memory_count: *counts.get(child).unwrap_or(&0),
                description,
            };
            let parent_index = build.get_mut(parent).expect("parent seeded above");
            parent_index.subcategories.retain(|e| e.path != entry.path);
            parent_index.subcategories.push(entry);
        }

        // A described child with no content keeps its entry (count 0) as
        // long as its parent index survives on content grounds. A description
        // whose parent index does not survive is lost; report it.
        for (child, description) in &descriptions {
            let parent = child.parent();
            match build.get_mut(&parent) {
                Some(parent_index) => {
                    if parent_index.subcategory(child).is_none() {
                        parent_index.subcategories.push(SubcategoryEntry {
                            path: child.clone(),
                            memory_count: 0,
                            description: Some(description.clone()),
                        });
                    }
                }
                None => report.warnings.push(ReindexWarning::DroppedDescription {
                    category: child.clone(),
                }),
            }
        }

        // 7. Write every category in the build state.
        let mut written: BTreeSet<PathBuf> = BTreeSet::new();
        for (category, index) in &mut build {
            index.sort();
            self.indexes.write(category, index)?;
            written.insert(self.indexes.index_path(category));
            report.written += 1;
        }

        // 8. Delete index files that no longer correspond to any category
        // with content. An index file in a directory that does not parse as
        // a category was never written by us and is not ours to delete.
        for stale in index_files.iter().filter(|f| !written.contains(*f)) {
            match index_file_category(&root, stale) {
                Some(category) => {
                    if self.indexes.remove_index_file(&category)? {
                        debug!(category = %category, "removed stale index");
                        report.deleted += 1;
                    }
                }
                None => report
                    .warnings
                    .push(ReindexWarning::UnmappablePath { file: stale.clone() }),
            }
        }

        for warning in &report.warnings {
            warn!(%warning, "reconciliation warning");
        }
        info!(
            indexed = report.indexed,
            written = report.written,
            deleted = report.deleted,
            warnings = report.warnings.len(),
            "reconciliation complete"
        );

        Ok(report)
    }
}

/// Sorted depth-first walk collecting index files and record files.
fn walk(dir: &Path, index_files: &mut Vec<PathBuf>, memory_files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| Error::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            walk(&path, index_files, memory_files)?;
        } else if path.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE_NAME) {
            index_files.push(path);
        } else if path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION) {
            memory_files.push(path);
        }
        // Anything else is not ours to manage.
    }

    Ok(())
}

/// Normalize a record file's store-relative path into a memory path.
///
/// Each directory segment and the file stem are slugified; a segment that
/// slugifies to nothing makes the whole path unmappable.
fn normalize_record_path(rel: &Path) -> Option<MemoryPath> {
    let mut segments = Vec::new();
    for component in rel.components() {
        segments.push(component.as_os_str().to_str()?);
    }

    let stem = segments
        .pop()?
        .strip_suffix(&format!(".{RECORD_EXTENSION}"))?;

    let mut category_segments = Vec::with_capacity(segments.len());
    for segment in segments {
        category_segments.push(slugify(segment)?);
    }
    let slug = slugify(stem)?;

    let category = CategoryPath::from_segments(category_segments).ok()?;
    MemoryPath::new(category, &slug).ok()
}

/// Map an index file back to the category that owns it. Strict, no
/// slugification: every directory segment must already be a valid slug.
fn index_file_category(root: &Path, file: &Path) -> Option<CategoryPath> {
    let dir = file.strip_prefix(root).ok()?.parent()?;
    let mut segments = Vec::new();
    for component in dir.components() {
        segments.push(component.as_os_str().to_str()?.to_string());
    }
    CategoryPath::from_segments(segments).ok()
}

/// Smallest `{slug}-N` (N >= 2) not yet claimed in the colliding category.
fn suggest_free_slug(path: &MemoryPath, claimed: &BTreeMap<MemoryPath, PathBuf>) -> String {
    for n in 2u32.. {
        let candidate = format!("{}-{}", path.slug(), n);
        let candidate_path = MemoryPath::new(path.category().clone(), &candidate)
            .expect("slug with numeric suffix stays valid");
        if !claimed.contains_key(&candidate_path) {
            return candidate;
        }
    }
    unreachable!("u32 range exhausted")
}

/// Read descriptions out of existing index files, keyed by subcategory path.
/// Lenient: unreadable or malformed indexes are skipped.
fn harvest_descriptions(index_files: &[PathBuf]) -> BTreeMap<CategoryPath, String> {
    let mut descriptions = BTreeMap::new();
    for file in index_files {
        let Ok(text) = fs::read_to_string(file) else {
            continue;
        };
        let Ok(index) = codec::decode(&text, file) else {
            continue;
        };
        for entry in index.subcategories {
            if let Some(description) = entry.description {
                descriptions.insert(entry.path, description);
            }
        }
    }
    descriptions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_path() {
        let path = normalize_record_path(Path::new("notes/rust/ownership.md")).unwrap();
        assert_eq!(path.to_string(), "notes/rust/ownership");
    }

    #[test]
    fn test_normalize_root_level_file() {
        let path = normalize_record_path(Path::new("solo.md")).unwrap();
        assert!(path.category().is_root());
        assert_eq!(path.slug(), "solo");
    }

    #[test]
    fn test_normalize_slugifies_segments() {
        let path = normalize_record_path(Path::new("My Notes/Hello World.md")).unwrap();
        assert_eq!(path.to_string(), "my-notes/hello-world");
    }

    #[test]
    fn test_normalize_rejects_empty_slug() {
        assert!(normalize_record_path(Path::new("notes/___.md")).is_none());
        assert!(normalize_record_path(Path::new("___/note.md")).is_none());
    }

    #[test]
    fn test_index_file_category() {
        let root = Path::new("/store");
        let category = index_file_category(root, Path::new("/store/notes/rust/index.yaml"));
        assert_eq!(category.unwrap().to_string(), "notes/rust");

        let at_root = index_file_category(root, Path::new("/store/index.yaml"));
        assert!(at_root.unwrap().is_root());

        // A non-slug directory does not belong to any category.
        assert!(index_file_category(root, Path::new("/store/My Dir/index.yaml")).is_none());
    }

    #[test]
    fn test_suggest_free_slug_skips_taken() {
        let base = MemoryPath::parse("cat/note").unwrap();
        let mut claimed = BTreeMap::new();
        claimed.insert(base.clone(), PathBuf::from("a"));
        claimed.insert(
            MemoryPath::parse("cat/note-2").unwrap(),
            PathBuf::from("b"),
        );

        assert_eq!(suggest_free_slug(&base, &claimed), "note-3");
    }
}
