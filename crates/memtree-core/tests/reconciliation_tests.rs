//! End-to-end reconciliation scenarios over real temp directories.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use memtree_core::index::ReindexWarning;
use memtree_core::{CategoryPath, MemoryPath, MemoryRecord, RecordMeta, Store};
use tempfile::TempDir;

fn setup() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::new("test", dir.path());
    (dir, store)
}

fn cat(s: &str) -> CategoryPath {
    CategoryPath::parse(s).unwrap()
}

fn write(store: &Store, path: &str) {
    let record = MemoryRecord::new(RecordMeta::now("test"), format!("body of {path}"));
    store
        .write_memory(&MemoryPath::parse(path).unwrap(), &record)
        .unwrap();
}

/// Raw record file dropped into the tree without touching any index,
/// simulating an out-of-band write.
fn drop_raw_file(root: &Path, rel: &str) {
    let file = root.join(rel);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    let record = MemoryRecord::new(RecordMeta::now("raw"), format!("raw {rel}"));
    fs::write(&file, record.encode().unwrap()).unwrap();
}

/// All index files under the root, keyed by relative path, with contents.
fn index_snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut snapshot = BTreeMap::new();
    collect_indexes(root, root, &mut snapshot);
    snapshot
}

fn collect_indexes(root: &Path, dir: &Path, snapshot: &mut BTreeMap<PathBuf, String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_indexes(root, &path, snapshot);
        } else if path.file_name().and_then(|n| n.to_str()) == Some("index.yaml") {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            snapshot.insert(rel, fs::read_to_string(&path).unwrap());
        }
    }
}

#[test]
fn reindex_is_idempotent() {
    let (dir, store) = setup();
    write(&store, "alpha/one");
    write(&store, "alpha/deep/two");
    write(&store, "beta/three");
    write(&store, "root-note");

    store.reindex().unwrap();
    let first = index_snapshot(dir.path());

    let report = store.reindex().unwrap();
    let second = index_snapshot(dir.path());

    assert_eq!(first, second);
    assert!(report.warnings.is_empty());
}

#[test]
fn incremental_and_full_agree_on_clean_history() {
    let (dir, store) = setup();
    write(&store, "alpha/one");
    write(&store, "alpha/deep/two");
    write(&store, "beta/three");

    let incremental = index_snapshot(dir.path());
    store.reindex().unwrap();
    let reconciled = index_snapshot(dir.path());

    assert_eq!(incremental, reconciled);
}

#[test]
fn reindex_picks_up_out_of_band_files() {
    let (_dir, store) = setup();
    drop_raw_file(store.root(), "notes/rust/ownership.md");
    drop_raw_file(store.root(), "notes/rust/lifetimes.md");

    let report = store.reindex().unwrap();
    assert_eq!(report.indexed, 2);

    // Ancestor-of-content: every level up to root has an index and an
    // entry for its child on the path.
    let rust = store.indexes().read(&cat("notes/rust"), false).unwrap();
    assert_eq!(rust.memories.len(), 2);

    let notes = store.indexes().read(&cat("notes"), false).unwrap();
    assert_eq!(notes.subcategory(&cat("notes/rust")).unwrap().memory_count, 2);

    let root = store.indexes().read(&CategoryPath::root(), false).unwrap();
    assert_eq!(root.subcategory(&cat("notes")).unwrap().memory_count, 0);
}

#[test]
fn empty_store_reindex_creates_nothing() {
    let (dir, store) = setup();
    let report = store.reindex().unwrap();

    assert_eq!(report.indexed, 0);
    assert_eq!(report.written, 0);
    assert!(report.warnings.is_empty());
    assert!(index_snapshot(dir.path()).is_empty());
}

#[test]
fn deleting_sibling_store_leaves_other_untouched() {
    // Store with memories at alpha/a and beta/b; delete beta/b's file
    // directly, then reindex: beta's index goes away, root stops listing
    // beta, alpha is unchanged.
    let (_dir, store) = setup();
    write(&store, "alpha/a");
    write(&store, "beta/b");
    store.reindex().unwrap();

    let alpha_before = store.indexes().read(&cat("alpha"), false).unwrap();

    fs::remove_file(store.root().join("beta/b.md")).unwrap();
    store.reindex().unwrap();

    assert!(!store.indexes().exists(&cat("beta")));

    let root = store.indexes().read(&CategoryPath::root(), false).unwrap();
    assert!(root.subcategory(&cat("beta")).is_none());
    assert_eq!(root.subcategory(&cat("alpha")).unwrap().memory_count, 1);

    let alpha_after = store.indexes().read(&cat("alpha"), false).unwrap();
    assert_eq!(alpha_before, alpha_after);
}

#[test]
fn nested_stale_removal_preserves_ancestors_with_content() {
    // a/b/c and a/b/d each hold one memory; deleting c's file removes only
    // c's index, while a/b (still listing d) and a survive.
    let (_dir, store) = setup();
    write(&store, "a/b/c/one");
    write(&store, "a/b/d/two");
    store.reindex().unwrap();

    fs::remove_file(store.root().join("a/b/c/one.md")).unwrap();
    store.reindex().unwrap();

    assert!(!store.indexes().exists(&cat("a/b/c")));

    let ab = store.indexes().read(&cat("a/b"), false).unwrap();
    assert!(ab.subcategory(&cat("a/b/c")).is_none());
    assert_eq!(ab.subcategory(&cat("a/b/d")).unwrap().memory_count, 1);

    assert!(store.indexes().exists(&cat("a")));
    assert!(store.indexes().exists(&CategoryPath::root()));
}

#[test]
fn counts_match_direct_memory_lists_everywhere() {
    let (dir, store) = setup();
    write(&store, "a/one");
    write(&store, "a/two");
    write(&store, "a/b/three");
    write(&store, "a/b/c/four");
    write(&store, "z/five");
    store.reindex().unwrap();

    // For every subcategory entry anywhere, memory_count equals the length
    // of that child's own memories list.
    for (rel, _) in index_snapshot(dir.path()) {
        let category = match rel.parent().and_then(|p| p.to_str()) {
            Some("") | None => CategoryPath::root(),
            Some(p) => cat(p),
        };
        let index = store.indexes().read(&category, false).unwrap();
        for entry in &index.subcategories {
            let child = store.indexes().read(&entry.path, false).unwrap();
            assert_eq!(
                entry.memory_count,
                child.memories.len() as u64,
                "count mismatch for {}",
                entry.path
            );
        }
    }
}

#[test]
fn unmappable_file_is_skipped_with_warning() {
    let (_dir, store) = setup();
    drop_raw_file(store.root(), "notes/___.md");
    drop_raw_file(store.root(), "notes/fine.md");

    let report = store.reindex().unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        report.warnings[0],
        ReindexWarning::UnmappablePath { .. }
    ));

    let notes = store.indexes().read(&cat("notes"), false).unwrap();
    assert_eq!(notes.memories.len(), 1);
    assert_eq!(notes.memories[0].path.to_string(), "notes/fine");
}

#[test]
fn collision_keeps_first_file_and_suggests_alternate() {
    let (_dir, store) = setup();
    // Both names normalize to notes/my-note; sorted walk order makes
    // "My Note.md" the winner.
    drop_raw_file(store.root(), "notes/My Note.md");
    drop_raw_file(store.root(), "notes/my.note.md");

    let report = store.reindex().unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.warnings.len(), 1);

    match &report.warnings[0] {
        ReindexWarning::Collision {
            file,
            path,
            suggested,
        } => {
            assert!(file.ends_with("notes/my.note.md"));
            assert_eq!(path.to_string(), "notes/my-note");
            assert_eq!(suggested, "my-note-2");
        }
        other => panic!("expected collision warning, got {other:?}"),
    }

    // The losing file stays on disk untouched.
    assert!(store.root().join("notes/my.note.md").exists());
}

#[test]
fn index_file_outside_category_tree_is_left_with_warning() {
    let (_dir, store) = setup();
    write(&store, "alpha/one");
    // Hand-placed index file in a directory that is not a valid category.
    let odd = store.root().join("My Dir");
    fs::create_dir_all(&odd).unwrap();
    fs::write(odd.join("index.yaml"), "memories: []\n").unwrap();

    let report = store.reindex().unwrap();

    assert!(report.warnings.iter().any(|w| matches!(
        w,
        ReindexWarning::UnmappablePath { file } if file.ends_with("My Dir/index.yaml")
    )));
    assert!(odd.join("index.yaml").exists());
    assert_eq!(report.deleted, 0);
}

#[test]
fn descriptions_survive_full_reindex() {
    let (_dir, store) = setup();
    write(&store, "notes/one");
    store
        .indexes()
        .set_description(&cat("notes"), Some("general notes"))
        .unwrap();

    store.reindex().unwrap();

    let root = store.indexes().read(&CategoryPath::root(), false).unwrap();
    let entry = root.subcategory(&cat("notes")).unwrap();
    assert_eq!(entry.description.as_deref(), Some("general notes"));
    assert_eq!(entry.memory_count, 1);
}

#[test]
fn described_empty_child_keeps_entry_while_parent_has_content() {
    let (_dir, store) = setup();
    write(&store, "notes/one");
    // "notes/ideas" holds no memories but carries a description.
    store
        .indexes()
        .set_description(&cat("notes/ideas"), Some("future ideas"))
        .unwrap();

    store.reindex().unwrap();

    let notes = store.indexes().read(&cat("notes"), false).unwrap();
    let entry = notes.subcategory(&cat("notes/ideas")).unwrap();
    assert_eq!(entry.memory_count, 0);
    assert_eq!(entry.description.as_deref(), Some("future ideas"));

    // A second pass keeps it stable.
    store.reindex().unwrap();
    let notes = store.indexes().read(&cat("notes"), false).unwrap();
    assert!(notes.subcategory(&cat("notes/ideas")).is_some());
}

#[test]
fn dropped_description_is_reported() {
    let (_dir, store) = setup();
    write(&store, "notes/ideas/one");
    store
        .indexes()
        .set_description(&cat("notes/ideas"), Some("future ideas"))
        .unwrap();

    // Removing the only memory leaves no index anywhere, so the description
    // has no entry left to live in.
    fs::remove_file(store.root().join("notes/ideas/one.md")).unwrap();
    let report = store.reindex().unwrap();

    assert!(report.warnings.iter().any(|w| matches!(
        w,
        ReindexWarning::DroppedDescription { category } if category.to_string() == "notes/ideas"
    )));
    assert!(!store.indexes().exists(&cat("notes")));
}

#[test]
fn partial_ripple_failure_is_repaired_by_reindex() {
    // Simulate a crash between ripple steps: the leaf index knows about the
    // memory but the root index was never updated.
    let (_dir, store) = setup();
    write(&store, "alpha/one");

    // Clobber the root index as if the ripple had never reached it.
    store
        .indexes()
        .write(&CategoryPath::root(), &Default::default())
        .unwrap();

    store.reindex().unwrap();

    let root = store.indexes().read(&CategoryPath::root(), false).unwrap();
    assert_eq!(root.subcategory(&cat("alpha")).unwrap().memory_count, 1);
}
