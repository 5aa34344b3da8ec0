//! memtree-core - hierarchical memory stores with self-repairing indexes
//!
//! This crate persists short text records ("memories") inside a category
//! tree on disk and keeps a per-category `index.yaml` sidecar consistent
//! with the record files actually present:
//!
//! - **path**: validated category/memory path value types
//! - **record**: memory record files (front matter + body)
//! - **index**: the index model, codec, per-category store, incremental
//!   updater, and full reconciliation engine
//! - **registry**: `stores.yaml` mapping store names to root directories
//! - **store**: the scoped handle bundling memory/index/repair operations
//!
//! ## Usage
//!
//! ```ignore
//! use memtree_core::{MemoryPath, MemoryRecord, RecordMeta, Registry};
//!
//! let registry = Registry::default_location().unwrap();
//! registry.initialize()?;
//! let loaded = registry.load()?;
//! let store = loaded.get_store("main")?;
//!
//! let path = MemoryPath::parse("rust/ownership")?;
//! let record = MemoryRecord::new(RecordMeta::now("session"), "Borrowing rules...");
//! store.write_memory(&path, &record)?;
//!
//! // Repair after out-of-band edits
//! let report = store.reindex()?;
//! ```
//!
//! Concurrency model: all operations are sequential, synchronous file I/O
//! within a single logical caller. Multi-step updates issue independent
//! writes with no cross-file transaction; [`Store::reindex`] is the
//! convergent repair path. Multi-process locking is out of scope.

pub mod error;
pub mod index;
pub mod path;
pub mod record;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use index::{CategoryIndex, IndexStore, MemoryEntry, ReindexReport, SubcategoryEntry};
pub use path::{CategoryPath, MemoryPath};
pub use record::{MemoryRecord, RecordMeta};
pub use registry::{LoadedRegistry, Registry, StoreConfig};
pub use store::Store;
