//! Category index maintenance.
//!
//! Every category with content carries a sidecar `index.yaml` listing its
//! direct memories and its child categories. This module owns both ways of
//! keeping those files consistent with the record files on disk:
//!
//! - **Incremental** ([`update`]): after a single memory write, patch the
//!   memory's own index and ripple membership/counts up to the root. Fast,
//!   best-effort, no cross-file transaction.
//! - **Full reconciliation** ([`reindex`]): rebuild every index from the
//!   files actually present. Idempotent; the repair path the incremental
//!   layer leans on.
//!
//! Invariants the pair maintains:
//! 1. An index's `memories` list equals the record files directly in the
//!    category.
//! 2. A `subcategories` entry exists for child C iff C transitively contains
//!    a memory; its `memory_count` is C's *direct* memory count.
//! 3. An index file exists iff the category or a descendant holds a memory.
//! 4. A subcategory `description` outlives the content-driven rules: a
//!    described-but-empty child keeps its entry.

pub mod codec;
pub mod reindex;
pub mod store;
pub mod types;
pub mod update;

pub use codec::INDEX_FILE_NAME;
pub use reindex::{ReindexReport, ReindexWarning, Reindexer};
pub use store::IndexStore;
pub use types::{CategoryIndex, MemoryEntry, SubcategoryEntry};
pub use update::IndexUpdater;
