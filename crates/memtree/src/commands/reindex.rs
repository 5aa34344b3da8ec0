//! `memtree reindex` - full reconciliation of a store's indexes.

use anyhow::Result;
use colored::Colorize;
use memtree_core::Registry;

use crate::cli::ReindexCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: ReindexCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let report = store.reindex()?;

    println!(
        "{} Reindexed {}: {} memories, {} indexes written, {} stale removed",
        "✓".green(),
        cmd.store.cyan(),
        report.indexed,
        report.written,
        report.deleted
    );

    for warning in &report.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    Ok(())
}
