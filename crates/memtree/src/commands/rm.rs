//! `memtree rm` - delete a memory record.

use anyhow::Result;
use colored::Colorize;
use memtree_core::{MemoryPath, Registry};

use crate::cli::RmCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: RmCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let path = MemoryPath::parse(&cmd.path)?;

    let removed = store.delete_memory(&path)?;
    if !removed {
        println!("Memory {} does not exist.", path.to_string().cyan());
        return Ok(());
    }

    if cmd.no_reindex {
        println!(
            "{} Deleted {} (indexes not updated; run `memtree reindex {}`)",
            "✓".green(),
            path.to_string().cyan(),
            cmd.store
        );
        return Ok(());
    }

    store.reindex()?;
    println!("{} Deleted {}", "✓".green(), path.to_string().cyan());
    Ok(())
}
