//! `memtree ls` - render a category's index.

use anyhow::Result;
use colored::Colorize;
use memtree_core::{CategoryPath, Registry};

use crate::cli::LsCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: LsCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let category = match cmd.category.as_deref() {
        Some(s) => CategoryPath::parse(s)?,
        None => CategoryPath::root(),
    };

    let index = store.indexes().read(&category, true)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("(empty)");
        return Ok(());
    }

    for entry in &index.subcategories {
        let line = format!("{}/  ({} memories)", entry.path, entry.memory_count);
        match &entry.description {
            Some(desc) => println!("{}  {}", line.cyan(), desc.dimmed()),
            None => println!("{}", line.cyan()),
        }
    }
    for entry in &index.memories {
        let tokens = format!("~{} tokens", entry.token_estimate);
        println!("{}  {}", entry.path, tokens.dimmed());
    }
    Ok(())
}
