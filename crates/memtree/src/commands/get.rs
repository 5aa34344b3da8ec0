//! `memtree get` - read a memory record.

use anyhow::Result;
use colored::Colorize;
use memtree_core::{MemoryPath, Registry};

use crate::cli::GetCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: GetCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let path = MemoryPath::parse(&cmd.path)?;
    let record = store.read_memory(&path)?;

    if cmd.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "path": path.to_string(),
                "created_at": record.meta.created_at,
                "updated_at": record.meta.updated_at,
                "tags": record.meta.tags,
                "source": record.meta.source,
                "expires_at": record.meta.expires_at,
                "citations": record.meta.citations,
                "body": record.body,
            }))?
        );
        return Ok(());
    }

    println!("{}", path.to_string().cyan().bold());
    println!(
        "{}",
        format!(
            "updated {}  source {}",
            record.meta.updated_at.to_rfc3339(),
            record.meta.source
        )
        .dimmed()
    );
    if !record.meta.tags.is_empty() {
        println!("  tags: {}", record.meta.tags.join(", ").dimmed());
    }
    println!();
    println!("{}", record.body);
    Ok(())
}
