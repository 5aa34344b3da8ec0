//! `memtree put` - write a memory record.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use memtree_core::{Error, MemoryPath, MemoryRecord, RecordMeta, Registry};

use crate::cli::PutCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: PutCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let path = MemoryPath::parse(&cmd.path)?;

    let body = match cmd.body {
        Some(body) => body,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read body from stdin")?;
            body
        }
    };

    let expires_at = cmd
        .expires
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid --expires timestamp '{s}' (want RFC 3339)"))
        })
        .transpose()?;

    // Updating an existing memory keeps its creation time.
    let mut meta = match store.read_memory(&path) {
        Ok(existing) => {
            let mut meta = existing.meta;
            meta.updated_at = Utc::now();
            meta
        }
        Err(Error::MemoryNotFound(_)) => RecordMeta::now(cmd.source.as_str()),
        Err(e) => return Err(e.into()),
    };
    meta.source = cmd.source;
    meta.tags = cmd.tags;
    meta.expires_at = expires_at;

    store.write_memory(&path, &MemoryRecord::new(meta, body))?;

    println!("{} Stored {} in {}", "✓".green(), path.to_string().cyan(), cmd.store);
    Ok(())
}
