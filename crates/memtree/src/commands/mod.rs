//! Command implementations for the memtree CLI.
//!
//! Each submodule implements one command group as a thin wrapper around a
//! memtree-core operation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use memtree_core::{Registry, Store};

pub mod describe;
pub mod get;
pub mod init;
pub mod ls;
pub mod put;
pub mod reindex;
pub mod rm;
pub mod store;

/// Resolve the registry handle from the --registry flag or the per-user
/// default location.
pub fn registry_handle(explicit: Option<PathBuf>) -> Result<Registry> {
    if let Some(path) = explicit {
        return Ok(Registry::new(path));
    }
    match Registry::default_location() {
        Some(registry) => Ok(registry),
        None => bail!("could not determine a registry location; pass --registry"),
    }
}

/// Load the registry and resolve a store by name.
pub fn resolve_store(registry: &Registry, name: &str) -> Result<Store> {
    let loaded = registry
        .load()
        .context("failed to load the store registry (run `memtree init` first?)")?;
    Ok(loaded.get_store(name)?)
}
