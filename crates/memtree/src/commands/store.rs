//! `memtree store` - registry management.

use anyhow::{Context, Result};
use colored::Colorize;
use memtree_core::{Registry, StoreConfig};

use crate::cli::{StoreAction, StoreCommand};

pub fn execute(cmd: StoreCommand, registry: &Registry) -> Result<()> {
    match cmd.action {
        StoreAction::Add {
            name,
            path,
            description,
        } => add(registry, &name, path, description),
        StoreAction::List { json } => list(registry, json),
        StoreAction::Remove { name } => remove(registry, &name),
    }
}

fn add(
    registry: &Registry,
    name: &str,
    path: std::path::PathBuf,
    description: Option<String>,
) -> Result<()> {
    // Accept relative paths on the command line; the registry stores
    // absolute ones.
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot resolve current directory")?
            .join(path)
    };

    let mut loaded = registry.load()?;
    loaded.insert(name, StoreConfig { path: path.clone(), description })?;
    loaded.save()?;

    std::fs::create_dir_all(&path)
        .with_context(|| format!("failed to create store directory {}", path.display()))?;

    println!("{} Registered store {} at {}", "✓".green(), name.cyan(), path.display());
    Ok(())
}

fn list(registry: &Registry, json: bool) -> Result<()> {
    let loaded = registry.load()?;

    if json {
        let stores: serde_json::Map<String, serde_json::Value> = loaded
            .stores()
            .map(|(name, cfg)| {
                (
                    name.to_string(),
                    serde_json::json!({
                        "path": cfg.path,
                        "description": cfg.description,
                    }),
                )
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&stores)?);
        return Ok(());
    }

    if loaded.stores().count() == 0 {
        println!("No stores registered. Add one with `memtree store add <name> <path>`.");
        return Ok(());
    }

    for (name, cfg) in loaded.stores() {
        match &cfg.description {
            Some(desc) => println!("{}  {}  {}", name.cyan(), cfg.path.display(), desc.dimmed()),
            None => println!("{}  {}", name.cyan(), cfg.path.display()),
        }
    }
    Ok(())
}

fn remove(registry: &Registry, name: &str) -> Result<()> {
    let mut loaded = registry.load()?;
    match loaded.remove(name) {
        Some(cfg) => {
            loaded.save()?;
            println!(
                "{} Unregistered {} (files at {} untouched)",
                "✓".green(),
                name.cyan(),
                cfg.path.display()
            );
        }
        None => println!("Store {} is not registered.", name.cyan()),
    }
    Ok(())
}
