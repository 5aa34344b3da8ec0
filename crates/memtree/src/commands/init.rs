//! `memtree init` - create the registry file.

use anyhow::Result;
use colored::Colorize;
use memtree_core::Registry;

pub fn execute(registry: &Registry) -> Result<()> {
    registry.initialize()?;
    println!(
        "{} Registry ready at {}",
        "✓".green(),
        registry.file().display()
    );
    Ok(())
}
