//! `memtree describe` - set or clear a category's description.

use anyhow::{Result, bail};
use colored::Colorize;
use memtree_core::{CategoryPath, Registry};

use crate::cli::DescribeCommand;
use crate::commands::resolve_store;

pub fn execute(cmd: DescribeCommand, registry: &Registry) -> Result<()> {
    let store = resolve_store(registry, &cmd.store)?;
    let category = CategoryPath::parse(&cmd.category)?;

    match (&cmd.description, cmd.clear) {
        (Some(description), false) => {
            store.indexes().set_description(&category, Some(description.as_str()))?;
            println!("{} Described {}", "✓".green(), category.to_string().cyan());
        }
        (None, true) => {
            store.indexes().set_description(&category, None)?;
            println!("{} Cleared description of {}", "✓".green(), category.to_string().cyan());
        }
        _ => bail!("provide a description, or --clear to remove one"),
    }
    Ok(())
}
