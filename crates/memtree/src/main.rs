//! memtree - hierarchical memory store CLI
//!
//! Thin wrapper around memtree-core: every command resolves a store through
//! the registry and calls one engine operation.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("memtree=warn".parse()?))
        .init();

    let cli = Cli::parse();
    let registry = commands::registry_handle(cli.registry.clone())?;

    match cli.command {
        Commands::Init => commands::init::execute(&registry),
        Commands::Store(cmd) => commands::store::execute(cmd, &registry),
        Commands::Put(cmd) => commands::put::execute(cmd, &registry),
        Commands::Get(cmd) => commands::get::execute(cmd, &registry),
        Commands::Ls(cmd) => commands::ls::execute(cmd, &registry),
        Commands::Rm(cmd) => commands::rm::execute(cmd, &registry),
        Commands::Describe(cmd) => commands::describe::execute(cmd, &registry),
        Commands::Reindex(cmd) => commands::reindex::execute(cmd, &registry),
        Commands::Version => {
            println!("memtree {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
