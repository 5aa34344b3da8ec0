//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Hierarchical memory store CLI
///
/// Stores short text records in category trees with self-repairing indexes.
#[derive(Parser, Debug)]
#[command(name = "memtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Registry file to use (default: the per-user stores.yaml)
    #[arg(long, global = true, env = "MEMTREE_REGISTRY")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the registry file if it does not exist
    Init,

    /// Store registry management (add, list, remove)
    Store(StoreCommand),

    /// Write a memory record
    Put(PutCommand),

    /// Read a memory record
    Get(GetCommand),

    /// List a category's memories and subcategories
    Ls(LsCommand),

    /// Delete a memory record
    Rm(RmCommand),

    /// Set or clear a category's description
    Describe(DescribeCommand),

    /// Rebuild every index in a store from the files on disk
    Reindex(ReindexCommand),

    /// Print version
    Version,
}

#[derive(Args, Debug)]
pub struct StoreCommand {
    #[command(subcommand)]
    pub action: StoreAction,
}

#[derive(Subcommand, Debug)]
pub enum StoreAction {
    /// Register a store
    Add {
        /// Store name (slug)
        name: String,
        /// Absolute root directory
        path: PathBuf,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List registered stores
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Unregister a store (files on disk are untouched)
    Remove {
        /// Store name
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct PutCommand {
    /// Store name
    pub store: String,
    /// Memory path, e.g. rust/ownership
    pub path: String,
    /// Body text (read from stdin when omitted)
    pub body: Option<String>,
    /// Tags to attach
    #[arg(short, long)]
    pub tags: Vec<String>,
    /// Source label
    #[arg(short, long, default_value = "cli")]
    pub source: String,
    /// Expiry timestamp (RFC 3339)
    #[arg(long)]
    pub expires: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetCommand {
    /// Store name
    pub store: String,
    /// Memory path
    pub path: String,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LsCommand {
    /// Store name
    pub store: String,
    /// Category path (store root when omitted)
    pub category: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RmCommand {
    /// Store name
    pub store: String,
    /// Memory path
    pub path: String,
    /// Skip the reconciliation pass (leaves stale index entries)
    #[arg(long)]
    pub no_reindex: bool,
}

#[derive(Args, Debug)]
pub struct DescribeCommand {
    /// Store name
    pub store: String,
    /// Category path
    pub category: String,
    /// Description text
    pub description: Option<String>,
    /// Clear the description instead of setting it
    #[arg(long, conflicts_with = "description")]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct ReindexCommand {
    /// Store name
    pub store: String,
}
