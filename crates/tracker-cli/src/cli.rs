use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Search and manage typed work items from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full-text search; add `type:<id>` tokens to restrict by type
    Search {
        /// Search query (empty lists everything)
        #[arg(default_value = "")]
        query: String,
        /// Page size (defaults to the configured search limit)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Number of matches to skip
        #[arg(short, long)]
        offset: Option<usize>,
        /// Give up after this many milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage work item types
    Type {
        #[command(subcommand)]
        command: TypeCommands,
    },
    /// Manage work items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TypeCommands {
    /// Create a new work item type
    Add {
        /// Type name
        name: String,
        /// Parent type ID this type extends
        #[arg(long, value_name = "ID")]
        parent: Option<String>,
        /// Icon name
        #[arg(long, default_value = "fa-bookmark")]
        icon: String,
    },
    /// List all work item types
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Create a new work item
    #[command(alias = "new")]
    Add {
        /// Type ID of the new item
        #[arg(long = "type", value_name = "ID")]
        type_id: String,
        /// Work item title
        title: Vec<String>,
        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Lifecycle state
        #[arg(long, default_value = "new")]
        state: String,
    },
    /// List work items in creation order
    List {
        /// Number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Number of items to skip
        #[arg(short, long, default_value = "0")]
        offset: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Soft delete a work item
    Delete {
        /// Work item ID
        id: String,
    },
}
