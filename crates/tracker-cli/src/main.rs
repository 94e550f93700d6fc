//! Tracker CLI - type-aware search over work items from the terminal

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands, ItemCommands, TypeCommands};
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::item::{run_item_add, run_item_delete, run_item_list};
use crate::commands::search::{run_search, SearchArgs};
use crate::commands::types::{run_type_add, run_type_list};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tracker=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Search {
            query,
            limit,
            offset,
            timeout_ms,
            json,
        } => {
            let args = SearchArgs {
                query,
                limit,
                offset,
                timeout_ms,
                json,
            };
            run_search(&args, &db_path).await?;
        }
        Commands::Type { command } => match command {
            TypeCommands::Add { name, parent, icon } => {
                run_type_add(&name, parent.as_deref(), &icon, &db_path)?;
            }
            TypeCommands::List { json } => run_type_list(json, &db_path)?,
        },
        Commands::Item { command } => match command {
            ItemCommands::Add {
                type_id,
                title,
                description,
                state,
            } => run_item_add(&type_id, &title, &description, &state, &db_path)?,
            ItemCommands::List {
                limit,
                offset,
                json,
            } => run_item_list(limit, offset, json, &db_path)?,
            ItemCommands::Delete { id } => run_item_delete(&id, &db_path)?,
        },
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
