use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracker_core::config::SearchConfig;
use tracker_core::{SearchContext, SearchRepository, SearchResult};

use crate::commands::common::{
    format_item_lines, item_to_list_item, open_database, WorkItemListItem,
};
use crate::error::CliError;

pub struct SearchArgs {
    pub query: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub total: u64,
    pub items: Vec<WorkItemListItem>,
}

pub async fn run_search(args: &SearchArgs, db_path: &Path) -> Result<(), CliError> {
    let result = search_items(args, db_path).await?;

    if args.json {
        let output = SearchOutput {
            total: result.total_count,
            items: result.items.iter().map(item_to_list_item).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("total: {}", result.total_count);
        for line in format_item_lines(&result.items) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn search_items(args: &SearchArgs, db_path: &Path) -> Result<SearchResult, CliError> {
    let config = SearchConfig::from_env()?;
    let db = open_database(db_path)?;
    let search = SearchRepository::new(db, config);
    tracing::debug!(db_path = %db_path.display(), query = %args.query, "Running search");

    let ctx = args.timeout_ms.map_or_else(SearchContext::background, |ms| {
        SearchContext::with_timeout(Duration::from_millis(ms))
    });

    Ok(search
        .search_full_text(&ctx, args.query.trim(), args.limit, args.offset)
        .await?)
}
