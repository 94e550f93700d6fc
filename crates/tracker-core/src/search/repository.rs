//! Full-text search entry point

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::context::SearchContext;
use super::executor::{classify_error, execute, AbortHook, Pagination, SearchResult};
use super::hierarchy::resolve;
use super::query::{parse, ParsedQuery};
use crate::config::SearchConfig;
use crate::db::{Database, SqliteWorkItemTypeRepository, WorkItemTypeRepository};
use crate::error::{Error, Result};

/// Type-aware full-text search over work items
///
/// Holds no per-call state; one instance can serve concurrent searches.
#[derive(Clone)]
pub struct SearchRepository {
    db: Database,
    config: SearchConfig,
}

impl SearchRepository {
    pub const fn new(db: Database, config: SearchConfig) -> Self {
        Self { db, config }
    }

    /// Search visible work items
    ///
    /// `limit` falls back to the configured default and is clamped to the
    /// configured maximum; `offset` defaults to zero. The returned count is
    /// the size of the whole match set, independent of the page.
    pub async fn search_full_text(
        &self,
        ctx: &SearchContext,
        raw_query: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<SearchResult> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let query = parse(raw_query);
        let pagination = Pagination {
            limit: self.config.clamp_limit(limit),
            offset: offset.unwrap_or(0),
        };
        tracing::debug!(
            terms = ?query.terms(),
            type_filters = query.type_filters().len(),
            limit = pagination.limit,
            offset = pagination.offset,
            "Running full-text search"
        );

        let abort = Arc::new(AtomicBool::new(false));
        let db = self.db.clone();
        let task_abort = Arc::clone(&abort);
        let task =
            tokio::task::spawn_blocking(move || run_search(&db, &query, pagination, task_abort));

        let result = tokio::select! {
            joined = task => joined
                .map_err(|error| Error::Database(format!("search task failed: {error}")))?
                .map_err(classify_error),
            () = ctx.done() => {
                abort.store(true, Ordering::Relaxed);
                Err(Error::Cancelled)
            }
        };

        match &result {
            Ok(found) => tracing::debug!(
                total = found.total_count,
                returned = found.items.len(),
                "Search finished"
            ),
            Err(error) => tracing::debug!(%error, "Search failed"),
        }
        result
    }
}

fn run_search(
    db: &Database,
    query: &ParsedQuery,
    pagination: Pagination,
    abort: Arc<AtomicBool>,
) -> Result<SearchResult> {
    db.with_read_conn(|conn| {
        if abort.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }

        let tx = conn.unchecked_transaction()?;
        let hook = AbortHook::install(&tx, abort);

        let forest = SqliteWorkItemTypeRepository::new(&tx).load_forest()?;
        let closure = resolve(&forest, query.type_filters());
        let result = execute(&tx, query.terms(), &closure, pagination)?;

        drop(hook);
        tx.commit()?;
        Ok(result)
    })
}
