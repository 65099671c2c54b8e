//! Phase 1: Evidence gathering
//!
//! Issues one search per usable query. Queries shorter than
//! [`MIN_QUERY_CHARS`] after trimming are skipped silently. A failing search
//! is recorded in the audit log and dropped; only fatal backend errors
//! (authentication) abort the run.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use research_analyst_sdk::{log_task_complete, log_task_failed, log_task_start};

use crate::backends::{SearchError, SearchProvider};
use crate::research::state::Stage;
use crate::research::types::{Logged, RawEvidence};
use crate::workflow_utils::execute_batch;

pub const MIN_QUERY_CHARS: usize = 10;
/// Characters of a failing query quoted in the audit log
pub const FAILED_QUERY_PREVIEW_CHARS: usize = 50;

enum SearchOutcome {
    Found(RawEvidence),
    Failed { query: String, error: SearchError },
}

/// Trimmed query, or `None` if it is too short to search
pub fn usable_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (trimmed.chars().count() >= MIN_QUERY_CHARS).then_some(trimmed)
}

fn failure_note(query: &str) -> String {
    let preview: String = query.chars().take(FAILED_QUERY_PREVIEW_CHARS).collect();
    format!("Search failed for query: '{}'", preview)
}

/// Search every usable query, `concurrency` at a time.
///
/// Output order follows input order; skipped and failed queries are absent.
pub async fn gather_evidence(
    search: Arc<dyn SearchProvider>,
    queries: &[String],
    concurrency: usize,
) -> Result<Logged<Vec<RawEvidence>>> {
    let usable: Vec<String> = queries
        .iter()
        .filter_map(|q| usable_query(q))
        .map(str::to_string)
        .collect();

    let outcomes = execute_batch(
        Stage::Gathering.index(),
        usable,
        concurrency,
        move |query, ctx| {
            let search = search.clone();
            async move {
                let task_id = format!("search_{}", ctx.task_number);
                log_task_start!(ctx.phase, &task_id, format!("Searching: {}", query), ctx.total_tasks);

                match search.search(&query).await {
                    Ok(response) => {
                        log_task_complete!(&task_id, format!("{} results", response.results.len()));
                        Ok(SearchOutcome::Found(RawEvidence { query, response }))
                    }
                    Err(error) if error.is_fatal() => {
                        log_task_failed!(&task_id, error.to_string());
                        Err(anyhow!(error).context(format!("Search backend rejected query '{}'", query)))
                    }
                    Err(error) => {
                        log_task_failed!(&task_id, error.to_string());
                        Ok(SearchOutcome::Failed { query, error })
                    }
                }
            }
        },
    )
    .await?;

    let mut gathered = Logged::new(Vec::with_capacity(outcomes.len()));
    for outcome in outcomes {
        match outcome {
            SearchOutcome::Found(evidence) => gathered.value.push(evidence),
            SearchOutcome::Failed { query, error } => {
                tracing::debug!(query = %query, error = %error, "Search failed");
                gathered.notes.push(failure_note(&query));
            }
        }
    }

    let count = gathered.value.len();
    Ok(gathered.note(format!("Evidence gathered for {} queries.", count)))
}
