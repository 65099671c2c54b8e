//! Batch execution utilities for parallel task processing

use anyhow::{anyhow, Result};
use futures::{stream::FuturesUnordered, Future, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Context provided to each task in a batch
#[derive(Debug, Clone, Copy)]
pub struct TaskContext {
    /// Phase number (for logging)
    pub phase: usize,
    /// Task number (1-indexed for display)
    pub task_number: usize,
    /// Total number of tasks in this batch
    pub total_tasks: usize,
}

/// Execute items with at most `batch_size` tasks in flight
///
/// # Returns
/// Results in input order, regardless of completion order
///
/// # Error Handling
/// Fails fast - the first task error stops collection and is returned.
/// Tasks that want isolation should fold their failures into `R`.
pub async fn execute_batch<T, F, Fut, R>(
    phase: usize,
    items: Vec<T>,
    batch_size: usize,
    task_executor: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let total = items.len();
    let sem = Arc::new(Semaphore::new(batch_size.max(1)));
    let executor = Arc::new(task_executor);
    let mut tasks = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let sem = sem.clone();
        let executor = executor.clone();

        let ctx = TaskContext {
            phase,
            task_number: idx + 1,
            total_tasks: total,
        };

        tasks.push(async move {
            // Acquire permit (blocks if batch_size tasks are running)
            let _permit = sem
                .acquire()
                .await
                .map_err(|_| anyhow!("Semaphore closed"))?;

            executor(item, ctx).await.map(|result| (idx, result))
        });
    }

    let mut indexed = Vec::with_capacity(total);
    while let Some(result) = tasks.next().await {
        indexed.push(result?);
    }

    indexed.sort_by_key(|(idx, _)| *idx);
    Ok(indexed.into_iter().map(|(_, result)| result).collect())
}
