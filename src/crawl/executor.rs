// src/crawl/executor.rs
// =============================================================================
// How visit tasks are run.
//
// - Inline: the dispatcher awaits each visit itself. Nothing runs
//   concurrently, so a crawl is fully deterministic (handy for tests).
// - Pooled: visits are spawned onto the tokio runtime. A semaphore with
//   `max_workers` permits caps how many run at once. The dispatcher waits for
//   a free permit before spawning, so the pool never grows a backlog.
//
// The worker count picks the strategy: 1 (or 0) means Inline.
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

pub enum Executor {
    Inline,
    Pooled {
        permits: Arc<Semaphore>,
        tasks: JoinSet<()>,
    },
}

impl Executor {
    pub fn for_workers(max_workers: usize) -> Self {
        if max_workers <= 1 {
            Executor::Inline
        } else {
            Executor::Pooled {
                permits: Arc::new(Semaphore::new(max_workers)),
                tasks: JoinSet::new(),
            }
        }
    }

    /// Runs `task` now (Inline) or hands it to a worker (Pooled)
    pub async fn submit<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self {
            Executor::Inline => task.await,
            Executor::Pooled { permits, tasks } => {
                // Reap finished tasks so the JoinSet doesn't grow forever
                while let Some(finished) = tasks.try_join_next() {
                    log_join_error(finished);
                }

                // The semaphore is never closed, so this can't fail
                let Ok(permit) = Arc::clone(permits).acquire_owned().await else {
                    return;
                };
                tasks.spawn(async move {
                    task.await;
                    drop(permit);
                });
            }
        }
    }

    /// Aborts whatever is still running and waits for it to stop
    pub async fn shutdown(self) {
        if let Executor::Pooled { mut tasks, .. } = self {
            tasks.abort_all();
            while let Some(finished) = tasks.join_next().await {
                log_join_error(finished);
            }
        }
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    match result {
        Err(e) if e.is_panic() => error!(error = %e, "visit task panicked"),
        _ => {}
    }
}
