//! Worker pool
//!
//! Runs a fixed number of workers that drain a shared [`WorkQueue`].

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

use super::error::{error_chain, ExecError, TaskError};
use super::queue::WorkQueue;
use crate::models::Task;

/// Number of processing units available to this process
pub fn available_workers() -> usize {
    thread::available_parallelism().map(usize::from).unwrap_or(1)
}

/// What one worker did before it stopped
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub completed: usize,
    pub failed: bool,
}

/// Summary of a whole pool run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub workers: Vec<WorkerReport>,
    pub duration_ms: u64,
}

impl PoolReport {
    pub fn completed(&self) -> usize {
        self.workers.iter().map(|w| w.completed).sum()
    }

    pub fn failed_workers(&self) -> usize {
        self.workers.iter().filter(|w| w.failed).count()
    }
}

/// Fixed-size pool of parallel workers
#[derive(Clone, Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool of `workers` workers (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per available processing unit
    pub fn per_core() -> Self {
        Self::new(available_workers())
    }

    /// Drain `queue` with all workers and wait for every one of them
    ///
    /// Each worker pops a task, awaits `execute` on it and repeats until the
    /// queue is empty. A task error stops only the worker that hit it; the
    /// task is not retried or requeued.
    pub async fn run<F, Fut>(&self, queue: Arc<WorkQueue>, execute: F) -> PoolReport
    where
        F: Fn(Task) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        info!(
            "Starting {} workers for {} queued tasks",
            self.workers,
            queue.len()
        );

        let start = Instant::now();
        let execute = Arc::new(execute);

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let queue = queue.clone();
                let execute = execute.clone();
                tokio::spawn(async move { worker_loop(id, &queue, execute.as_ref()).await })
            })
            .collect();

        let mut workers = Vec::with_capacity(handles.len());
        for (id, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(report) => workers.push(report),
                Err(e) => {
                    error!("Worker {} aborted: {}", id, e);
                    workers.push(WorkerReport {
                        id,
                        completed: 0,
                        failed: true,
                    });
                }
            }
        }

        PoolReport {
            workers,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::per_core()
    }
}

async fn worker_loop<F, Fut>(id: usize, queue: &WorkQueue, execute: &F) -> WorkerReport
where
    F: Fn(Task) -> Fut,
    Fut: Future<Output = Result<(), TaskError>>,
{
    let mut report = WorkerReport {
        id,
        ..Default::default()
    };
    debug!("Worker {} started", id);

    loop {
        if queue.is_empty() {
            break;
        }
        // Another worker may have taken the last task since the check.
        let Some(task) = queue.try_pop() else {
            break;
        };

        match execute(task).await {
            Ok(()) => report.completed += 1,
            Err(e) => {
                log_task_error(id, &e);
                report.failed = true;
                break;
            }
        }
    }

    debug!(
        "Worker {} finished after {} tasks{}",
        report.id,
        report.completed,
        if report.failed { " (stopped on error)" } else { "" }
    );
    report
}

fn log_task_error(worker: usize, err: &TaskError) {
    let message = error_chain(err);
    match err {
        TaskError::Exec {
            source: ExecError::Launch { .. },
            ..
        } => error!("Worker {} stopping, executable could not be launched: {}", worker, message),
        TaskError::Exec { .. } => error!("Worker {} stopping, child process failed: {}", worker, message),
        TaskError::IsolationSetup { .. } => {
            error!("Worker {} stopping, no clean environment: {}", worker, message)
        }
        TaskError::LogWrite { .. } => error!("Worker {} stopping, log is not writable: {}", worker, message),
    }
}
