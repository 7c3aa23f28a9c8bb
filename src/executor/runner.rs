//! Integration run orchestration
//!
//! Enumerates the requested executables, seeds the work queue, runs the
//! worker pool against the shared log and closes it.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tracing::{debug, info};

use super::backend::{filter_args, ProcessBackend};
use super::enumerate::list_tests;
use super::error::TaskError;
use super::isolation::IsolationPolicy;
use super::pool::{PoolReport, WorkerPool};
use super::queue::WorkQueue;
use crate::config::RunnerConfig;
use crate::models::{ExecutionResult, RunManifest, Task};
use crate::output::LogAggregator;
use crate::utils::{filter_runlist, tests_on_disk, Stopwatch};

/// Runs one task and records its result
pub struct TaskExecutor<W> {
    backend: ProcessBackend,
    isolation: IsolationPolicy,
    log: Arc<LogAggregator<W>>,
}

impl<W> TaskExecutor<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(backend: ProcessBackend, isolation: IsolationPolicy, log: Arc<LogAggregator<W>>) -> Self {
        Self {
            backend,
            isolation,
            log,
        }
    }

    /// Run `task` (isolated if required) and append its block to the log
    pub async fn execute(&self, task: Task) -> Result<ExecutionResult, TaskError> {
        let backend = &self.backend;
        let current = &task;

        let output = self
            .isolation
            .with_isolated_env(&task, move |resource_dir| async move {
                let args = filter_args(&current.test_case, resource_dir.as_deref());
                backend.run(&current.executable, &args).await
            })
            .await?
            .map_err(|source| TaskError::Exec {
                task: task.clone(),
                source,
            })?;

        let result = ExecutionResult::new(task, output);
        self.log
            .record(&result)
            .await
            .map_err(|source| TaskError::LogWrite {
                task: result.task.clone(),
                source,
            })?;

        debug!("Finished {}", result);
        Ok(result)
    }
}

/// Counters reported at the end of a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executables: usize,
    pub queued: usize,
    pub logged: usize,
    pub failed_workers: usize,
}

/// Integration test runner
pub struct IntegrationRunner {
    config: RunnerConfig,
    backend: ProcessBackend,
}

impl IntegrationRunner {
    /// Create a new runner
    pub fn new(config: RunnerConfig) -> Self {
        let backend = ProcessBackend::new(config.folder.clone());
        Self { config, backend }
    }

    /// Requested executables that exist in the tests folder
    pub fn runlist(&self) -> Vec<String> {
        let on_disk = tests_on_disk(&self.config.folder);
        filter_runlist(&self.config.includes, &on_disk)
    }

    /// Enumerate the test cases of every executable in `runlist`
    ///
    /// An executable that cannot be launched aborts the whole run.
    pub async fn build_manifest(&self, runlist: &[String]) -> Result<RunManifest> {
        let mut manifest = RunManifest::new();

        for executable in runlist {
            let tests = list_tests(&self.backend, executable)
                .await
                .with_context(|| format!("Failed to enumerate tests of {executable}"))?;
            info!("{}: {} test cases", executable, tests.len());
            manifest.push(executable.clone(), tests);
        }
        info!("{} test cases enumerated", manifest.task_count());

        Ok(manifest)
    }

    /// Run everything and write the log file
    pub async fn run(&self) -> Result<RunSummary> {
        let mut stopwatch = Stopwatch::new();

        let runlist = self.runlist();
        info!(
            "Running {} of {} requested executables from {}",
            runlist.len(),
            self.config.includes.len(),
            self.config.folder.display()
        );

        let manifest = self.build_manifest(&runlist).await?;
        stopwatch.lap("enumerate");

        let log = LogAggregator::create(&self.config.output)
            .await
            .with_context(|| format!("Failed to open log file {}", self.config.output.display()))?;

        let (summary, _) = self.execute_manifest(&manifest, log).await?;
        stopwatch.lap("execute");

        info!(
            "Wrote {} of {} test cases from {} executables to {} ({})",
            summary.logged,
            summary.queued,
            summary.executables,
            self.config.output.display(),
            stopwatch.format()
        );

        Ok(summary)
    }

    /// Run every task of `manifest` through the worker pool into `log`
    ///
    /// Returns the summary and the closed writer.
    pub async fn execute_manifest<W>(
        &self,
        manifest: &RunManifest,
        log: LogAggregator<W>,
    ) -> Result<(RunSummary, W)>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let queue = Arc::new(WorkQueue::new());
        for task in manifest.tasks() {
            queue.push(task);
        }
        let queued = queue.len();

        let log = Arc::new(log);
        let executor = Arc::new(TaskExecutor::new(
            self.backend.clone(),
            IsolationPolicy::new(self.config.clean_env.iter().cloned()),
            log.clone(),
        ));

        let report: PoolReport = WorkerPool::new(self.config.jobs)
            .run(queue, move |task| {
                let executor = executor.clone();
                async move { executor.execute(task).await.map(|_| ()) }
            })
            .await;
        debug!(
            "Pool finished in {}ms: {} tasks completed, {} workers failed",
            report.duration_ms,
            report.completed(),
            report.failed_workers()
        );

        let log = Arc::try_unwrap(log).map_err(|_| anyhow!("Log is still in use after all workers finished"))?;
        let logged = log.blocks_written();
        let writer = log.close().await.context("Failed to close log")?;

        let summary = RunSummary {
            executables: manifest.entries().len(),
            queued,
            logged,
            failed_workers: report.failed_workers(),
        };

        Ok((summary, writer))
    }
}
