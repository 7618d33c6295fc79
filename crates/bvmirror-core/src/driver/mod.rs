//! Download driver: drives the job queue through the daemon.
//!
//! Single cooperative loop, no shared-memory threading: the job store, the
//! cursors, and the tracked-handle list are mutated only here. True
//! parallelism exists only within one dispatch burst, whose resolve+create
//! calls are issued concurrently and awaited as a whole. The only feedback
//! signal from the daemon is polling.

use anyhow::{ensure, Context, Result};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::daemon::{DaemonClient, TaskHandle, TaskStatus};
use crate::jobs::{DownloadJob, JobStatus, JobStore};


/// Scheduling parameters; both are configuration inputs, not hidden constants.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Concurrency ceiling for daemon-side tasks.
    pub max_concurrent_tasks: usize,
    /// Sleep between scheduling/polling steps.
    pub poll_interval: Duration,
}

/// Run phases. A run walks this sequence once, front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    PrimaryDispatch,
    PrimaryDraining,
    RetryDispatch,
    RetryDraining,
    Finished,
}

/// Final outcome of a run: completed jobs and permanently failed jobs.
/// Partial failure is reported as data, never raised.
#[derive(Debug)]
pub struct RunReport {
    pub done: Vec<DownloadJob>,
    pub failed: Vec<DownloadJob>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A submitted job whose daemon task is still being watched.
struct TrackedTask {
    handle: TaskHandle,
    job: DownloadJob,
}

/// The scheduler. Owns the job store exclusively for the duration of `run`.
pub struct DownloadDriver {
    client: Arc<dyn DaemonClient>,
    cfg: DriverConfig,
    phase: DriverPhase,
    tracked: Vec<TrackedTask>,
}

impl DownloadDriver {
    pub fn new(client: Arc<dyn DaemonClient>, cfg: DriverConfig) -> Self {
        Self {
            client,
            cfg,
            phase: DriverPhase::Idle,
            tracked: Vec::new(),
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Drive every queued job through the daemon: primary pass, then one
    /// retry pass over the failures. Startup failures (daemon unreachable,
    /// task queue not empty after clearing) are fatal; per-job failures are
    /// bookkept and reported in the returned [`RunReport`].
    pub async fn run(&mut self, store: &mut JobStore) -> Result<RunReport> {
        self.preflight().await?;

        self.phase = DriverPhase::PrimaryDispatch;
        while !store.primary_drained() {
            self.dispatch_primary(store).await;
            self.poll_tracked(store).await;
            if !store.primary_drained() {
                tokio::time::sleep(self.cfg.poll_interval).await;
            }
        }
        self.phase = DriverPhase::PrimaryDraining;
        self.drain(store).await;

        // Snapshot the retry target length now: the failed list can keep
        // growing while it is drained, and termination is defined against
        // the snapshot, not the live length.
        let snapshot = store.failed_len();
        if snapshot > 0 {
            tracing::info!("retrying {snapshot} failed jobs");
            self.phase = DriverPhase::RetryDispatch;
            while !store.retry_drained(snapshot) {
                self.dispatch_retry(store, snapshot).await;
                self.poll_tracked(store).await;
                if !store.retry_drained(snapshot) {
                    tokio::time::sleep(self.cfg.poll_interval).await;
                }
            }
            self.phase = DriverPhase::RetryDraining;
            self.drain(store).await;
        }

        self.phase = DriverPhase::Finished;
        let report = RunReport {
            done: store.done_jobs().to_vec(),
            failed: store.permanently_failed(snapshot),
        };
        if report.is_complete() {
            tracing::info!("all {} tasks finished", report.done.len());
        } else {
            tracing::warn!(
                "{} tasks finished, {} permanently failed",
                report.done.len(),
                report.failed.len()
            );
        }
        Ok(report)
    }

    /// Pre-run checks: the daemon queue is authoritative and must start
    /// empty, otherwise completed-task polling would observe foreign tasks.
    async fn preflight(&self) -> Result<()> {
        let version = self
            .client
            .server_info()
            .await
            .context("download daemon unreachable at startup")?;
        tracing::info!("connected to download daemon (version {version})");

        self.client
            .clear_all()
            .await
            .context("failed to clear daemon task queue")?;
        tokio::time::sleep(self.cfg.poll_interval).await;
        let leftover = self
            .client
            .list_tasks(None)
            .await
            .context("failed to verify daemon task queue is empty")?;
        ensure!(
            leftover.is_empty(),
            "daemon still reports {} tasks after clearing",
            leftover.len()
        );
        Ok(())
    }

    /// Running-task count from the daemon, converted into a burst size.
    /// A failed poll skips this dispatch step instead of erroring the run.
    async fn window_burst(&self) -> Option<usize> {
        match self.client.list_tasks(Some(TaskStatus::Running)).await {
            Ok(running) => Some(
                self.cfg
                    .max_concurrent_tasks
                    .saturating_sub(running.len()),
            ),
            Err(err) => {
                tracing::warn!("running-count poll failed, skipping dispatch: {err}");
                None
            }
        }
    }

    async fn dispatch_primary(&mut self, store: &mut JobStore) {
        let Some(burst) = self.window_burst().await else {
            return;
        };
        if burst == 0 {
            return;
        }
        let batch = store.take_primary(burst);
        self.submit_batch(batch, store).await;
    }

    async fn dispatch_retry(&mut self, store: &mut JobStore, snapshot: usize) {
        let Some(burst) = self.window_burst().await else {
            return;
        };
        if burst == 0 {
            return;
        }
        let batch = store.take_retry(burst, snapshot);
        self.submit_batch(batch, store).await;
    }

    /// Submit one burst concurrently and wait for the whole burst to settle.
    async fn submit_batch(&mut self, batch: Vec<DownloadJob>, store: &mut JobStore) {
        if batch.is_empty() {
            return;
        }
        let submissions: Vec<_> = batch.into_iter().map(|job| self.submit(job)).collect();
        for outcome in join_all(submissions).await {
            match outcome {
                Ok(tracked) => self.tracked.push(tracked),
                Err(job) => store.record_failed(job),
            }
        }
    }

    /// Resolve and create one task. Any daemon error demotes the job to the
    /// failed list (returned as Err) without interrupting the run.
    async fn submit(&self, mut job: DownloadJob) -> Result<TrackedTask, DownloadJob> {
        job.status = JobStatus::Submitted;
        let resolved = match self.client.resolve(&job.source_url).await {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!("cannot resolve {}: {err}", job.source_url);
                return Err(job);
            }
        };
        job.resolved_id = Some(resolved.id.clone());
        match self
            .client
            .create_task(&resolved.id, &resolved.filename, &job.destination_dir)
            .await
        {
            Ok(handle) => {
                job.task_handle = Some(handle.clone());
                job.status = JobStatus::Running;
                Ok(TrackedTask { handle, job })
            }
            Err(err) => {
                tracing::error!("cannot create task for {}: {err}", job.source_url);
                Err(job)
            }
        }
    }

    /// Poll every tracked handle once. Done and Error handles leave
    /// tracking; a failed poll counts as "still running", not as an error.
    async fn poll_tracked(&mut self, store: &mut JobStore) {
        let tracked = std::mem::take(&mut self.tracked);
        for task in tracked {
            match self.client.get_status(&task.handle).await {
                Ok(TaskStatus::Done) => {
                    tracing::info!("download {} done", task.job.source_url);
                    store.record_done(task.job);
                }
                Ok(TaskStatus::Error) => {
                    tracing::error!("download {} failed", task.job.source_url);
                    store.record_failed(task.job);
                }
                Ok(_) => self.tracked.push(task),
                Err(err) => {
                    tracing::warn!(
                        "status poll for {} failed, treating as still running: {err}",
                        task.handle
                    );
                    self.tracked.push(task);
                }
            }
        }
    }

    /// Poll until no tracked handle remains.
    async fn drain(&mut self, store: &mut JobStore) {
        while !self.tracked.is_empty() {
            tokio::time::sleep(self.cfg.poll_interval).await;
            self.poll_tracked(store).await;
        }
    }
}
