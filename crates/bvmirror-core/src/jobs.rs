//! In-memory job store: dispatch queue, retry list, and monotonic cursors.
//!
//! Owned exclusively by one driver for the lifetime of one run. Cursors
//! count items dispatched (attempted), not items completed.

/// Lifecycle of one download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Submitted,
    Running,
    Done,
    Error,
}

/// One file to fetch through the daemon.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Full URL handed to the daemon's resolver.
    pub source_url: String,
    /// Destination directory, relative to the daemon's download root.
    pub destination_dir: String,
    pub status: JobStatus,
    /// Daemon-assigned ids once submitted.
    pub resolved_id: Option<String>,
    pub task_handle: Option<String>,
}

impl DownloadJob {
    pub fn new(source_url: impl Into<String>, destination_dir: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_dir: destination_dir.into(),
            status: JobStatus::Queued,
            resolved_id: None,
            task_handle: None,
        }
    }
}

/// Queue, retry list, and outcome lists for one run.
#[derive(Debug, Default)]
pub struct JobStore {
    queue: Vec<DownloadJob>,
    pos: usize,
    retry_pos: usize,
    failed: Vec<DownloadJob>,
    done: Vec<DownloadJob>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: DownloadJob) {
        self.queue.push(job);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Primary dispatch cursor (items attempted so far).
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Retry dispatch cursor.
    pub fn retry_pos(&self) -> usize {
        self.retry_pos
    }

    pub fn failed_len(&self) -> usize {
        self.failed.len()
    }

    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    /// Take up to `burst` jobs at the primary cursor, advancing it by the
    /// number actually taken (never past the end of the queue).
    pub fn take_primary(&mut self, burst: usize) -> Vec<DownloadJob> {
        let start = self.pos.min(self.queue.len());
        let end = (start + burst).min(self.queue.len());
        let batch: Vec<DownloadJob> = self.queue[start..end].to_vec();
        self.pos += batch.len();
        batch
    }

    /// Take up to `burst` failed jobs at the retry cursor, bounded by the
    /// snapshot length taken at retry-phase entry. The live failed list may
    /// keep growing past the snapshot; those entries are never re-dispatched.
    pub fn take_retry(&mut self, burst: usize, snapshot_len: usize) -> Vec<DownloadJob> {
        let limit = snapshot_len.min(self.failed.len());
        let start = self.retry_pos.min(limit);
        let end = (start + burst).min(limit);
        let batch: Vec<DownloadJob> = self.failed[start..end].to_vec();
        self.retry_pos += batch.len();
        batch
    }

    /// All queued jobs dispatched at least once.
    pub fn primary_drained(&self) -> bool {
        self.pos >= self.queue.len()
    }

    /// All failed jobs in the retry snapshot dispatched a second time.
    pub fn retry_drained(&self, snapshot_len: usize) -> bool {
        self.retry_pos >= snapshot_len
    }

    pub fn record_done(&mut self, mut job: DownloadJob) {
        job.status = JobStatus::Done;
        self.done.push(job);
    }

    pub fn record_failed(&mut self, mut job: DownloadJob) {
        job.status = JobStatus::Error;
        self.failed.push(job);
    }

    /// Completed jobs, in completion order.
    pub fn done_jobs(&self) -> &[DownloadJob] {
        &self.done
    }

    /// Jobs that failed again during the retry phase: everything appended
    /// past the snapshot boundary is permanently failed.
    pub fn permanently_failed(&self, snapshot_len: usize) -> Vec<DownloadJob> {
        self.failed
            .iter()
            .skip(snapshot_len)
            .cloned()
            .collect()
    }
}
