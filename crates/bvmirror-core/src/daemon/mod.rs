//! External download daemon capability boundary.
//!
//! The daemon is an opaque, stateful task queue that can only be polled.
//! The driver depends on this trait alone; the HTTP JSON implementation
//! lives in `http`. One client handle is constructed explicitly per run
//! and injected into the driver, never shared global state.

mod http;

pub use http::HttpDaemonClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Status of one daemon-side task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Done,
    Error,
}

/// Daemon-assigned identifier of a created task.
pub type TaskHandle = String;

/// Result of resolving a source URL.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub id: String,
    /// Filename of the first file behind the URL.
    pub filename: String,
}

/// Errors crossing the daemon boundary. The driver treats any of these from
/// a per-job call identically to an Error outcome for that job.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("daemon transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("daemon {call} failed with code {code}: {msg}")]
    Api {
        call: &'static str,
        code: i64,
        msg: String,
    },
    #[error("daemon {0} response carried no data")]
    MissingData(&'static str),
}

/// Operations the daemon exposes. All calls are remote and may fail.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    /// Connectivity probe; returns the daemon version string.
    async fn server_info(&self) -> Result<String, DaemonError>;

    /// Resolve a source URL into a request id and filename.
    async fn resolve(&self, url: &str) -> Result<ResolvedRequest, DaemonError>;

    /// Create a download task from a resolved id; returns its handle.
    async fn create_task(
        &self,
        resolved_id: &str,
        filename: &str,
        dest_dir: &str,
    ) -> Result<TaskHandle, DaemonError>;

    /// Handles of daemon-side tasks, optionally filtered by status.
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<TaskHandle>, DaemonError>;

    /// Current status of one task.
    async fn get_status(&self, handle: &str) -> Result<TaskStatus, DaemonError>;

    /// Delete all tasks regardless of status. Afterwards the daemon must
    /// report zero tasks; the driver verifies that separately.
    async fn clear_all(&self) -> Result<(), DaemonError>;
}
