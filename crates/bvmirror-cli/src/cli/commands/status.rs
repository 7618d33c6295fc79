use anyhow::Result;

use bvmirror_core::config::MirrorConfig;
use bvmirror_core::daemon::TaskStatus;

use super::daemon_client;

/// Show daemon version plus total and running task counts.
pub async fn run_status(cfg: &MirrorConfig) -> Result<()> {
    let daemon = daemon_client(cfg);
    let version = daemon.server_info().await?;
    let total = daemon.list_tasks(None).await?.len();
    let running = daemon.list_tasks(Some(TaskStatus::Running)).await?.len();

    println!("daemon version: {version}");
    println!("tasks: {total} total, {running} running");
    Ok(())
}
