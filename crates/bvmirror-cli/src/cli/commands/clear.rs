use anyhow::{ensure, Result};

use bvmirror_core::config::MirrorConfig;

use super::daemon_client;

/// Delete every task from the daemon queue and verify it is empty.
pub async fn run_clear(cfg: &MirrorConfig) -> Result<()> {
    let daemon = daemon_client(cfg);
    daemon.clear_all().await?;
    let leftover = daemon.list_tasks(None).await?;
    ensure!(
        leftover.is_empty(),
        "daemon still reports {} tasks after clearing",
        leftover.len()
    );
    println!("Daemon task queue cleared.");
    Ok(())
}
