use anyhow::Result;

use bvmirror_core::config::MirrorConfig;
use bvmirror_core::mirror;

use super::{daemon_client, listing_fetch};

/// Full mirror pass. Permanent per-file failures are reported, not fatal.
pub async fn run_sync(cfg: &MirrorConfig) -> Result<()> {
    let fetch = listing_fetch(cfg)?;
    let daemon = daemon_client(cfg);

    let report = mirror::run_mirror(cfg, fetch, daemon).await?;

    if report.done.is_empty() && report.failed.is_empty() {
        println!("Nothing to download, mirror is up to date.");
        return Ok(());
    }
    println!("{} files downloaded.", report.done.len());
    if !report.is_complete() {
        println!("{} files permanently failed:", report.failed.len());
        for job in &report.failed {
            println!("  {}", job.source_url);
        }
    }
    Ok(())
}
