use anyhow::Result;

use bvmirror_core::config::MirrorConfig;
use bvmirror_core::mirror;

use super::listing_fetch;

/// Dry run: print the target fetch set without creating daemon tasks.
pub async fn run_plan(cfg: &MirrorConfig) -> Result<()> {
    let fetch = listing_fetch(cfg)?;
    let target = mirror::build_plan(cfg, fetch).await?;

    if target.is_empty() {
        println!("Nothing to download, mirror is up to date.");
        return Ok(());
    }
    for key in &target {
        println!("{key}");
    }
    println!("{} files would be downloaded.", target.len());
    Ok(())
}
