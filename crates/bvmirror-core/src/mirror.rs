//! End-to-end mirror run: discovery, planning, and driving the daemon.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{roots, RemoteCatalog};
use crate::config::{MirrorConfig, SymbolType};
use crate::daemon::DaemonClient;
use crate::driver::{DownloadDriver, DriverConfig, RunReport};
use crate::fetch::ListingFetch;
use crate::jobs::{DownloadJob, JobStore};
use crate::planner::{self, local_file_set, symbol_segment, PlanFilters};

fn plan_filters(cfg: &MirrorConfig) -> PlanFilters {
    PlanFilters {
        trading_pairs: cfg.trading_pairs.clone(),
        skip_pairs: cfg.skip_pairs.clone(),
        key_words: cfg.key_words.clone(),
        start_date: cfg.start_date.clone(),
        end_date: cfg.end_date.clone(),
        spot_filter: cfg.spot_filter && cfg.symbol_type == SymbolType::Spot,
        skip_checksum: cfg.skip_checksum,
    }
}

/// Symbol-directory prefilter so unmatched symbols are never listed at all.
/// The planner re-applies the same predicates per key afterwards.
fn symbol_dir_wanted(dir: &str, filters: &PlanFilters) -> bool {
    let Some(symbol) = symbol_segment(dir) else {
        return true;
    };
    if let Some(pairs) = &filters.trading_pairs {
        if !pairs.iter().any(|p| p == symbol) {
            return false;
        }
    }
    if filters.skip_pairs.iter().any(|p| p == symbol) {
        return false;
    }
    if let Some(key_words) = &filters.key_words {
        if !key_words.iter().any(|kw| symbol.ends_with(kw.as_str())) {
            return false;
        }
    }
    if filters.spot_filter && !planner::spot::is_pure_spot(symbol) {
        return false;
    }
    true
}

/// Discover the remote universe and compute the target fetch set.
pub async fn build_plan(cfg: &MirrorConfig, fetch: Arc<dyn ListingFetch>) -> Result<Vec<String>> {
    let root = roots::catalog_root(cfg.symbol_type, cfg.agg_period)?;
    let catalog = RemoteCatalog::new(cfg.listing_endpoint.clone(), fetch);
    let filters = plan_filters(cfg);

    let data_type_prefixes = if cfg.data_types.is_empty() {
        catalog
            .list(root)
            .await
            .context("discovering data types under the catalog root")?
    } else {
        roots::data_type_prefixes(root, &cfg.data_types)
    };

    let mut catalog_keys = Vec::new();
    for prefix in &data_type_prefixes {
        let data_type = roots::dir_name(prefix).to_string();
        let symbol_dirs = catalog
            .list(prefix)
            .await
            .with_context(|| format!("listing symbols under {prefix}"))?;
        for dir in symbol_dirs {
            if !symbol_dir_wanted(&dir, &filters) {
                continue;
            }
            let file_prefix = roots::file_prefix(&dir, &data_type, &cfg.frequency);
            let keys = catalog
                .list(&file_prefix)
                .await
                .with_context(|| format!("listing files under {file_prefix}"))?;
            catalog_keys.extend(keys);
        }
    }

    let local_keys: HashSet<String> = if cfg.skip_existed {
        local_file_set(&cfg.data_dir)
    } else {
        HashSet::new()
    };

    let found = catalog_keys.len();
    let target = planner::plan(&catalog_keys, &local_keys, &filters)?;
    tracing::info!(
        "catalog holds {found} files, {} filtered or already mirrored, {} to download",
        found - target.len(),
        target.len()
    );
    Ok(target)
}

/// Build the dispatch queue for a target set.
pub fn jobs_from_keys(cfg: &MirrorConfig, keys: &[String]) -> JobStore {
    let mut store = JobStore::new();
    for key in keys {
        let source_url = format!("{}{}", cfg.download_base_url, key);
        let destination_dir = key.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        store.push(DownloadJob::new(source_url, destination_dir));
    }
    store
}

/// Full mirror run. Per-job failures end up in the report; catalog and
/// daemon-startup failures abort the run.
pub async fn run_mirror(
    cfg: &MirrorConfig,
    fetch: Arc<dyn ListingFetch>,
    daemon: Arc<dyn DaemonClient>,
) -> Result<RunReport> {
    let target = build_plan(cfg, fetch).await?;
    if target.is_empty() {
        tracing::info!("no data need to download");
        return Ok(RunReport {
            done: Vec::new(),
            failed: Vec::new(),
        });
    }

    let mut store = jobs_from_keys(cfg, &target);
    let driver_cfg = DriverConfig {
        max_concurrent_tasks: cfg.max_concurrent_tasks.max(1),
        poll_interval: Duration::from_millis(cfg.poll_interval_ms),
    };
    let mut driver = DownloadDriver::new(daemon, driver_cfg);
    driver.run(&mut store).await
}
