mod clear;
mod plan;
mod status;
mod sync;

pub use clear::run_clear;
pub use plan::run_plan;
pub use status::run_status;
pub use sync::run_sync;

use anyhow::Result;
use std::sync::Arc;

use bvmirror_core::config::MirrorConfig;
use bvmirror_core::daemon::{DaemonClient, HttpDaemonClient};
use bvmirror_core::fetch::{FetchRetryPolicy, HttpListingFetch, ListingFetch};

/// Listing fetch capability from the configured retry policy.
pub(crate) fn listing_fetch(cfg: &MirrorConfig) -> Result<Arc<dyn ListingFetch>> {
    let policy = FetchRetryPolicy::from_config(&cfg.fetch_retry());
    Ok(Arc::new(HttpListingFetch::new(policy)?))
}

/// One daemon client handle, scoped to this invocation.
pub(crate) fn daemon_client(cfg: &MirrorConfig) -> Arc<dyn DaemonClient> {
    Arc::new(HttpDaemonClient::new(
        cfg.daemon_url.clone(),
        cfg.daemon_download_root.clone(),
    ))
}
