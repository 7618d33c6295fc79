//! Remote catalog: paginated listing traversal over the bucket index API.
//!
//! `list(prefix)` walks every page for that prefix by re-issuing the same
//! request with the continuation token as a `marker` query parameter until
//! the truncation flag goes false. Pages concatenate in order; each key
//! appears exactly once across the traversal.

pub mod parse;
pub mod roots;

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;

use crate::fetch::ListingFetch;
use parse::parse_listing;

/// Paginated view of the remote object universe.
pub struct RemoteCatalog {
    endpoint: String,
    fetch: Arc<dyn ListingFetch>,
}

impl RemoteCatalog {
    pub fn new(endpoint: impl Into<String>, fetch: Arc<dyn ListingFetch>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetch,
        }
    }

    /// List all entries under `prefix`, following continuation markers.
    ///
    /// Returns either sub-prefixes (directory level) or object keys (leaf
    /// level), in page order. A fetch failure (after the fetch capability's
    /// own retries) aborts the whole traversal.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let base = format!("{}?delimiter=/&prefix={}", self.endpoint, prefix);
        let mut url = base.clone();
        let mut results = Vec::new();
        loop {
            let body = self
                .fetch
                .fetch_text(&url)
                .await
                .with_context(|| format!("listing fetch for prefix {prefix}"))?;
            let page = parse_listing(&body)
                .with_context(|| format!("malformed listing response for {url}"))?;
            results.extend(page.entries());
            if !page.is_truncated() {
                break;
            }
            let marker = page
                .next_marker
                .as_deref()
                .ok_or_else(|| anyhow!("truncated listing without NextMarker: {url}"))?;
            url = format!("{base}&marker={marker}");
        }
        tracing::debug!("listed {} entries under {prefix}", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, ListingFetch};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned XML pages keyed by full request URL.
    struct FakeFetch {
        pages: HashMap<String, String>,
        hits: Mutex<Vec<String>>,
    }

    impl FakeFetch {
        fn new(pages: Vec<(&str, String)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                hits: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ListingFetch for FakeFetch {
        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.hits.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: 1,
                })
        }
    }

    fn contents_page(keys: &[&str], next_marker: Option<&str>) -> String {
        let truncated = next_marker.is_some();
        let marker = next_marker
            .map(|m| format!("<NextMarker>{m}</NextMarker>"))
            .unwrap_or_default();
        let entries: String = keys
            .iter()
            .map(|k| format!("<Contents><Key>{k}</Key></Contents>"))
            .collect();
        format!(
            "<ListBucketResult><IsTruncated>{truncated}</IsTruncated>{marker}{entries}</ListBucketResult>"
        )
    }

    #[tokio::test]
    async fn traversal_concatenates_pages_in_order() {
        let base = "ep?delimiter=/&prefix=data/spot/monthly/trades/BTCUSDT/";
        let fetch = FakeFetch::new(vec![
            (base, contents_page(&["k1", "k2"], Some("k2"))),
            (
                &format!("{base}&marker=k2"),
                contents_page(&["k3"], Some("k3")),
            ),
            (&format!("{base}&marker=k3"), contents_page(&["k4"], None)),
        ]);
        let catalog = RemoteCatalog::new("ep", Arc::new(fetch));
        let keys = catalog
            .list("data/spot/monthly/trades/BTCUSDT/")
            .await
            .unwrap();
        assert_eq!(keys, vec!["k1", "k2", "k3", "k4"]);
        // Each key exactly once.
        let mut dedup = keys.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), keys.len());
    }

    #[tokio::test]
    async fn single_page_terminates_immediately() {
        let base = "ep?delimiter=/&prefix=p/";
        let fetch = FakeFetch::new(vec![(base, contents_page(&["only"], None))]);
        let fetch = Arc::new(fetch);
        let catalog = RemoteCatalog::new("ep", Arc::clone(&fetch) as Arc<dyn ListingFetch>);
        let keys = catalog.list("p/").await.unwrap();
        assert_eq!(keys, vec!["only"]);
        assert_eq!(fetch.hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetch_exhaustion_propagates() {
        let fetch = FakeFetch::new(vec![]);
        let catalog = RemoteCatalog::new("ep", Arc::new(fetch));
        let err = catalog.list("missing/").await.unwrap_err();
        assert!(err.to_string().contains("listing fetch"));
    }

    #[tokio::test]
    async fn truncated_page_without_marker_is_an_error() {
        let base = "ep?delimiter=/&prefix=p/";
        let xml = "<ListBucketResult><IsTruncated>true</IsTruncated>\
                   <Contents><Key>k</Key></Contents></ListBucketResult>";
        let fetch = FakeFetch::new(vec![(base, xml.to_string())]);
        let catalog = RemoteCatalog::new("ep", Arc::new(fetch));
        let err = catalog.list("p/").await.unwrap_err();
        assert!(err.to_string().contains("NextMarker"));
    }
}
