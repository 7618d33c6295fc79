//! Listing fetch capability with bounded retry and linear backoff.
//!
//! The catalog traversal only depends on the [`ListingFetch`] trait; the
//! concrete HTTP implementation lives in `http`. Exhausted retries are a
//! permanent failure for that listing call and propagate to the caller.

mod http;
mod policy;

pub use http::HttpListingFetch;
pub use policy::FetchRetryPolicy;

use async_trait::async_trait;

/// Error returned by a listing fetch after its internal retries are spent.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned HTTP {status}")]
    Http { url: String, status: u16 },
    #[error("all {attempts} attempts failed for {url}")]
    Exhausted { url: String, attempts: u32 },
}

/// Capability injected into the catalog: fetch a URL body as text.
#[async_trait]
pub trait ListingFetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}
