//! HTTP implementation of the listing fetch capability.

use async_trait::async_trait;

use super::policy::FetchRetryPolicy;
use super::{FetchError, ListingFetch};

/// Fetches listing pages over HTTP with the configured retry policy.
pub struct HttpListingFetch {
    client: reqwest::Client,
    policy: FetchRetryPolicy,
}

impl HttpListingFetch {
    pub fn new(policy: FetchRetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: String::new(),
                source,
            })?;
        Ok(Self { client, policy })
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ListingFetch for HttpListingFetch {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 1u32;
        loop {
            match self.attempt(url).await {
                Ok(body) => {
                    tracing::debug!("fetched listing page from {url}");
                    return Ok(body);
                }
                Err(err) => {
                    tracing::warn!("attempt {attempt} failed for {url}: {err}");
                    if !self.policy.should_retry(attempt) {
                        tracing::error!(
                            "all {} attempts failed for {url}, giving up",
                            self.policy.max_attempts
                        );
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts: self.policy.max_attempts,
                        });
                    }
                    tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}
