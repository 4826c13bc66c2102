//! Media staging
//!
//! Converts a durably-stored media URL into a provider-native handle via
//! the provider's two-phase handshake: obtain a write target, transfer
//! the bytes, keep the returned handle. Single-URL operation; the
//! orchestrator owns the per-URL partial-failure policy.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::Result;
use crate::provider::PublishingProvider;
use crate::retry::{is_transient, RetryPolicy};

pub struct MediaStager {
    provider: Arc<dyn PublishingProvider>,
    retry: RetryPolicy,
}

impl MediaStager {
    pub fn new(provider: Arc<dyn PublishingProvider>) -> Self {
        Self::with_policy(provider, RetryPolicy::default())
    }

    pub fn with_policy(provider: Arc<dyn PublishingProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Stage one media URL, retrying transient failures under the bounded
    /// policy before giving up.
    ///
    /// # Errors
    ///
    /// Returns the final `MediaStaging` error once attempts are
    /// exhausted; callers treat it as non-fatal for the overall publish.
    pub async fn stage(&self, source_url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.try_stage(source_url).await {
                Ok(handle) => {
                    if attempt > 1 {
                        info!(source_url, attempt, "media staged after retry");
                    }
                    return Ok(handle);
                }
                Err(e) if is_transient(&e) && attempt < self.retry.max_attempts => {
                    warn!(
                        source_url,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        "transient staging error, retrying: {}",
                        e
                    );
                    sleep(self.retry.interval).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_stage(&self, source_url: &str) -> Result<String> {
        let target = self.provider.create_upload_target().await?;
        self.provider.upload_from_url(&target, source_url).await?;
        Ok(target.handle)
    }
}
