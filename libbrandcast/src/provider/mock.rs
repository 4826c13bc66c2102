//! Mock publishing provider for testing
//!
//! A configurable stand-in for the external provider that can simulate
//! listing failures, per-URL staging failures, and submission failures,
//! while capturing every submission for verification. Available to all
//! builds so integration tests can exercise the orchestrator without
//! network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::{ProviderError, Result};

use super::{
    AccountStatus, CreatePostRequest, DeliveryResult, ProviderAccount, ProviderPost,
    PublishingProvider, UploadTarget,
};

/// Configuration for mock provider behavior
#[derive(Debug, Clone, Default)]
pub struct MockProviderConfig {
    /// Accounts returned by `list_accounts`, in provider vocabulary
    pub accounts: Vec<ProviderAccount>,

    /// Whether `list_accounts` fails with `Unavailable`
    pub listing_fails: bool,

    /// Source URLs whose staging fails with `MediaStaging`
    pub staging_fails_for: Vec<String>,

    /// Whether `create_post` fails with `Submission`
    pub submission_fails: bool,

    /// Results returned by `list_results`
    pub results: Vec<DeliveryResult>,

    /// Number of times `list_accounts` has been called
    pub list_accounts_calls: Arc<Mutex<usize>>,

    /// Source URLs successfully staged, in order
    pub staged_urls: Arc<Mutex<Vec<String>>>,

    /// Every submission passed to `create_post`
    pub submissions: Arc<Mutex<Vec<CreatePostRequest>>>,
}

/// Mock provider for testing
pub struct MockProvider {
    config: MockProviderConfig,
}

/// Build a connected account in provider vocabulary.
pub fn connected(platform: &str, id: &str) -> ProviderAccount {
    ProviderAccount {
        platform: platform.to_string(),
        id: id.to_string(),
        status: AccountStatus::Connected,
    }
}

impl MockProvider {
    pub fn new(config: MockProviderConfig) -> Self {
        Self { config }
    }

    /// Mock with the given connected accounts and everything succeeding.
    pub fn with_accounts(accounts: Vec<ProviderAccount>) -> Self {
        Self::new(MockProviderConfig {
            accounts,
            ..Default::default()
        })
    }

    /// Mock whose account listing fails (provider unreachable).
    pub fn failing_listing() -> Self {
        Self::new(MockProviderConfig {
            listing_fails: true,
            ..Default::default()
        })
    }

    /// Mock whose fan-out submission fails.
    pub fn failing_submission(accounts: Vec<ProviderAccount>) -> Self {
        Self::new(MockProviderConfig {
            accounts,
            submission_fails: true,
            ..Default::default()
        })
    }

    /// Mark source URLs whose staging should fail.
    pub fn with_staging_failures(mut self, urls: &[&str]) -> Self {
        self.config.staging_fails_for = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Set the delivery results reported by `list_results`.
    pub fn with_results(mut self, results: Vec<DeliveryResult>) -> Self {
        self.config.results = results;
        self
    }

    pub fn list_accounts_calls(&self) -> usize {
        *self.config.list_accounts_calls.lock().unwrap()
    }

    pub fn staged_urls(&self) -> Vec<String> {
        self.config.staged_urls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<CreatePostRequest> {
        self.config.submissions.lock().unwrap().clone()
    }

    /// Shared handles for inspecting calls after the mock has been moved
    /// behind an `Arc<dyn PublishingProvider>`.
    pub fn probes(&self) -> MockProbes {
        MockProbes {
            staged_urls: Arc::clone(&self.config.staged_urls),
            submissions: Arc::clone(&self.config.submissions),
        }
    }
}

/// Inspection handles cloned out of a [`MockProvider`].
#[derive(Clone)]
pub struct MockProbes {
    staged_urls: Arc<Mutex<Vec<String>>>,
    submissions: Arc<Mutex<Vec<CreatePostRequest>>>,
}

impl MockProbes {
    pub fn staged_urls(&self) -> Vec<String> {
        self.staged_urls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<CreatePostRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishingProvider for MockProvider {
    async fn list_accounts(&self, _external_id: &str) -> Result<Vec<ProviderAccount>> {
        *self.config.list_accounts_calls.lock().unwrap() += 1;

        if self.config.listing_fails {
            return Err(ProviderError::Unavailable("Mock provider unreachable".to_string()).into());
        }
        Ok(self.config.accounts.clone())
    }

    async fn create_upload_target(&self) -> Result<UploadTarget> {
        let handle = format!("media-{}", Uuid::new_v4());
        Ok(UploadTarget {
            write_url: format!("mock://upload/{}", handle),
            handle,
        })
    }

    async fn upload_from_url(&self, _target: &UploadTarget, source_url: &str) -> Result<()> {
        if self
            .config
            .staging_fails_for
            .iter()
            .any(|url| url == source_url)
        {
            return Err(
                ProviderError::MediaStaging(format!("Mock staging failed for {}", source_url))
                    .into(),
            );
        }

        self.config
            .staged_urls
            .lock()
            .unwrap()
            .push(source_url.to_string());
        Ok(())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<ProviderPost> {
        if self.config.submission_fails {
            return Err(ProviderError::Submission("Mock submission failed".to_string()).into());
        }

        self.config.submissions.lock().unwrap().push(request.clone());
        Ok(ProviderPost {
            id: format!("mock-post-{}", Uuid::new_v4()),
        })
    }

    async fn list_results(&self, _provider_post_id: &str) -> Result<Vec<DeliveryResult>> {
        Ok(self.config.results.clone())
    }
}
