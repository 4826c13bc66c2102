//! Publish orchestration
//!
//! The coordinator that turns an approved content item into one logical
//! fan-out post at the publishing provider plus durable per-platform
//! schedule records. The step ordering is the failure-containment
//! contract: nothing is persisted until the provider has accepted the
//! submission, and a publish attempt with zero resolvable destinations
//! is a complete no-op on stored state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::caption;
use crate::db::Database;
use crate::error::{BrandcastError, Result};
use crate::media::MediaStager;
use crate::provider::{CreatePostRequest, PublishingProvider};
use crate::registry::AccountRegistry;
use crate::retry::RetryPolicy;
use crate::types::{ContentStatus, Platform, ScheduleEntry, ScheduleStatus};

/// One request to publish a content item to a set of platforms.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub content_id: String,
    pub client_id: String,
    pub platforms: Vec<Platform>,
    /// None means publish immediately.
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Outcome of a successful orchestration call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub provider_post_id: String,
    /// The platforms that actually resolved to a connected account.
    pub platforms: Vec<Platform>,
    pub content_status: ContentStatus,
}

pub struct PublishOrchestrator {
    db: Arc<Database>,
    provider: Arc<dyn PublishingProvider>,
    registry: AccountRegistry,
    stager: MediaStager,
}

impl PublishOrchestrator {
    pub fn new(db: Arc<Database>, provider: Arc<dyn PublishingProvider>) -> Self {
        Self::with_staging_policy(db, provider, RetryPolicy::default())
    }

    pub fn with_staging_policy(
        db: Arc<Database>,
        provider: Arc<dyn PublishingProvider>,
        staging_policy: RetryPolicy,
    ) -> Self {
        let registry = AccountRegistry::new(Arc::clone(&provider));
        let stager = MediaStager::with_policy(Arc::clone(&provider), staging_policy);
        Self {
            db,
            provider,
            registry,
            stager,
        }
    }

    /// Submit one fan-out post for a content item and record the outcome.
    ///
    /// Steps, in order: validate the request, load the content item,
    /// resolve connected accounts, stage media one URL at a time, compose
    /// the caption, submit the fan-out post, then persist one schedule
    /// entry per resolved platform and advance the content status.
    ///
    /// Failures before the submission leave stored state untouched. A
    /// persistence failure after a successful submission is reported as
    /// [`BrandcastError::SubmittedNotRecorded`] so the provider-side post
    /// can be reconciled manually.
    ///
    /// Re-invoking for the same content item is not idempotent: each call
    /// creates a new provider post and a new set of schedule entries.
    /// Callers guard against duplicate submission.
    pub async fn schedule_post(&self, request: &PublishRequest) -> Result<PublishReceipt> {
        // Step 1: validate before touching anything external.
        if request.platforms.is_empty() {
            return Err(BrandcastError::InvalidInput(
                "At least one target platform is required".to_string(),
            ));
        }
        if request.content_id.trim().is_empty() || request.client_id.trim().is_empty() {
            return Err(BrandcastError::InvalidInput(
                "Content id and client id are required".to_string(),
            ));
        }

        // Step 2: load the content item.
        let content = self
            .db
            .get_content(&request.content_id, &request.client_id)
            .await?
            .ok_or_else(|| {
                BrandcastError::NotFound(format!("content item {}", request.content_id))
            })?;

        // Step 3: resolve connected accounts. Zero destinations must be a
        // complete no-op on persisted state.
        let resolved = self
            .registry
            .resolve_accounts(&request.client_id, &request.platforms)
            .await?;

        if resolved.is_empty() {
            return Err(BrandcastError::NoConnectedAccounts {
                requested: request.platforms.clone(),
            });
        }

        // Step 4: stage media, strictly one URL at a time. A URL that
        // fails to stage is dropped; a caption-only post still proceeds.
        let mut media = Vec::new();
        for url in content.all_media_urls() {
            match self.stager.stage(&url).await {
                Ok(handle) => media.push(handle),
                Err(e) => {
                    warn!(
                        content_id = %content.id,
                        source_url = %url,
                        "media staging failed, continuing without this item: {}",
                        e
                    );
                }
            }
        }

        // Step 5: compose the caption.
        let composed = caption::compose(&content.caption, &content.hashtags, &content.call_to_action);

        // Step 6: submit the fan-out post. Failure here is fatal and
        // nothing has been persisted yet.
        let submission = CreatePostRequest {
            account_ids: resolved.values().cloned().collect(),
            media,
            caption: composed,
            scheduled_at: request.scheduled_at.map(|t| t.timestamp()),
            external_ref: content.id.clone(),
        };
        let provider_post = self.provider.create_post(&submission).await?;

        info!(
            content_id = %content.id,
            provider_post_id = %provider_post.id,
            platforms = resolved.len(),
            "fan-out post accepted by provider"
        );

        // Step 7: persist schedule entries for the resolved platforms and
        // advance the content status.
        let now = Utc::now();
        let in_future = request.scheduled_at.map(|t| t > now).unwrap_or(false);
        let entry_status = if in_future {
            ScheduleStatus::Queued
        } else {
            ScheduleStatus::Posting
        };
        let content_status = if in_future {
            ContentStatus::Scheduled
        } else {
            ContentStatus::Posted
        };

        let entries: Vec<ScheduleEntry> = resolved
            .keys()
            .map(|platform| ScheduleEntry {
                id: None,
                content_id: content.id.clone(),
                client_id: content.client_id.clone(),
                platform: *platform,
                scheduled_at: request.scheduled_at.map(|t| t.timestamp()),
                status: entry_status,
                provider_post_id: provider_post.id.clone(),
                created_at: now.timestamp(),
            })
            .collect();

        let persisted = self
            .persist_outcome(&entries, &content.id, content_status)
            .await;
        if let Err(e) = persisted {
            return Err(BrandcastError::SubmittedNotRecorded {
                provider_post_id: provider_post.id,
                source: Box::new(e),
            });
        }

        // Step 8: report the accepted submission.
        Ok(PublishReceipt {
            provider_post_id: provider_post.id,
            platforms: resolved.keys().copied().collect(),
            content_status,
        })
    }

    async fn persist_outcome(
        &self,
        entries: &[ScheduleEntry],
        content_id: &str,
        content_status: ContentStatus,
    ) -> Result<()> {
        self.db.create_schedule_entries(entries).await?;
        self.db.update_content_status(content_id, content_status).await
    }
}
