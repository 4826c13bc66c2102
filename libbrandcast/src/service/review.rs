//! Review service for the content approval workflow
//!
//! Persisted lifecycle transitions: draft creation, submit for review,
//! approve, reject, and revert to draft. Every operation is scoped by an
//! explicit client id; the current status is validated before any write.

use std::sync::Arc;
use tracing::info;

use super::events::{Event, EventBus};
use crate::db::Database;
use crate::error::{BrandcastError, Result};
use crate::types::{ContentItem, ContentType, Platform};

/// Fields for a new draft content item.
#[derive(Debug, Clone, Default)]
pub struct ContentDraft {
    pub caption: String,
    pub caption_short: String,
    pub hashtags: String,
    pub call_to_action: String,
    pub target_platforms: Vec<Platform>,
    pub primary_media_url: Option<String>,
    pub media_urls: Vec<String>,
}

#[derive(Clone)]
pub struct ReviewService {
    db: Arc<Database>,
    event_bus: EventBus,
}

impl ReviewService {
    pub fn new(db: Arc<Database>, event_bus: EventBus) -> Self {
        Self { db, event_bus }
    }

    /// Create a new draft content item for a client.
    pub async fn create_draft(
        &self,
        client_id: &str,
        content_type: ContentType,
        draft: ContentDraft,
    ) -> Result<ContentItem> {
        if client_id.trim().is_empty() {
            return Err(BrandcastError::InvalidInput(
                "Client id cannot be empty".to_string(),
            ));
        }

        let mut item = ContentItem::new(client_id, content_type);
        item.caption = draft.caption;
        item.caption_short = draft.caption_short;
        item.hashtags = draft.hashtags;
        item.call_to_action = draft.call_to_action;
        item.target_platforms = draft.target_platforms;
        item.primary_media_url = draft.primary_media_url;
        item.media_urls = draft.media_urls;

        self.db.create_content(&item).await?;
        info!(content_id = %item.id, client_id, "draft created");
        Ok(item)
    }

    /// Move a draft into review.
    pub async fn submit_for_review(&self, content_id: &str, client_id: &str) -> Result<ContentItem> {
        let mut item = self.load(content_id, client_id).await?;
        item.submit_for_review()?;
        self.db.update_content(&item).await?;

        self.event_bus.emit(Event::ReviewRequested {
            content_id: item.id.clone(),
            client_id: client_id.to_string(),
        });
        Ok(item)
    }

    /// Approve a content item awaiting review.
    pub async fn approve(
        &self,
        content_id: &str,
        client_id: &str,
        approved_by: &str,
    ) -> Result<ContentItem> {
        let mut item = self.load(content_id, client_id).await?;
        item.approve(approved_by)?;
        self.db.update_content(&item).await?;

        info!(content_id = %item.id, approved_by, "content approved");
        self.event_bus.emit(Event::ContentApproved {
            content_id: item.id.clone(),
            approved_by: approved_by.to_string(),
        });
        Ok(item)
    }

    /// Reject a content item awaiting review. The reason is required.
    pub async fn reject(
        &self,
        content_id: &str,
        client_id: &str,
        reason: &str,
    ) -> Result<ContentItem> {
        let mut item = self.load(content_id, client_id).await?;
        item.reject(reason)?;
        self.db.update_content(&item).await?;

        info!(content_id = %item.id, "content rejected");
        self.event_bus.emit(Event::ContentRejected {
            content_id: item.id.clone(),
            reason: reason.trim().to_string(),
        });
        Ok(item)
    }

    /// Send a rejected item back to draft for editing.
    pub async fn revert_to_draft(&self, content_id: &str, client_id: &str) -> Result<ContentItem> {
        let mut item = self.load(content_id, client_id).await?;
        item.revert_to_draft()?;
        self.db.update_content(&item).await?;
        Ok(item)
    }

    /// List a client's items awaiting review, oldest first.
    pub async fn pending(&self, client_id: &str) -> Result<Vec<ContentItem>> {
        self.db.list_pending_review(client_id).await
    }

    async fn load(&self, content_id: &str, client_id: &str) -> Result<ContentItem> {
        self.db
            .get_content(content_id, client_id)
            .await?
            .ok_or_else(|| BrandcastError::NotFound(format!("content item {}", content_id)))
    }
}
