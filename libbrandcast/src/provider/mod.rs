//! Publishing provider abstraction
//!
//! The provider is the external service that holds a client's connected
//! social accounts, stores staged media, and delivers fan-out posts.
//! This module defines the narrow contract the orchestrator consumes;
//! [`http`] talks to the real service and [`mock`] is a configurable
//! stand-in for tests.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

pub mod http;
pub mod mock;

pub use http::HttpProvider;

/// Connection state of a provider-side account.
///
/// Statuses this system does not know about deserialize to `Unknown`
/// rather than failing the whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Connected,
    Disconnected,
    Unknown,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for AccountStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.to_lowercase().as_str() {
            "connected" => Self::Connected,
            "disconnected" => Self::Disconnected,
            _ => Self::Unknown,
        })
    }
}

/// One provider-known destination account, in the provider's vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAccount {
    pub platform: String,
    pub id: String,
    pub status: AccountStatus,
}

/// Write target handed out by the provider for a single media upload.
///
/// `handle` becomes the permanent media reference once bytes have been
/// transferred to `write_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub handle: String,
    pub write_url: String,
}

/// One logical fan-out post submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub account_ids: Vec<String>,
    pub media: Vec<String>,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<i64>,
    /// Correlation key: the content item id.
    pub external_ref: String,
}

/// Provider acknowledgement of an accepted fan-out post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPost {
    pub id: String,
}

/// Per-platform delivery state reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
    Unknown,
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for DeliveryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        })
    }
}

/// One per-platform outcome of a fan-out post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryResult {
    pub platform: String,
    pub status: DeliveryStatus,
    pub permalink: Option<String>,
    pub error: Option<String>,
}

/// Contract with the external publishing provider.
///
/// Error mapping is part of the contract: account listing failures are
/// [`crate::error::ProviderError::Unavailable`], upload-phase failures
/// are `MediaStaging`, and post submission failures are `Submission`.
#[async_trait]
pub trait PublishingProvider: Send + Sync {
    /// List all accounts the provider knows for a client's external id,
    /// connected or not.
    async fn list_accounts(&self, external_id: &str) -> Result<Vec<ProviderAccount>>;

    /// Obtain a write target for a single media upload.
    async fn create_upload_target(&self) -> Result<UploadTarget>;

    /// Transfer bytes from a durably-stored source URL into a write
    /// target, after which the target's handle is permanent.
    async fn upload_from_url(&self, target: &UploadTarget, source_url: &str) -> Result<()>;

    /// Submit one fan-out post to the resolved destination accounts.
    async fn create_post(&self, request: &CreatePostRequest) -> Result<ProviderPost>;

    /// Read per-platform delivery results for an accepted post.
    async fn list_results(&self, provider_post_id: &str) -> Result<Vec<DeliveryResult>>;
}
