//! Core types for Brandcast

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Destination social network, in this system's vocabulary.
///
/// The Publishing Provider uses its own spelling for one of these
/// ([`Platform::X`] is `"twitter"` on the wire); see [`Platform::provider_name`]
/// and [`Platform::from_provider_name`] for the fixed mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    X,
    Linkedin,
    Tiktok,
    Youtube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::X => "x",
            Self::Linkedin => "linkedin",
            Self::Tiktok => "tiktok",
            Self::Youtube => "youtube",
        }
    }

    /// The provider's spelling for this platform.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::X => "twitter",
            other => other.as_str(),
        }
    }

    /// Map a provider-side platform name back into our vocabulary.
    ///
    /// Names the provider spells differently are translated through the
    /// fixed table; everything else falls back to parsing as-is. Unknown
    /// names yield `None` and are dropped by callers.
    pub fn from_provider_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "twitter" => Some(Self::X),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            "x" => Ok(Self::X),
            "linkedin" => Ok(Self::Linkedin),
            "tiktok" => Ok(Self::Tiktok),
            "youtube" => Ok(Self::Youtube),
            _ => Err(format!("Unknown platform: '{}'", s)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a content item.
///
/// Legal transitions are enforced in [`crate::lifecycle`]; the publish
/// orchestrator writes the terminal `Scheduled`/`Posted` states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Scheduled,
    Posted,
    Failed,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Scheduled => "scheduled",
            Self::Posted => "posted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    ImagePost,
    Video,
    Carousel,
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImagePost => "image-post",
            Self::Video => "video",
            Self::Carousel => "carousel",
            Self::Text => "text",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image-post" => Ok(Self::ImagePost),
            "video" => Ok(Self::Video),
            "carousel" => Ok(Self::Carousel),
            "text" => Ok(Self::Text),
            _ => Err(format!("Unknown content type: '{}'", s)),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A piece of brand content moving through the approval and publishing
/// lifecycle.
///
/// Invariants:
/// - `rejection_reason` is set iff `status == Rejected`.
/// - `approved_at` is set when the item first reaches `Approved` and is
///   cleared only by rejection or an explicit revert to draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub client_id: String,
    pub status: ContentStatus,
    pub caption: String,
    pub caption_short: String,
    pub hashtags: String,
    pub call_to_action: String,
    pub content_type: ContentType,
    pub target_platforms: Vec<Platform>,
    pub primary_media_url: Option<String>,
    pub media_urls: Vec<String>,
    pub rejection_reason: Option<String>,
    pub approved_at: Option<i64>,
    pub approved_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ContentItem {
    /// Create a new draft content item for a client.
    pub fn new(client_id: impl Into<String>, content_type: ContentType) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            status: ContentStatus::Draft,
            caption: String::new(),
            caption_short: String::new(),
            hashtags: String::new(),
            call_to_action: String::new(),
            content_type,
            target_platforms: Vec::new(),
            primary_media_url: None,
            media_urls: Vec::new(),
            rejection_reason: None,
            approved_at: None,
            approved_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the item has enough substance to be sent for review.
    pub fn has_publishable_body(&self) -> bool {
        !self.caption.trim().is_empty()
            || self.primary_media_url.is_some()
            || !self.media_urls.is_empty()
    }

    /// Primary media URL followed by the additional URLs, deduplicated,
    /// in staging order.
    pub fn all_media_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        if let Some(primary) = &self.primary_media_url {
            urls.push(primary.clone());
        }
        for url in &self.media_urls {
            if !urls.contains(url) {
                urls.push(url.clone());
            }
        }
        urls
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp();
    }
}

/// One connected destination account for one platform for one client.
///
/// At most one active row exists per (client, platform); reconnecting
/// supersedes the previous active row instead of duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAccount {
    pub id: Option<i64>,
    pub client_id: String,
    pub platform: Platform,
    pub provider_account_id: String,
    pub is_active: bool,
    pub connected_at: i64,
}

/// Submission state of one per-platform schedule record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Queued,
    Posting,
    Posted,
    Failed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Posting => "posting",
            Self::Posted => "posted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable record of one (content, platform) publication attempt.
///
/// All entries produced by a single orchestration call share the same
/// `provider_post_id` (one logical fan-out post); their statuses evolve
/// independently as the provider reports per-platform results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Option<i64>,
    pub content_id: String,
    pub client_id: String,
    pub platform: Platform,
    pub scheduled_at: Option<i64>,
    pub status: ScheduleStatus,
    pub provider_post_id: String,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_item_new_defaults() {
        let item = ContentItem::new("client-1", ContentType::ImagePost);

        assert!(Uuid::parse_str(&item.id).is_ok(), "id should be a UUID");
        assert_eq!(item.client_id, "client-1");
        assert_eq!(item.status, ContentStatus::Draft);
        assert!(item.caption.is_empty());
        assert_eq!(item.rejection_reason, None);
        assert_eq!(item.approved_at, None);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_content_item_unique_ids() {
        let a = ContentItem::new("client-1", ContentType::Text);
        let b = ContentItem::new("client-1", ContentType::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_has_publishable_body() {
        let mut item = ContentItem::new("client-1", ContentType::Text);
        assert!(!item.has_publishable_body());

        item.caption = "   ".to_string();
        assert!(!item.has_publishable_body(), "whitespace caption is empty");

        item.caption = "Hello".to_string();
        assert!(item.has_publishable_body());

        item.caption.clear();
        item.primary_media_url = Some("https://cdn.example.com/a.jpg".to_string());
        assert!(item.has_publishable_body());
    }

    #[test]
    fn test_all_media_urls_order_and_dedup() {
        let mut item = ContentItem::new("client-1", ContentType::Carousel);
        item.primary_media_url = Some("https://cdn.example.com/a.jpg".to_string());
        item.media_urls = vec![
            "https://cdn.example.com/b.jpg".to_string(),
            "https://cdn.example.com/a.jpg".to_string(),
            "https://cdn.example.com/c.jpg".to_string(),
        ];

        assert_eq!(
            item.all_media_urls(),
            vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "https://cdn.example.com/b.jpg".to_string(),
                "https://cdn.example.com/c.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_platform_parse_and_display() {
        assert_eq!("instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::X);
        assert!("myspace".parse::<Platform>().is_err());
        assert_eq!(Platform::Linkedin.to_string(), "linkedin");
    }

    #[test]
    fn test_platform_provider_name_mapping() {
        assert_eq!(Platform::X.provider_name(), "twitter");
        assert_eq!(Platform::Instagram.provider_name(), "instagram");

        assert_eq!(Platform::from_provider_name("twitter"), Some(Platform::X));
        assert_eq!(
            Platform::from_provider_name("facebook"),
            Some(Platform::Facebook)
        );
        assert_eq!(Platform::from_provider_name("friendster"), None);
    }

    #[test]
    fn test_platform_serde_spelling() {
        let json = serde_json::to_string(&Platform::X).unwrap();
        assert_eq!(json, r#""x""#);
        let parsed: Platform = serde_json::from_str(r#""tiktok""#).unwrap();
        assert_eq!(parsed, Platform::Tiktok);
    }

    #[test]
    fn test_content_status_serde_spelling() {
        let json = serde_json::to_string(&ContentStatus::PendingApproval).unwrap();
        assert_eq!(json, r#""pending_approval""#);
        assert_eq!(ContentStatus::PendingApproval.as_str(), "pending_approval");
    }

    #[test]
    fn test_content_type_spelling() {
        assert_eq!(ContentType::ImagePost.as_str(), "image-post");
        assert_eq!("image-post".parse::<ContentType>().unwrap(), ContentType::ImagePost);
        assert_eq!(
            serde_json::to_string(&ContentType::ImagePost).unwrap(),
            r#""image-post""#
        );
    }

    #[test]
    fn test_content_item_serialization_round_trip() {
        let mut item = ContentItem::new("client-9", ContentType::Video);
        item.caption = "Launch day".to_string();
        item.hashtags = "#launch".to_string();
        item.target_platforms = vec![Platform::Instagram, Platform::X];

        let json = serde_json::to_string(&item).unwrap();
        let parsed: ContentItem = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, item.id);
        assert_eq!(parsed.caption, item.caption);
        assert_eq!(parsed.target_platforms, item.target_platforms);
        assert_eq!(parsed.status, ContentStatus::Draft);
    }

    #[test]
    fn test_schedule_entry_serialization() {
        let entry = ScheduleEntry {
            id: Some(7),
            content_id: "content-1".to_string(),
            client_id: "client-1".to_string(),
            platform: Platform::Facebook,
            scheduled_at: Some(1234567890),
            status: ScheduleStatus::Queued,
            provider_post_id: "prov-42".to_string(),
            created_at: 1234567800,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ScheduleEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.platform, Platform::Facebook);
        assert_eq!(parsed.status, ScheduleStatus::Queued);
        assert_eq!(parsed.provider_post_id, "prov-42");
    }
}
