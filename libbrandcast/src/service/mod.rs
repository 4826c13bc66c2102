//! Service layer for Brandcast
//!
//! A clean, testable API for the approval workflow and publishing
//! orchestration, consumable by multiple interfaces (CLI, API handlers)
//! without duplication.
//!
//! # Architecture
//!
//! `BrandcastService` is the facade coordinating specialized
//! sub-services over shared resources:
//!
//! - `ReviewService`: persisted content lifecycle transitions
//! - `PublishingService`: publish orchestration and delivery reconciliation
//! - `EventBus`: progress event distribution
//!
//! # Example
//!
//! ```no_run
//! use libbrandcast::service::BrandcastService;
//! use libbrandcast::{Platform, PublishRequest};
//!
//! # async fn example() -> libbrandcast::Result<()> {
//! let service = BrandcastService::new().await?;
//!
//! let receipt = service
//!     .publishing()
//!     .schedule_post(PublishRequest {
//!         content_id: "6b9e...".to_string(),
//!         client_id: "client-42".to_string(),
//!         platforms: vec![Platform::Instagram, Platform::Facebook],
//!         scheduled_at: None,
//!     })
//!     .await?;
//! println!("Submitted as {}", receipt.provider_post_id);
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod publishing;
pub mod review;

pub use events::{Event, EventBus, EventReceiver};
pub use publishing::PublishingService;
pub use review::{ContentDraft, ReviewService};

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::provider::{HttpProvider, PublishingProvider};

/// Main service facade coordinating all sub-services.
///
/// Sub-services share the same `Arc<Database>`, `Arc<Config>`, and
/// provider client, so concurrent use never duplicates connections.
pub struct BrandcastService {
    db: Arc<Database>,
    config: Arc<Config>,
    review: ReviewService,
    publishing: PublishingService,
    event_bus: EventBus,
}

impl BrandcastService {
    /// Create a service with configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, the database
    /// cannot be initialized, or the provider key file is missing.
    pub async fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config).await
    }

    /// Create a service from a pre-built configuration.
    pub async fn from_config(config: Config) -> Result<Self> {
        let db_path = crate::config::resolve_db_path(Some(&config.database.path))?;
        let db = Database::new(&db_path.to_string_lossy()).await?;
        let provider: Arc<dyn PublishingProvider> = Arc::new(HttpProvider::new(&config.provider)?);
        Ok(Self::from_parts(Arc::new(config), Arc::new(db), provider))
    }

    /// Assemble a service from already-built parts. Used by tests to
    /// inject a mock provider or a scratch database.
    pub fn from_parts(
        config: Arc<Config>,
        db: Arc<Database>,
        provider: Arc<dyn PublishingProvider>,
    ) -> Self {
        let event_bus = EventBus::new(100);
        let review = ReviewService::new(Arc::clone(&db), event_bus.clone());
        let publishing =
            PublishingService::new(Arc::clone(&db), provider, event_bus.clone());

        Self {
            db,
            config,
            review,
            publishing,
            event_bus,
        }
    }

    /// Access the database directly.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Access the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the review service.
    pub fn review(&self) -> &ReviewService {
        &self.review
    }

    /// Access the publishing service.
    pub fn publishing(&self) -> &PublishingService {
        &self.publishing
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }
}
