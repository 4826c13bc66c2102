//! Publishing service
//!
//! Wraps the publish orchestrator with progress events, and offers
//! read-only delivery reconciliation: bounded polling of the provider's
//! per-platform results, kept out of the submission write path.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

use super::events::{Event, EventBus};
use crate::db::Database;
use crate::error::Result;
use crate::orchestrator::{PublishOrchestrator, PublishReceipt, PublishRequest};
use crate::provider::{DeliveryResult, DeliveryStatus, PublishingProvider};
use crate::retry::{PollOutcome, RetryPolicy};
use crate::types::{Platform, ScheduleStatus};

#[derive(Clone)]
pub struct PublishingService {
    orchestrator: Arc<PublishOrchestrator>,
    provider: Arc<dyn PublishingProvider>,
    db: Arc<Database>,
    event_bus: EventBus,
}

impl PublishingService {
    pub fn new(
        db: Arc<Database>,
        provider: Arc<dyn PublishingProvider>,
        event_bus: EventBus,
    ) -> Self {
        let orchestrator = Arc::new(PublishOrchestrator::new(
            Arc::clone(&db),
            Arc::clone(&provider),
        ));
        Self {
            orchestrator,
            provider,
            db,
            event_bus,
        }
    }

    /// Publish or schedule a content item, emitting progress events
    /// around the orchestration.
    pub async fn schedule_post(&self, request: PublishRequest) -> Result<PublishReceipt> {
        self.event_bus.emit(Event::PublishStarted {
            content_id: request.content_id.clone(),
            platforms: request.platforms.clone(),
        });

        match self.orchestrator.schedule_post(&request).await {
            Ok(receipt) => {
                self.event_bus.emit(Event::PublishCompleted {
                    content_id: request.content_id.clone(),
                    provider_post_id: receipt.provider_post_id.clone(),
                    platforms: receipt.platforms.clone(),
                    content_status: receipt.content_status,
                });
                Ok(receipt)
            }
            Err(e) => {
                self.event_bus.emit(Event::PublishFailed {
                    content_id: request.content_id.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Poll the provider's per-platform results for a fan-out post until
    /// every platform reports a terminal outcome, under a fixed attempt
    /// cap and interval.
    ///
    /// Terminal outcomes are mapped onto the matching schedule entries.
    /// Exhausting the cap is `PollOutcome::TimedOut` ("check back
    /// later"), distinct from a provider failure.
    pub async fn await_delivery(
        &self,
        provider_post_id: &str,
        policy: &RetryPolicy,
    ) -> Result<PollOutcome<Vec<DeliveryResult>>> {
        for attempt in 1..=policy.max_attempts {
            let results = self.provider.list_results(provider_post_id).await?;

            let settled =
                !results.is_empty() && results.iter().all(|r| r.status.is_terminal());
            if settled {
                self.record_delivery(provider_post_id, &results).await?;
                info!(provider_post_id, platforms = results.len(), "delivery settled");
                return Ok(PollOutcome::Ready(results));
            }

            if attempt < policy.max_attempts {
                sleep(policy.interval).await;
            }
        }

        info!(provider_post_id, "delivery not settled yet, check back later");
        Ok(PollOutcome::TimedOut)
    }

    async fn record_delivery(
        &self,
        provider_post_id: &str,
        results: &[DeliveryResult],
    ) -> Result<()> {
        for result in results {
            let Some(platform) = Platform::from_provider_name(&result.platform) else {
                warn!(platform = %result.platform, "delivery result for unknown platform");
                continue;
            };
            let status = match result.status {
                DeliveryStatus::Delivered => ScheduleStatus::Posted,
                DeliveryStatus::Failed => ScheduleStatus::Failed,
                _ => continue,
            };
            self.db
                .update_delivery_status(provider_post_id, platform, status)
                .await?;
        }
        Ok(())
    }
}
