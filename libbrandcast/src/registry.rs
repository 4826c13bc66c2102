//! Platform account registry
//!
//! Resolves which of a client's requested platforms have an active
//! connected account at the publishing provider. Missing connections are
//! dropped silently so one absent platform never blocks the others; a
//! provider failure is fatal because no destinations could be verified
//! at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BrandcastError, Result};
use crate::provider::{AccountStatus, PublishingProvider};
use crate::types::Platform;

pub struct AccountRegistry {
    provider: Arc<dyn PublishingProvider>,
}

impl AccountRegistry {
    pub fn new(provider: Arc<dyn PublishingProvider>) -> Self {
        Self { provider }
    }

    /// Map requested platforms to the client's connected provider account
    /// ids.
    ///
    /// Provider platform names are normalized into our vocabulary before
    /// intersecting; names we do not know are skipped. The result may
    /// hold fewer entries than requested.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty request and propagates
    /// `ProviderError::Unavailable` when the listing itself fails.
    pub async fn resolve_accounts(
        &self,
        client_id: &str,
        requested: &[Platform],
    ) -> Result<BTreeMap<Platform, String>> {
        if requested.is_empty() {
            return Err(BrandcastError::InvalidInput(
                "At least one platform must be requested".to_string(),
            ));
        }
        if client_id.trim().is_empty() {
            return Err(BrandcastError::InvalidInput(
                "Client id cannot be empty".to_string(),
            ));
        }

        let accounts = self.provider.list_accounts(client_id).await?;

        let mut resolved = BTreeMap::new();
        for account in accounts {
            if account.status != AccountStatus::Connected {
                continue;
            }
            let Some(platform) = Platform::from_provider_name(&account.platform) else {
                debug!(
                    platform = %account.platform,
                    "skipping provider account with unknown platform name"
                );
                continue;
            };
            if requested.contains(&platform) {
                resolved.entry(platform).or_insert(account.id);
            }
        }

        for platform in requested {
            if !resolved.contains_key(platform) {
                debug!(client_id, platform = %platform, "no connected account, platform dropped");
            }
        }

        Ok(resolved)
    }
}
