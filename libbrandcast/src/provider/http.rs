//! HTTP client for the publishing provider's REST API

use async_trait::async_trait;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{ConfigError, ProviderError, Result};

use super::{
    CreatePostRequest, DeliveryResult, ProviderAccount, ProviderPost, PublishingProvider,
    UploadTarget,
};

/// Reqwest-backed [`PublishingProvider`] implementation.
///
/// The API key is read once from the key file named in configuration and
/// sent as a bearer token on every request.
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpProvider {
    /// Build a provider client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key file is missing or
    /// unreadable.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let key_path = config.expand_api_key_file_path()?;

        if !key_path.exists() {
            return Err(ConfigError::MissingField(format!(
                "Provider API key file not found: {}. Create this file with your publishing provider API key.",
                key_path.display()
            ))
            .into());
        }

        let api_key = std::fs::read_to_string(&key_path)
            .map_err(ConfigError::ReadError)?
            .trim()
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into the given provider error kind,
    /// carrying status and body for diagnosis.
    async fn check(
        response: reqwest::Response,
        kind: fn(String) -> ProviderError,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(kind(format!("provider returned {}: {}", status, body)).into())
    }
}

#[async_trait]
impl PublishingProvider for HttpProvider {
    async fn list_accounts(&self, external_id: &str) -> Result<Vec<ProviderAccount>> {
        let response = self
            .http
            .get(self.url(&format!("/v1/clients/{}/accounts", external_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let response = Self::check(response, ProviderError::Unavailable).await?;
        let accounts: Vec<ProviderAccount> = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("invalid account listing: {}", e)))?;

        debug!(external_id, count = accounts.len(), "listed provider accounts");
        Ok(accounts)
    }

    async fn create_upload_target(&self) -> Result<UploadTarget> {
        let response = self
            .http
            .post(self.url("/v1/media/targets"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::MediaStaging(e.to_string()))?;

        let response = Self::check(response, ProviderError::MediaStaging).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::MediaStaging(format!("invalid upload target: {}", e)).into())
    }

    async fn upload_from_url(&self, target: &UploadTarget, source_url: &str) -> Result<()> {
        // Pull the bytes from durable storage, then push them into the
        // provider's write target.
        let source = self
            .http
            .get(source_url)
            .send()
            .await
            .map_err(|e| ProviderError::MediaStaging(format!("fetching {}: {}", source_url, e)))?;

        let source = Self::check(source, ProviderError::MediaStaging).await?;
        let bytes = source
            .bytes()
            .await
            .map_err(|e| ProviderError::MediaStaging(format!("reading {}: {}", source_url, e)))?;

        let response = self
            .http
            .put(&target.write_url)
            .bearer_auth(&self.api_key)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ProviderError::MediaStaging(format!("writing {}: {}", target.handle, e)))?;

        Self::check(response, ProviderError::MediaStaging).await?;
        Ok(())
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<ProviderPost> {
        let response = self
            .http
            .post(self.url("/v1/posts"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Submission(e.to_string()))?;

        let response = Self::check(response, ProviderError::Submission).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::Submission(format!("invalid post response: {}", e)).into())
    }

    async fn list_results(&self, provider_post_id: &str) -> Result<Vec<DeliveryResult>> {
        let response = self
            .http
            .get(self.url(&format!("/v1/posts/{}/results", provider_post_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let response = Self::check(response, ProviderError::Unavailable).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("invalid results listing: {}", e)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use tempfile::TempDir;

    #[test]
    fn test_new_missing_key_file() {
        let config = ProviderConfig {
            base_url: "https://api.example.com".to_string(),
            api_key_file: "/nonexistent/provider.key".to_string(),
        };

        let result = HttpProvider::new(&config);
        match result {
            Err(crate::error::BrandcastError::Config(ConfigError::MissingField(msg))) => {
                assert!(msg.contains("key file not found"));
            }
            _ => panic!("Expected missing-field config error"),
        }
    }

    #[test]
    fn test_new_reads_and_trims_key() {
        let temp_dir = TempDir::new().unwrap();
        let key_file = temp_dir.path().join("provider.key");
        std::fs::write(&key_file, "secret-key\n").unwrap();

        let config = ProviderConfig {
            base_url: "https://api.example.com/".to_string(),
            api_key_file: key_file.to_str().unwrap().to_string(),
        };

        let provider = HttpProvider::new(&config).unwrap();
        assert_eq!(provider.api_key, "secret-key");
        assert_eq!(provider.base_url, "https://api.example.com");
    }

    #[test]
    fn test_url_joins_path() {
        let temp_dir = TempDir::new().unwrap();
        let key_file = temp_dir.path().join("provider.key");
        std::fs::write(&key_file, "k").unwrap();

        let config = ProviderConfig {
            base_url: "https://api.example.com".to_string(),
            api_key_file: key_file.to_str().unwrap().to_string(),
        };

        let provider = HttpProvider::new(&config).unwrap();
        assert_eq!(
            provider.url("/v1/posts"),
            "https://api.example.com/v1/posts"
        );
    }
}
