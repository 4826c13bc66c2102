//! Error types for Brandcast

use thiserror::Error;

use crate::types::{ContentStatus, Platform};

pub type Result<T> = std::result::Result<T, BrandcastError>;

#[derive(Error, Debug)]
pub enum BrandcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ContentStatus,
        to: ContentStatus,
    },

    #[error(
        "No connected accounts for requested platforms: {}",
        .requested.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    )]
    NoConnectedAccounts { requested: Vec<Platform> },

    /// The provider accepted the fan-out post but the local schedule
    /// records could not be written. The provider-side post exists and
    /// must be reconciled manually using the returned post id.
    #[error("Post {provider_post_id} was submitted but not recorded: {source}")]
    SubmittedNotRecorded {
        provider_post_id: String,
        #[source]
        source: Box<BrandcastError>,
    },
}

impl BrandcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BrandcastError::InvalidInput(_) | BrandcastError::InvalidTransition { .. } => 3,
            BrandcastError::NotFound(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The provider could not be reached or answered with a transport-level
    /// failure while resolving accounts. Retryable; fatal for the current
    /// publish call because no destinations could be verified.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// A single media URL could not be staged. Retryable and non-fatal for
    /// the overall publish.
    #[error("Media staging failed: {0}")]
    MediaStaging(String),

    /// The fan-out post submission itself failed. Nothing is persisted.
    #[error("Publish submission failed: {0}")]
    Submission(String),
}
