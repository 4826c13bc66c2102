//! Bounded retry and polling policy
//!
//! External effects that may not be observable immediately are awaited
//! with a fixed attempt cap and a fixed interval, and a timeout is a
//! distinct outcome from a failure: "timed out, check back later" is
//! reported as [`PollOutcome::TimedOut`], never as an error.

use std::time::Duration;

use crate::error::{BrandcastError, ProviderError};

/// Fixed attempt cap and interval for retrying or polling an external
/// operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_secs(1),
        }
    }
}

/// Outcome of a bounded poll: the awaited state either became observable
/// or the attempt cap was reached without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    TimedOut,
}

impl<T> PollOutcome<T> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Whether an error is transient and worth another attempt.
///
/// Provider unavailability and media-staging failures are transient;
/// everything else (bad input, missing rows, rejected submissions) is
/// permanent.
pub fn is_transient(error: &BrandcastError) -> bool {
    matches!(
        error,
        BrandcastError::Provider(ProviderError::Unavailable(_) | ProviderError::MediaStaging(_))
    )
}
