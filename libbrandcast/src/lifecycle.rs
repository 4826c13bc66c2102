//! Content lifecycle state machine
//!
//! The authoritative status transitions for a content item:
//! `draft -> pending_approval -> {approved | rejected}`,
//! `rejected -> draft` (edit and resubmit), and
//! `approved -> {scheduled | posted}` via the publish orchestrator.
//! Transitions are validated against the item's current status and
//! rejected with [`BrandcastError::InvalidTransition`], never coerced.

use crate::error::{BrandcastError, Result};
use crate::types::{ContentItem, ContentStatus};

/// Whether the state machine permits a transition.
///
/// `Failed` is reachable from any non-terminal state: it records a
/// publication attempt that wholly failed. `Scheduled -> Posted` is the
/// provider's own delivery and is listed here so callers reflecting
/// provider results stay within the machine.
pub fn allows(from: ContentStatus, to: ContentStatus) -> bool {
    use ContentStatus::*;
    matches!(
        (from, to),
        (Draft, PendingApproval)
            | (PendingApproval, Approved)
            | (PendingApproval, Rejected)
            | (Rejected, Draft)
            | (Approved, Scheduled)
            | (Approved, Posted)
            | (Scheduled, Posted)
    ) || (to == Failed && !matches!(from, Posted | Failed))
}

impl ContentItem {
    /// `draft -> pending_approval`. Requires a non-empty caption or at
    /// least one media URL.
    pub fn submit_for_review(&mut self) -> Result<()> {
        self.ensure_transition(ContentStatus::PendingApproval)?;
        if !self.has_publishable_body() {
            return Err(BrandcastError::InvalidInput(
                "Content needs a caption or media before it can be reviewed".to_string(),
            ));
        }
        self.status = ContentStatus::PendingApproval;
        self.touch();
        Ok(())
    }

    /// `pending_approval -> approved`. Records the approval timestamp and
    /// approver, and clears any previous rejection reason.
    pub fn approve(&mut self, approved_by: &str) -> Result<()> {
        self.ensure_transition(ContentStatus::Approved)?;
        self.status = ContentStatus::Approved;
        if self.approved_at.is_none() {
            self.approved_at = Some(chrono::Utc::now().timestamp());
        }
        self.approved_by = Some(approved_by.to_string());
        self.rejection_reason = None;
        self.touch();
        Ok(())
    }

    /// `pending_approval -> rejected`. Requires a non-empty reason and
    /// clears any previous approval.
    pub fn reject(&mut self, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(BrandcastError::InvalidInput(
                "A rejection reason is required".to_string(),
            ));
        }
        self.ensure_transition(ContentStatus::Rejected)?;
        self.status = ContentStatus::Rejected;
        self.rejection_reason = Some(reason.trim().to_string());
        self.approved_at = None;
        self.approved_by = None;
        self.touch();
        Ok(())
    }

    /// `rejected -> draft`, for edit and resubmit. Clears the rejection
    /// reason and any stale approval.
    pub fn revert_to_draft(&mut self) -> Result<()> {
        self.ensure_transition(ContentStatus::Draft)?;
        self.status = ContentStatus::Draft;
        self.rejection_reason = None;
        self.approved_at = None;
        self.approved_by = None;
        self.touch();
        Ok(())
    }

    fn ensure_transition(&self, to: ContentStatus) -> Result<()> {
        if allows(self.status, to) {
            Ok(())
        } else {
            Err(BrandcastError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}
