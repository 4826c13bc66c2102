//! Event system for progress tracking
//!
//! In-process event bus distributing review and publishing progress to
//! subscribers without blocking operations. Built on
//! `tokio::sync::broadcast`: events are dropped when nobody listens, and
//! lagging subscribers never block emitters.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ContentStatus, Platform};

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Progress events emitted by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ReviewRequested {
        content_id: String,
        client_id: String,
    },
    ContentApproved {
        content_id: String,
        approved_by: String,
    },
    ContentRejected {
        content_id: String,
        reason: String,
    },
    PublishStarted {
        content_id: String,
        platforms: Vec<Platform>,
    },
    PublishCompleted {
        content_id: String,
        provider_post_id: String,
        platforms: Vec<Platform>,
        content_status: ContentStatus,
    },
    PublishFailed {
        content_id: String,
        error: String,
    },
}

/// Event bus for distributing progress events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given per-subscriber buffer
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this point.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers. Non-blocking; events with no
    /// subscribers are dropped.
    pub fn emit(&self, event: Event) {
        // send() errs when no receivers exist, which is fine
        let _ = self.sender.send(event);
    }
}
