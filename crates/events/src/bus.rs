//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`EditorialEvent`]s. It is
//! shared via `Arc<EventBus>` between the workflow service (publisher) and
//! the notification router (subscriber).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use pressroom_core::types::DbId;

// ---------------------------------------------------------------------------
// EditorialEvent
// ---------------------------------------------------------------------------

/// An event describing something that happened to a content item.
///
/// Constructed via [`EditorialEvent::new`] or the
/// [`workflow_transition`](EditorialEvent::workflow_transition) convenience
/// constructor, and enriched with the builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorialEvent {
    /// Dot-separated event name, e.g. `"workflow.published"`.
    pub event_type: String,

    /// The content item the event concerns.
    pub post_id: Option<DbId>,

    /// The content version the event concerns.
    pub version_id: Option<DbId>,

    /// The user that triggered the event.
    pub actor_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl EditorialEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            post_id: None,
            version_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Build the event for a workflow status change.
    ///
    /// The payload carries the before/after statuses and the transition
    /// comment so consumers never need to re-query the transition table.
    pub fn workflow_transition(
        event_type: impl Into<String>,
        post_id: DbId,
        version_id: DbId,
        actor_id: Option<DbId>,
        from_status: Option<&str>,
        to_status: &str,
        comment: Option<&str>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            post_id: Some(post_id),
            version_id: Some(version_id),
            actor_id,
            payload: serde_json::json!({
                "from_status": from_status,
                "to_status": to_status,
                "comment": comment,
            }),
            timestamp: Utc::now(),
        }
    }

    /// Attach the content item to the event.
    pub fn with_post(mut self, post_id: DbId) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Attach the content version to the event.
    pub fn with_version(mut self, version_id: DbId) -> Self {
        self.version_id = Some(version_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`EditorialEvent`].
pub struct EventBus {
    sender: broadcast::Sender<EditorialEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the workflow transition that produced it has already committed.
    pub fn publish(&self, event: EditorialEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorialEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
