//! Event-to-notification routing engine.
//!
//! [`NotificationRouter`] subscribes to the event bus and, for each
//! workflow event, resolves the affected users and persists per-user
//! notifications. External delivery (email, webhook ping) is best-effort:
//! failures are logged and never propagate back to the workflow.

use std::sync::Arc;

use tokio::sync::broadcast;

use pressroom_core::channels::{CHANNEL_EMAIL, CHANNEL_IN_APP};
use pressroom_core::events::{
    EVENT_WORKFLOW_APPROVED, EVENT_WORKFLOW_PUBLISHED, EVENT_WORKFLOW_REJECTED,
    EVENT_WORKFLOW_RETURNED, EVENT_WORKFLOW_SUBMITTED, EVENT_WORKFLOW_UNPUBLISHED,
};
use pressroom_core::roles::{ROLE_ADMIN, ROLE_EDITOR};
use pressroom_core::types::DbId;
use pressroom_db::repositories::{NotificationRepo, PostRepo, SettingRepo, UserRepo};
use pressroom_db::DbPool;

use crate::bus::EditorialEvent;
use crate::delivery::email::EmailDelivery;
use crate::delivery::webhook::WebhookDelivery;

/// Settings key holding the site-wide publish ping URL.
pub const SETTING_PUBLISH_WEBHOOK_URL: &str = "site.publish_webhook_url";

// ---------------------------------------------------------------------------
// Recipient rules
// ---------------------------------------------------------------------------

/// Who should be notified for a given event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientRule {
    /// All active editors and admins, excluding the actor.
    EditorsAndAdmins,
    /// The post's author, unless the author is the actor.
    Author,
    /// Nobody.
    Nobody,
}

/// Resolve the recipient rule for an event type.
///
/// Submissions fan out to the review desk; outcome events (approve,
/// return/reject, publish, unpublish) go back to the author. Everything
/// else (creation, scheduling, reverts) stays quiet.
pub fn recipient_rule(event_type: &str) -> RecipientRule {
    match event_type {
        EVENT_WORKFLOW_SUBMITTED => RecipientRule::EditorsAndAdmins,
        EVENT_WORKFLOW_APPROVED
        | EVENT_WORKFLOW_RETURNED
        | EVENT_WORKFLOW_REJECTED
        | EVENT_WORKFLOW_PUBLISHED
        | EVENT_WORKFLOW_UNPUBLISHED => RecipientRule::Author,
        _ => RecipientRule::Nobody,
    }
}

// ---------------------------------------------------------------------------
// NotificationRouter
// ---------------------------------------------------------------------------

/// Routes editorial events to user notifications.
pub struct NotificationRouter {
    pool: DbPool,
    email: Option<Arc<EmailDelivery>>,
    webhook: WebhookDelivery,
}

impl NotificationRouter {
    /// Create a new router. `email` is `None` when SMTP is not configured;
    /// the email channel is then skipped entirely.
    pub fn new(pool: DbPool, email: Option<Arc<EmailDelivery>>) -> Self {
        Self {
            pool,
            email,
            webhook: WebhookDelivery::new(),
        }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<EditorialEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event: resolve recipients, persist notifications,
    /// fire external channels.
    async fn route_event(&self, event: &EditorialEvent) -> Result<(), sqlx::Error> {
        let recipients = self.resolve_recipients(event).await?;

        for user_id in recipients {
            self.notify_user(user_id, event).await;
        }

        if event.event_type == EVENT_WORKFLOW_PUBLISHED {
            self.ping_publish_webhook(event).await;
        }

        Ok(())
    }

    /// Resolve the user ids to notify for this event.
    async fn resolve_recipients(&self, event: &EditorialEvent) -> Result<Vec<DbId>, sqlx::Error> {
        match recipient_rule(&event.event_type) {
            RecipientRule::Nobody => Ok(vec![]),

            RecipientRule::EditorsAndAdmins => {
                let desk = [ROLE_EDITOR.to_string(), ROLE_ADMIN.to_string()];
                let users = UserRepo::list_active_by_role_names(&self.pool, &desk).await?;
                Ok(users
                    .into_iter()
                    .map(|u| u.id)
                    .filter(|id| Some(*id) != event.actor_id)
                    .collect())
            }

            RecipientRule::Author => {
                let Some(post_id) = event.post_id else {
                    return Ok(vec![]);
                };
                let Some(post) = PostRepo::find_by_id(&self.pool, post_id).await? else {
                    tracing::warn!(post_id, "Event references unknown post, skipping");
                    return Ok(vec![]);
                };
                // A self-transition (author acting on their own post) stays
                // silent: withdrawing your own piece is not a rejection.
                if Some(post.author_id) == event.actor_id {
                    return Ok(vec![]);
                }
                Ok(vec![post.author_id])
            }
        }
    }

    /// Persist an in-app notification and fire the email channel.
    async fn notify_user(&self, user_id: DbId, event: &EditorialEvent) {
        if let Err(e) = NotificationRepo::create(
            &self.pool,
            user_id,
            &event.event_type,
            event.post_id,
            event.version_id,
            &event.payload,
            CHANNEL_IN_APP,
        )
        .await
        {
            tracing::error!(user_id, error = %e, "Failed to persist notification");
        }

        let Some(email) = &self.email else { return };

        let address = match UserRepo::find_by_id(&self.pool, user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load email recipient");
                return;
            }
        };

        match email.deliver(&address, event).await {
            Ok(()) => {
                let _ = NotificationRepo::create(
                    &self.pool,
                    user_id,
                    &event.event_type,
                    event.post_id,
                    event.version_id,
                    &event.payload,
                    CHANNEL_EMAIL,
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Email delivery failed");
            }
        }
    }

    /// POST the published event to the site webhook, if one is configured.
    async fn ping_publish_webhook(&self, event: &EditorialEvent) {
        let url = match SettingRepo::get_value(&self.pool, SETTING_PUBLISH_WEBHOOK_URL).await {
            Ok(Some(value)) => match value.as_str() {
                Some(url) => url.to_string(),
                None => return,
            },
            Ok(None) => return,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read publish webhook setting");
                return;
            }
        };

        if let Err(e) = self.webhook.deliver(&url, event).await {
            tracing::warn!(url, error = %e, "Publish webhook ping failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::events::{
        EVENT_WORKFLOW_CREATED, EVENT_WORKFLOW_REVERTED, EVENT_WORKFLOW_SCHEDULED,
    };

    #[test]
    fn submit_goes_to_the_desk() {
        assert_eq!(
            recipient_rule(EVENT_WORKFLOW_SUBMITTED),
            RecipientRule::EditorsAndAdmins
        );
    }

    #[test]
    fn outcomes_go_to_the_author() {
        for et in [
            EVENT_WORKFLOW_APPROVED,
            EVENT_WORKFLOW_RETURNED,
            EVENT_WORKFLOW_REJECTED,
            EVENT_WORKFLOW_PUBLISHED,
            EVENT_WORKFLOW_UNPUBLISHED,
        ] {
            assert_eq!(recipient_rule(et), RecipientRule::Author, "{et}");
        }
    }

    #[test]
    fn quiet_events_notify_nobody() {
        for et in [
            EVENT_WORKFLOW_CREATED,
            EVENT_WORKFLOW_SCHEDULED,
            EVENT_WORKFLOW_REVERTED,
            "something.else",
        ] {
            assert_eq!(recipient_rule(et), RecipientRule::Nobody, "{et}");
        }
    }
}
