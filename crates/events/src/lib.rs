//! Pressroom event bus and notification infrastructure.
//!
//! Building blocks for workflow notifications:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. The workflow service publishes one
//!   [`EditorialEvent`] per successful transition, after its transaction
//!   commits; publishing never blocks and never fails the transition.
//! - [`NotificationRouter`] — background consumer that resolves recipients
//!   per event type (submit goes to editors/admins, outcomes go to the
//!   author) and persists per-user notifications.
//! - [`delivery`] — best-effort external channels (email, webhook ping).

pub mod bus;
pub mod delivery;
pub mod router;

pub use bus::{EditorialEvent, EventBus};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::webhook::WebhookDelivery;
pub use router::NotificationRouter;
