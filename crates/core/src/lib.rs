//! Pressroom domain core.
//!
//! Pure domain logic with zero I/O so it can be used by the repository
//! layer, the workflow service, and any future CLI or worker tooling:
//!
//! - [`status`] — workflow status constants and the [`status::WorkflowStatus`]
//!   enum, including the legacy `review` alias handling.
//! - [`workflow_config`] — the declarative state machine: states, role-gated
//!   transition rules, and eligibility checks.
//! - [`versionable`] — post type registry, versionable-field lists, and
//!   content snapshot helpers.
//! - [`roles`] / [`channels`] / [`events`] — well-known name constants.
//! - [`error`] — the [`error::CoreError`] domain error type.

pub mod channels;
pub mod error;
pub mod events;
pub mod roles;
pub mod status;
pub mod types;
pub mod versionable;
pub mod workflow_config;
