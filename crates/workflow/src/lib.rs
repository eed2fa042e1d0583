//! Pressroom editorial workflow engine.
//!
//! The orchestration layer over the domain core and the persistence layer:
//!
//! - [`WorkflowService`] — transition legality checks, approval/publish
//!   gating, transactional version activation, publish/unpublish/revert/
//!   make-live, and post-commit event dispatch.
//! - [`SettingsConfigSource`] — per-post-type workflow configuration
//!   resolved from the settings store with a built-in fallback.
//! - [`PublishScheduler`] — background loop publishing scheduled versions
//!   when their time arrives.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;

pub use config::{SettingsConfigSource, StaticConfigSource, WorkflowConfigSource};
pub use error::{WorkflowError, WorkflowResult};
pub use scheduler::PublishScheduler;
pub use service::{Actor, WorkflowService};
