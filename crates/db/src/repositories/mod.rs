//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! take `&PgPool`; write primitives that must compose into a caller-owned
//! transaction take `&mut PgConnection` (pass `&mut *tx`). Multi-statement
//! operations that preserve invariants on their own open an explicit
//! transaction internally.

pub mod content_version_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod setting_repo;
pub mod taxonomy_repo;
pub mod user_repo;
pub mod workflow_transition_repo;

pub use content_version_repo::ContentVersionRepo;
pub use notification_repo::NotificationRepo;
pub use post_repo::PostRepo;
pub use setting_repo::SettingRepo;
pub use taxonomy_repo::TaxonomyRepo;
pub use user_repo::UserRepo;
pub use workflow_transition_repo::WorkflowTransitionRepo;
