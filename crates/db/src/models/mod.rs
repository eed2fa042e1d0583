//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where patching applies

pub mod content_version;
pub mod notification;
pub mod post;
pub mod setting;
pub mod taxonomy;
pub mod user;
pub mod workflow_transition;
