//! Well-known role name constants.
//!
//! These must match the seed data in the `roles` table migration and the
//! role names used in workflow configuration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_WRITER: &str = "writer";
