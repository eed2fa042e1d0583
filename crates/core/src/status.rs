//! Well-known workflow status constants and parsing.
//!
//! These must match the values stored in the `content_versions.workflow_status`
//! and `posts.workflow_status` columns and the status keys used in workflow
//! configuration.

use crate::error::CoreError;

/// Version is being written or edited.
pub const STATUS_DRAFT: &str = "draft";

/// Version is awaiting copy-desk review.
pub const STATUS_COPYDESK: &str = "copydesk";

/// Version has been approved and is parked awaiting publication.
pub const STATUS_PARKED: &str = "parked";

/// Version was rejected by a reviewer.
pub const STATUS_REJECTED: &str = "rejected";

/// Version is queued for timed publication.
pub const STATUS_SCHEDULED: &str = "scheduled";

/// Version is live.
pub const STATUS_PUBLISHED: &str = "published";

/// Deprecated alias for [`STATUS_COPYDESK`]. Old rows may still carry it;
/// it is accepted on input and canonicalized, but is never a valid
/// transition target.
pub const STATUS_REVIEW_LEGACY: &str = "review";

/// All canonical status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_COPYDESK,
    STATUS_PARKED,
    STATUS_REJECTED,
    STATUS_SCHEDULED,
    STATUS_PUBLISHED,
];

/// Map a stored status string to its canonical form.
///
/// The only non-identity mapping is the legacy `review` alias, which
/// canonicalizes to `copydesk`. Unknown strings pass through unchanged so
/// callers can surface them in error messages.
pub fn canonical_status(status: &str) -> &str {
    if status == STATUS_REVIEW_LEGACY {
        STATUS_COPYDESK
    } else {
        status
    }
}

/// A parsed workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStatus {
    Draft,
    Copydesk,
    Parked,
    Rejected,
    Scheduled,
    Published,
}

impl WorkflowStatus {
    /// Parse a status string, accepting the legacy `review` alias.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match canonical_status(s) {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_COPYDESK => Ok(Self::Copydesk),
            STATUS_PARKED => Ok(Self::Parked),
            STATUS_REJECTED => Ok(Self::Rejected),
            STATUS_SCHEDULED => Ok(Self::Scheduled),
            STATUS_PUBLISHED => Ok(Self::Published),
            other => Err(CoreError::Validation(format!(
                "Invalid workflow status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// The canonical string form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Copydesk => STATUS_COPYDESK,
            Self::Parked => STATUS_PARKED,
            Self::Rejected => STATUS_REJECTED,
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Published => STATUS_PUBLISHED,
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
