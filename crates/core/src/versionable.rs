//! Post type registry, versionable-field lists, and snapshot helpers.
//!
//! A content snapshot is an opaque JSON object captured when a version is
//! created and applied back onto the post when the version goes live. Which
//! keys are applied is decided by the per-post-type field registry here;
//! unknown snapshot keys are ignored on apply.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Post types
// ---------------------------------------------------------------------------

pub const POST_TYPE_ARTICLE: &str = "article";
pub const POST_TYPE_RECIPE: &str = "recipe";
pub const POST_TYPE_PRODUCT: &str = "product";

/// All valid post type slugs.
pub const VALID_POST_TYPES: &[&str] = &[POST_TYPE_ARTICLE, POST_TYPE_RECIPE, POST_TYPE_PRODUCT];

/// Validate a post type slug against the known set.
pub fn validate_post_type(post_type: &str) -> Result<(), CoreError> {
    if VALID_POST_TYPES.contains(&post_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid post type '{post_type}'. Must be one of: {}",
            VALID_POST_TYPES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Versionable fields
// ---------------------------------------------------------------------------

/// Fields every post type versions, mapped to dedicated `posts` columns.
pub const COMMON_FIELDS: &[&str] = &["title", "slug", "excerpt", "body", "hero_image_path"];

const RECIPE_EXTRA_FIELDS: &[&str] = &[
    "ingredients",
    "instructions",
    "prep_time_mins",
    "cook_time_mins",
    "servings",
];

const PRODUCT_EXTRA_FIELDS: &[&str] = &["price_cents", "sku", "vendor"];

/// Type-specific versioned fields, stored in the `posts.fields` JSONB column.
///
/// Unknown post types version only the common fields, so a stale snapshot
/// never fails to apply.
pub fn extra_fields(post_type: &str) -> &'static [&'static str] {
    match post_type {
        POST_TYPE_RECIPE => RECIPE_EXTRA_FIELDS,
        POST_TYPE_PRODUCT => PRODUCT_EXTRA_FIELDS,
        _ => &[],
    }
}

/// `true` when `key` is a versionable field for the given post type.
pub fn is_versionable_field(post_type: &str, key: &str) -> bool {
    COMMON_FIELDS.contains(&key) || extra_fields(post_type).contains(&key)
}

// ---------------------------------------------------------------------------
// Snapshot helpers
// ---------------------------------------------------------------------------

/// Snapshot key holding the category id list.
pub const SNAPSHOT_CATEGORY_IDS: &str = "category_ids";

/// Snapshot key holding the tag id list.
pub const SNAPSHOT_TAG_IDS: &str = "tag_ids";

/// Extract a list of ids from a snapshot key.
///
/// Returns `None` when the key is absent or not an array, so callers can
/// fall back to the post's live associations. Non-integer array entries are
/// skipped.
pub fn snapshot_id_list(snapshot: &Value, key: &str) -> Option<Vec<DbId>> {
    snapshot
        .get(key)?
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
}

/// Gating-message constant for a missing category.
pub const REQUIREMENT_CATEGORY: &str = "At least one category is required";

/// Gating-message constant for a missing tag.
pub const REQUIREMENT_TAG: &str = "At least one tag is required";

/// Build the missing-requirement list for the approval/publish gate.
///
/// Empty when both a category and a tag are present.
pub fn missing_taxonomy_requirements(category_count: usize, tag_count: usize) -> Vec<String> {
    let mut missing = Vec::new();
    if category_count == 0 {
        missing.push(REQUIREMENT_CATEGORY.to_string());
    }
    if tag_count == 0 {
        missing.push(REQUIREMENT_TAG.to_string());
    }
    missing
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
