//! The editorial workflow service.
//!
//! Orchestrates transition legality checks, approval/publish gating,
//! transactional version activation, and post-commit event dispatch.
//!
//! Every mutating operation follows the same shape: take a `FOR UPDATE`
//! lock on the post row (always before touching any version row, so
//! concurrent workflow operations on the same post serialize instead of
//! deadlocking), re-read the version under the lock, validate, mutate, and
//! commit. Events are published to the bus only after a successful commit;
//! bus and notification failures never affect the committed transition.

use std::sync::Arc;

use sqlx::PgConnection;

use pressroom_core::error::CoreError;
use pressroom_core::events::{
    event_type_for_transition, EVENT_WORKFLOW_CREATED, EVENT_WORKFLOW_PUBLISHED,
    EVENT_WORKFLOW_REVERTED, EVENT_WORKFLOW_UNPUBLISHED,
};
use pressroom_core::status::{
    canonical_status, STATUS_COPYDESK, STATUS_DRAFT, STATUS_PARKED, STATUS_PUBLISHED,
    STATUS_SCHEDULED,
};
use pressroom_core::types::DbId;
use pressroom_core::versionable::{
    extra_fields, missing_taxonomy_requirements, snapshot_id_list, SNAPSHOT_CATEGORY_IDS,
    SNAPSHOT_TAG_IDS,
};
use pressroom_core::workflow_config::TransitionRule;
use pressroom_db::models::content_version::{ContentVersion, CreateContentVersion};
use pressroom_db::models::post::{Post, UpdatePost};
use pressroom_db::models::workflow_transition::WorkflowTransition;
use pressroom_db::repositories::{
    ContentVersionRepo, PostRepo, TaxonomyRepo, WorkflowTransitionRepo,
};
use pressroom_db::DbPool;
use pressroom_events::{EditorialEvent, EventBus};

use crate::config::WorkflowConfigSource;
use crate::error::WorkflowResult;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The user performing a workflow operation, with their resolved role set.
///
/// Role membership is supplied by the caller (the authorization layer);
/// the workflow engine never queries an identity provider.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(id: DbId, roles: &[&str]) -> Self {
        Self {
            id,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowService
// ---------------------------------------------------------------------------

/// Orchestrates the editorial workflow over posts and content versions.
pub struct WorkflowService {
    pool: DbPool,
    config: Arc<dyn WorkflowConfigSource>,
    bus: Arc<EventBus>,
}

impl WorkflowService {
    pub fn new(pool: DbPool, config: Arc<dyn WorkflowConfigSource>, bus: Arc<EventBus>) -> Self {
        Self { pool, config, bus }
    }

    // ── Version creation ─────────────────────────────────────────────

    /// Create a new draft version for a post.
    ///
    /// Assigns the next version number under the post lock (gap-free),
    /// records the initial `None -> draft` transition, and makes the new
    /// version the post's draft.
    pub async fn create_version(
        &self,
        input: &CreateContentVersion,
        actor: &Actor,
    ) -> WorkflowResult<ContentVersion> {
        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, input.post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: input.post_id,
            })?;

        let version = ContentVersionRepo::create(&mut tx, input).await?;
        WorkflowTransitionRepo::create(
            &mut tx,
            version.id,
            None,
            STATUS_DRAFT,
            Some(actor.id),
            None,
        )
        .await?;
        PostRepo::set_draft_version(&mut tx, post.id, Some(version.id)).await?;
        PostRepo::set_workflow_status(&mut tx, post.id, STATUS_DRAFT).await?;
        tx.commit().await?;

        self.bus.publish(EditorialEvent::workflow_transition(
            EVENT_WORKFLOW_CREATED,
            post.id,
            version.id,
            Some(actor.id),
            None,
            STATUS_DRAFT,
            None,
        ));
        Ok(version)
    }

    // ── Eligibility ──────────────────────────────────────────────────

    /// Transitions the actor may execute on a version, in config order.
    pub async fn available_transitions(
        &self,
        actor: &Actor,
        version: &ContentVersion,
    ) -> WorkflowResult<Vec<TransitionRule>> {
        let post = self.load_post(version.post_id).await?;
        let config = self.config.resolve(&post.post_type).await;
        Ok(config
            .available_transitions(&actor.roles, &version.workflow_status)
            .into_iter()
            .cloned()
            .collect())
    }

    /// `true` iff the actor may move the version to `to_status`.
    pub async fn can_transition(
        &self,
        actor: &Actor,
        version: &ContentVersion,
        to_status: &str,
    ) -> WorkflowResult<bool> {
        let post = self.load_post(version.post_id).await?;
        let config = self.config.resolve(&post.post_type).await;
        Ok(config.can_transition(&actor.roles, &version.workflow_status, to_status))
    }

    // ── Transition ───────────────────────────────────────────────────

    /// Move a version to `to_status`, enforcing role and gating rules.
    ///
    /// Fails with `Unauthorized` when none of the actor's roles allows the
    /// edge, and with `RequirementsNotMet` when the approval gate fails;
    /// neither failure mutates anything. On success the transition record,
    /// the version status, the post mirror, and any publish side effects
    /// commit atomically, then one event is published to the bus.
    pub async fn transition(
        &self,
        version_id: DbId,
        to_status: &str,
        actor: &Actor,
        comment: Option<&str>,
    ) -> WorkflowResult<WorkflowTransition> {
        let to = canonical_status(to_status);

        // Resolve the owner and config outside the transaction; a
        // version's post (and its type) never changes.
        let version = self.load_version(version_id).await?;
        let post = self.load_post(version.post_id).await?;
        let config = self.config.resolve(&post.post_type).await;

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, post.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: version.post_id,
            })?;
        let version = ContentVersionRepo::find_by_id_for_update(&mut tx, version_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "content_version",
                id: version_id,
            })?;

        if !config.can_transition(&actor.roles, &version.workflow_status, to) {
            return Err(CoreError::Unauthorized(format!(
                "Actor {} may not move version {} from '{}' to '{to}'",
                actor.id, version.id, version.workflow_status
            ))
            .into());
        }

        if to == STATUS_PARKED {
            Self::approval_gate(&mut tx, &post, &version).await?;
        }

        let from = version.workflow_status.clone();
        let transition = WorkflowTransitionRepo::create(
            &mut tx,
            version.id,
            Some(&from),
            to,
            Some(actor.id),
            comment,
        )
        .await?;
        ContentVersionRepo::set_status(&mut tx, version.id, to).await?;
        PostRepo::set_workflow_status(&mut tx, post.id, to).await?;

        if to == STATUS_PUBLISHED {
            Self::publish_in_tx(&mut tx, &post, &version).await?;
        }

        if canonical_status(&from) == STATUS_COPYDESK && to == STATUS_DRAFT {
            // The reject/withdraw path: editing resumes on this version.
            ContentVersionRepo::deactivate(&mut tx, version.id).await?;
            PostRepo::set_active_version(&mut tx, post.id, None).await?;
            PostRepo::set_draft_version(&mut tx, post.id, Some(version.id)).await?;
        }

        tx.commit().await?;

        self.bus.publish(EditorialEvent::workflow_transition(
            event_type_for_transition(Some(&from), to),
            post.id,
            version.id,
            Some(actor.id),
            Some(&from),
            to,
            comment,
        ));

        Ok(transition)
    }

    // ── Publish ──────────────────────────────────────────────────────

    /// Publish a version directly (the scheduler path).
    ///
    /// Legal from `parked`, `scheduled`, or `published` (idempotent
    /// re-publish); anything else fails with `InvalidState`. Appends the
    /// audit transition itself when the status actually changes.
    pub async fn publish(&self, version_id: DbId) -> WorkflowResult<()> {
        let version = self.load_version(version_id).await?;

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, version.post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: version.post_id,
            })?;
        let version = ContentVersionRepo::find_by_id_for_update(&mut tx, version_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "content_version",
                id: version_id,
            })?;

        let from = canonical_status(&version.workflow_status).to_string();
        match from.as_str() {
            STATUS_PARKED | STATUS_SCHEDULED | STATUS_PUBLISHED => {}
            other => {
                return Err(CoreError::InvalidState(format!(
                    "Cannot publish a version in status '{other}'"
                ))
                .into());
            }
        }

        let status_changed = from != STATUS_PUBLISHED;
        if status_changed {
            WorkflowTransitionRepo::create(
                &mut tx,
                version.id,
                Some(&version.workflow_status),
                STATUS_PUBLISHED,
                None,
                None,
            )
            .await?;
        }
        Self::publish_in_tx(&mut tx, &post, &version).await?;
        tx.commit().await?;

        if status_changed {
            self.bus.publish(EditorialEvent::workflow_transition(
                EVENT_WORKFLOW_PUBLISHED,
                post.id,
                version.id,
                None,
                Some(&from),
                STATUS_PUBLISHED,
                None,
            ));
        }
        Ok(())
    }

    // ── Unpublish / revert / make-live ───────────────────────────────

    /// Take a post off the live site. Versions are retained; only the
    /// activation and the post's publication state are cleared.
    pub async fn unpublish(&self, post_id: DbId, actor: &Actor) -> WorkflowResult<()> {
        let post = self.load_post(post_id).await?;
        let config = self.config.resolve(&post.post_type).await;
        if !config.can_edit_published(&actor.roles) {
            return Err(CoreError::Unauthorized(format!(
                "Actor {} may not unpublish post {post_id}",
                actor.id
            ))
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: post_id,
            })?;
        if post.status != STATUS_PUBLISHED {
            return Err(
                CoreError::InvalidState(format!("Post {post_id} is not published")).into(),
            );
        }

        ContentVersionRepo::deactivate_all_for_post(&mut tx, post.id).await?;
        PostRepo::mark_unpublished(&mut tx, post.id).await?;
        tx.commit().await?;

        let mut event = EditorialEvent::new(EVENT_WORKFLOW_UNPUBLISHED)
            .with_post(post.id)
            .with_actor(actor.id)
            .with_payload(serde_json::json!({
                "from_status": STATUS_PUBLISHED,
                "to_status": STATUS_DRAFT,
                "comment": null,
            }));
        if let Some(version_id) = post.active_version_id {
            event = event.with_version(version_id);
        }
        self.bus.publish(event);
        Ok(())
    }

    /// Fork a new draft version from a historical one.
    ///
    /// The old version is never mutated or reactivated; the full audit
    /// trail is preserved.
    pub async fn revert_to_version(
        &self,
        version_id: DbId,
        actor: &Actor,
    ) -> WorkflowResult<ContentVersion> {
        let old = self.load_version(version_id).await?;

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, old.post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: old.post_id,
            })?;

        let input = CreateContentVersion {
            post_id: post.id,
            content_snapshot: old.content_snapshot.clone(),
            created_by: Some(actor.id),
            version_note: Some(format!("Reverted from version {}", old.version_number)),
            scheduled_for: None,
        };
        let new_version = ContentVersionRepo::create(&mut tx, &input).await?;
        WorkflowTransitionRepo::create(
            &mut tx,
            new_version.id,
            None,
            STATUS_DRAFT,
            Some(actor.id),
            None,
        )
        .await?;
        PostRepo::set_draft_version(&mut tx, post.id, Some(new_version.id)).await?;
        PostRepo::set_workflow_status(&mut tx, post.id, STATUS_DRAFT).await?;
        tx.commit().await?;

        self.bus.publish(EditorialEvent::workflow_transition(
            EVENT_WORKFLOW_REVERTED,
            post.id,
            new_version.id,
            Some(actor.id),
            None,
            STATUS_DRAFT,
            None,
        ));
        Ok(new_version)
    }

    /// Switch which historical snapshot is live, without creating a new
    /// version. Only legal while the post is published.
    pub async fn make_version_live(&self, version_id: DbId, actor: &Actor) -> WorkflowResult<()> {
        let version = self.load_version(version_id).await?;
        let post = self.load_post(version.post_id).await?;
        let config = self.config.resolve(&post.post_type).await;
        if !config.can_edit_published(&actor.roles) {
            return Err(CoreError::Unauthorized(format!(
                "Actor {} may not change the live version of post {}",
                actor.id, post.id
            ))
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let post = PostRepo::lock(&mut tx, version.post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: version.post_id,
            })?;
        let version = ContentVersionRepo::find_by_id_for_update(&mut tx, version_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "content_version",
                id: version_id,
            })?;

        if post.status != STATUS_PUBLISHED {
            return Err(CoreError::InvalidState(format!(
                "Post {} is not published; revert to the version instead",
                post.id
            ))
            .into());
        }

        ContentVersionRepo::activate(&mut tx, post.id, version.id).await?;
        ContentVersionRepo::set_status(&mut tx, version.id, STATUS_PUBLISHED).await?;
        Self::apply_snapshot(&mut tx, &post, &version).await?;
        PostRepo::set_active_version(&mut tx, post.id, Some(version.id)).await?;
        PostRepo::set_draft_version(&mut tx, post.id, Some(version.id)).await?;
        PostRepo::set_workflow_status(&mut tx, post.id, STATUS_PUBLISHED).await?;
        tx.commit().await?;
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn load_version(&self, version_id: DbId) -> WorkflowResult<ContentVersion> {
        Ok(ContentVersionRepo::find_by_id(&self.pool, version_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "content_version",
                id: version_id,
            })?)
    }

    async fn load_post(&self, post_id: DbId) -> WorkflowResult<Post> {
        Ok(PostRepo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: post_id,
            })?)
    }

    /// The approval gate: a version may only park with at least one
    /// category and one tag, read from the snapshot's id lists with
    /// per-field fallback to the post's live associations.
    async fn approval_gate(
        conn: &mut PgConnection,
        post: &Post,
        version: &ContentVersion,
    ) -> WorkflowResult<()> {
        let snapshot = &version.content_snapshot;
        let snap_cats = snapshot_id_list(snapshot, SNAPSHOT_CATEGORY_IDS);
        let snap_tags = snapshot_id_list(snapshot, SNAPSHOT_TAG_IDS);

        let (cat_count, tag_count) = match (&snap_cats, &snap_tags) {
            (Some(cats), Some(tags)) => (cats.len(), tags.len()),
            _ => {
                let (live_cats, live_tags) =
                    TaxonomyRepo::taxonomy_counts_for_post(conn, post.id).await?;
                (
                    snap_cats.as_ref().map_or(live_cats as usize, |c| c.len()),
                    snap_tags.as_ref().map_or(live_tags as usize, |t| t.len()),
                )
            }
        };

        let missing = missing_taxonomy_requirements(cat_count, tag_count);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::RequirementsNotMet(missing).into())
        }
    }

    /// The publish gate: the live post must carry at least one category
    /// and one tag, independently of what the snapshot will apply.
    async fn publish_gate(conn: &mut PgConnection, post_id: DbId) -> WorkflowResult<()> {
        let (cats, tags) = TaxonomyRepo::taxonomy_counts_for_post(conn, post_id).await?;
        let missing = missing_taxonomy_requirements(cats as usize, tags as usize);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::RequirementsNotMet(missing).into())
        }
    }

    /// The publish procedure, inside the caller's transaction: gate,
    /// activate (deactivating all siblings), apply the snapshot, and mark
    /// the post published.
    async fn publish_in_tx(
        conn: &mut PgConnection,
        post: &Post,
        version: &ContentVersion,
    ) -> WorkflowResult<()> {
        Self::publish_gate(conn, post.id).await?;
        ContentVersionRepo::activate(conn, post.id, version.id).await?;
        ContentVersionRepo::set_status(conn, version.id, STATUS_PUBLISHED).await?;
        Self::apply_snapshot(conn, post, version).await?;
        PostRepo::mark_published(conn, post.id, version.id).await?;
        Ok(())
    }

    /// Copy the version's snapshot onto the post's versioned fields and
    /// replace its taxonomy associations with the snapshot's id lists.
    async fn apply_snapshot(
        conn: &mut PgConnection,
        post: &Post,
        version: &ContentVersion,
    ) -> WorkflowResult<()> {
        let update =
            snapshot_to_update(&post.post_type, &post.fields, &version.content_snapshot);
        PostRepo::apply_versioned_fields(conn, post.id, &update).await?;

        if let Some(ids) = snapshot_id_list(&version.content_snapshot, SNAPSHOT_CATEGORY_IDS) {
            TaxonomyRepo::replace_categories(conn, post.id, &ids).await?;
        }
        if let Some(ids) = snapshot_id_list(&version.content_snapshot, SNAPSHOT_TAG_IDS) {
            TaxonomyRepo::replace_tags(conn, post.id, &ids).await?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot application
// ---------------------------------------------------------------------------

/// Build the field update for applying a snapshot onto a post.
///
/// Only keys in the post type's versionable-field registry are copied:
/// common fields map to dedicated columns, type-specific extras merge into
/// the `fields` JSONB object. Unknown snapshot keys are ignored; absent
/// keys leave the current value untouched.
fn snapshot_to_update(
    post_type: &str,
    current_fields: &serde_json::Value,
    snapshot: &serde_json::Value,
) -> UpdatePost {
    let get_str = |key: &str| {
        snapshot
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
    };

    let mut update = UpdatePost {
        title: get_str("title"),
        slug: get_str("slug"),
        excerpt: get_str("excerpt"),
        body: get_str("body"),
        hero_image_path: get_str("hero_image_path"),
        fields: None,
    };

    let extras = extra_fields(post_type);
    if !extras.is_empty() {
        if let Some(snap_obj) = snapshot.as_object() {
            let mut fields = current_fields.as_object().cloned().unwrap_or_default();
            let mut changed = false;
            for key in extras {
                if let Some(value) = snap_obj.get(*key) {
                    fields.insert((*key).to_string(), value.clone());
                    changed = true;
                }
            }
            if changed {
                update.fields = Some(serde_json::Value::Object(fields));
            }
        }
    }

    update
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
