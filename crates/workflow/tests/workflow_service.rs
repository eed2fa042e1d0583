//! Integration tests for the workflow service against a real database.
//!
//! Covers the full editorial lifecycle: version creation, role-gated
//! transitions, approval gating, publication with snapshot application,
//! idempotent re-publish, reject/withdraw, revert, make-live, unpublish,
//! settings-driven configuration, and the publish scheduler.

use std::sync::Arc;

use assert_matches::assert_matches;
use sqlx::PgPool;

use pressroom_core::error::CoreError;
use pressroom_core::status::{STATUS_COPYDESK, STATUS_DRAFT, STATUS_PARKED, STATUS_PUBLISHED};
use pressroom_core::versionable::{REQUIREMENT_CATEGORY, REQUIREMENT_TAG};
use pressroom_db::models::content_version::CreateContentVersion;
use pressroom_db::models::post::CreatePost;
use pressroom_db::models::taxonomy::{CreateCategory, CreateTag};
use pressroom_db::models::user::CreateUser;
use pressroom_db::repositories::{
    ContentVersionRepo, PostRepo, SettingRepo, TaxonomyRepo, UserRepo, WorkflowTransitionRepo,
};
use pressroom_events::EventBus;
use pressroom_workflow::{
    Actor, PublishScheduler, SettingsConfigSource, StaticConfigSource, WorkflowError,
    WorkflowService,
};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    pool: PgPool,
    service: Arc<WorkflowService>,
    bus: Arc<EventBus>,
    author: Actor,
    editor: Actor,
    post_id: i64,
}

/// Seed a writer (the post author), an editor, and one article post, and
/// build a service over the built-in default workflow config.
async fn harness(pool: PgPool) -> Harness {
    let writer_role = UserRepo::find_role_by_name(&pool, "writer")
        .await
        .unwrap()
        .expect("writer role is seeded");
    let editor_role = UserRepo::find_role_by_name(&pool, "editor")
        .await
        .unwrap()
        .expect("editor role is seeded");

    let author_user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "frankie".to_string(),
            email: "frankie@example.com".to_string(),
            role_id: writer_role.id,
        },
    )
    .await
    .unwrap();
    let editor_user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "dana".to_string(),
            email: "dana@example.com".to_string(),
            role_id: editor_role.id,
        },
    )
    .await
    .unwrap();

    let post = PostRepo::create(
        &pool,
        &CreatePost {
            post_type: "article".to_string(),
            title: "Original headline".to_string(),
            slug: "original-headline".to_string(),
            excerpt: None,
            body: Some("Original body".to_string()),
            hero_image_path: None,
            fields: None,
            author_id: author_user.id,
        },
    )
    .await
    .unwrap();

    let bus = Arc::new(EventBus::default());
    let service = Arc::new(WorkflowService::new(
        pool.clone(),
        Arc::new(StaticConfigSource::default()),
        bus.clone(),
    ));

    Harness {
        pool,
        service,
        bus,
        author: Actor::new(author_user.id, &["writer"]),
        editor: Actor::new(editor_user.id, &["editor"]),
        post_id: post.id,
    }
}

impl Harness {
    /// Create a draft version through the service.
    async fn draft(&self, snapshot: serde_json::Value) -> i64 {
        let version = self
            .service
            .create_version(
                &CreateContentVersion {
                    post_id: self.post_id,
                    content_snapshot: snapshot,
                    created_by: Some(self.author.id),
                    version_note: None,
                    scheduled_for: None,
                },
                &self.author,
            )
            .await
            .unwrap();
        version.id
    }

    /// Attach one category and one tag to the post so gates pass.
    async fn satisfy_gate(&self) -> (i64, i64) {
        let cat = TaxonomyRepo::create_category(
            &self.pool,
            &CreateCategory {
                name: "News".to_string(),
                slug: "news".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let tag = TaxonomyRepo::create_tag(
            &self.pool,
            &CreateTag {
                name: "breaking".to_string(),
                slug: "breaking".to_string(),
            },
        )
        .await
        .unwrap();
        TaxonomyRepo::attach_category(&self.pool, self.post_id, cat.id)
            .await
            .unwrap();
        TaxonomyRepo::attach_tag(&self.pool, self.post_id, tag.id)
            .await
            .unwrap();
        (cat.id, tag.id)
    }

    /// Walk a version from draft into the parked (approved) state.
    async fn park(&self, version_id: i64) {
        self.service
            .transition(version_id, STATUS_COPYDESK, &self.author, None)
            .await
            .unwrap();
        self.service
            .transition(version_id, STATUS_PARKED, &self.editor, None)
            .await
            .unwrap();
    }

    async fn version_status(&self, version_id: i64) -> String {
        ContentVersionRepo::find_by_id(&self.pool, version_id)
            .await
            .unwrap()
            .unwrap()
            .workflow_status
    }

    async fn transition_count(&self, version_id: i64) -> usize {
        WorkflowTransitionRepo::list_by_version(&self.pool, version_id)
            .await
            .unwrap()
            .len()
    }

    async fn active_count(&self) -> usize {
        ContentVersionRepo::list_by_post(&self.pool, self.post_id)
            .await
            .unwrap()
            .iter()
            .filter(|v| v.is_active)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Submission and authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_writer_submits_draft_to_copydesk(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({"title": "V1"})).await;
    let mut rx = h.bus.subscribe();

    let transition = h
        .service
        .transition(version_id, STATUS_COPYDESK, &h.author, Some("ready for review"))
        .await
        .unwrap();

    assert_eq!(transition.from_status.as_deref(), Some("draft"));
    assert_eq!(transition.to_status, "copydesk");
    assert_eq!(transition.performed_by, Some(h.author.id));
    assert_eq!(transition.comment.as_deref(), Some("ready for review"));

    assert_eq!(h.version_status(version_id).await, "copydesk");
    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.workflow_status, "copydesk");

    // Exactly one event, carrying the before/after statuses and the actor.
    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "workflow.submitted");
    assert_eq!(event.actor_id, Some(h.author.id));
    assert_eq!(event.payload["from_status"], "draft");
    assert_eq!(event.payload["to_status"], "copydesk");
    assert!(rx.try_recv().is_err(), "no second event for one transition");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unauthorized_transition_changes_nothing(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({})).await;
    h.service
        .transition(version_id, STATUS_COPYDESK, &h.author, None)
        .await
        .unwrap();
    let transitions_before = h.transition_count(version_id).await;

    // A writer may not approve their own submission.
    let result = h
        .service
        .transition(version_id, STATUS_PARKED, &h.author, None)
        .await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::Unauthorized(_)))
    );

    assert_eq!(h.version_status(version_id).await, "copydesk");
    assert_eq!(h.transition_count(version_id).await, transitions_before);
    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.workflow_status, "copydesk");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transition_to_unknown_status_is_unauthorized(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({})).await;

    let result = h.service.transition(version_id, "limbo", &h.editor, None).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::Unauthorized(_)))
    );
}

// ---------------------------------------------------------------------------
// Approval gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_gate_lists_both_missing_requirements(pool: PgPool) {
    let h = harness(pool).await;
    // Snapshot carries no taxonomy lists, and the post has no live
    // associations either.
    let version_id = h.draft(serde_json::json!({"title": "Gated"})).await;
    h.service
        .transition(version_id, STATUS_COPYDESK, &h.author, None)
        .await
        .unwrap();
    let transitions_before = h.transition_count(version_id).await;

    let result = h
        .service
        .transition(version_id, STATUS_PARKED, &h.editor, None)
        .await;
    match result {
        Err(WorkflowError::Core(CoreError::RequirementsNotMet(missing))) => {
            assert_eq!(
                missing,
                vec![REQUIREMENT_CATEGORY.to_string(), REQUIREMENT_TAG.to_string()]
            );
        }
        other => panic!("expected RequirementsNotMet, got {other:?}"),
    }
    assert_eq!(h.version_status(version_id).await, "copydesk");
    assert_eq!(h.transition_count(version_id).await, transitions_before);

    // Adding one category and one tag unblocks the approval.
    h.satisfy_gate().await;
    h.service
        .transition(version_id, STATUS_PARKED, &h.editor, None)
        .await
        .unwrap();
    assert_eq!(h.version_status(version_id).await, "parked");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_gate_prefers_snapshot_over_live(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;
    // Live associations exist, but the snapshot explicitly says "no
    // categories, no tags" — the snapshot wins.
    let version_id = h
        .draft(serde_json::json!({"category_ids": [], "tag_ids": []}))
        .await;
    h.service
        .transition(version_id, STATUS_COPYDESK, &h.author, None)
        .await
        .unwrap();

    let result = h
        .service
        .transition(version_id, STATUS_PARKED, &h.editor, None)
        .await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::RequirementsNotMet(_)))
    );
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_applies_snapshot_and_replaces_taxonomy(pool: PgPool) {
    let h = harness(pool).await;
    let (old_cat, old_tag) = h.satisfy_gate().await;
    let new_cat = TaxonomyRepo::create_category(
        &h.pool,
        &CreateCategory {
            name: "Features".to_string(),
            slug: "features".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let new_tag = TaxonomyRepo::create_tag(
        &h.pool,
        &CreateTag {
            name: "longread".to_string(),
            slug: "longread".to_string(),
        },
    )
    .await
    .unwrap();

    let version_id = h
        .draft(serde_json::json!({
            "title": "Fresh headline",
            "body": "Fresh body",
            "category_ids": [new_cat.id],
            "tag_ids": [new_tag.id],
        }))
        .await;
    h.park(version_id).await;
    h.service
        .transition(version_id, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.status, "published");
    assert_eq!(post.workflow_status, "published");
    assert_eq!(post.title, "Fresh headline");
    assert_eq!(post.body.as_deref(), Some("Fresh body"));
    assert!(post.published_at.is_some());
    assert_eq!(post.active_version_id, Some(version_id));

    let version = ContentVersionRepo::find_by_id(&h.pool, version_id)
        .await
        .unwrap()
        .unwrap();
    assert!(version.is_active);
    assert_eq!(version.workflow_status, "published");

    // Replace, not merge: the old associations are gone.
    let cats = TaxonomyRepo::category_ids_for_post(&h.pool, h.post_id).await.unwrap();
    let tags = TaxonomyRepo::tag_ids_for_post(&h.pool, h.post_id).await.unwrap();
    assert_eq!(cats, vec![new_cat.id]);
    assert_eq!(tags, vec![new_tag.id]);
    assert!(!cats.contains(&old_cat));
    assert!(!tags.contains(&old_tag));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publishing_a_second_version_deactivates_the_first(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;

    let v1 = h.draft(serde_json::json!({"title": "First"})).await;
    h.park(v1).await;
    h.service
        .transition(v1, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();

    let v2 = h.draft(serde_json::json!({"title": "Second"})).await;
    h.park(v2).await;
    h.service
        .transition(v2, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();

    assert_eq!(h.active_count().await, 1, "at most one active version");
    let active = ContentVersionRepo::find_active_for_post(&h.pool, h.post_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, v2);

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "Second");
    assert_eq!(post.active_version_id, Some(v2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_republish_is_idempotent(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;
    let version_id = h.draft(serde_json::json!({"title": "Once"})).await;
    h.park(version_id).await;
    h.service
        .transition(version_id, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();
    let transitions_before = h.transition_count(version_id).await;

    h.service.publish(version_id).await.unwrap();

    assert_eq!(
        h.transition_count(version_id).await,
        transitions_before,
        "re-publishing an already-published version appends no transition"
    );
    assert_eq!(h.active_count().await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_from_draft_is_invalid_state(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;
    let version_id = h.draft(serde_json::json!({})).await;

    let result = h.service.publish(version_id).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::InvalidState(_)))
    );
    assert_eq!(h.version_status(version_id).await, "draft");
}

// ---------------------------------------------------------------------------
// Reject / withdraw
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_to_draft_resumes_editing_on_the_version(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({})).await;
    h.service
        .transition(version_id, STATUS_COPYDESK, &h.author, None)
        .await
        .unwrap();
    let mut rx = h.bus.subscribe();

    // The editor sends it back: the reject path.
    h.service
        .transition(version_id, STATUS_DRAFT, &h.editor, Some("tighten the intro"))
        .await
        .unwrap();

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.workflow_status, "draft");
    assert_eq!(post.active_version_id, None);
    assert_eq!(post.draft_version_id, Some(version_id));

    let version = ContentVersionRepo::find_by_id(&h.pool, version_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!version.is_active);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "workflow.returned");
    assert_eq!(event.actor_id, Some(h.editor.id));
    assert_eq!(event.payload["comment"], "tighten the intro");
}

// ---------------------------------------------------------------------------
// Version numbering and revert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_version_numbers_are_gapless(pool: PgPool) {
    let h = harness(pool).await;
    h.draft(serde_json::json!({"n": 1})).await;
    h.draft(serde_json::json!({"n": 2})).await;
    let v3 = h.draft(serde_json::json!({"n": 3})).await;

    let versions = ContentVersionRepo::list_by_post(&h.pool, h.post_id)
        .await
        .unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);

    // Each creation recorded its initial transition with a null from.
    let history = WorkflowTransitionRepo::list_by_version(&h.pool, v3).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].from_status.is_none());
    assert_eq!(history[0].to_status, "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revert_forks_a_new_draft(pool: PgPool) {
    let h = harness(pool).await;
    h.draft(serde_json::json!({"title": "One"})).await;
    let v2 = h.draft(serde_json::json!({"title": "Two"})).await;
    let v2_before = ContentVersionRepo::find_by_id(&h.pool, v2).await.unwrap().unwrap();

    let v3 = h.service.revert_to_version(v2, &h.author).await.unwrap();

    assert_eq!(v3.version_number, 3);
    assert_eq!(v3.content_snapshot, serde_json::json!({"title": "Two"}));
    assert_eq!(v3.version_note.as_deref(), Some("Reverted from version 2"));
    assert_eq!(v3.workflow_status, "draft");
    assert!(!v3.is_active);

    // The source version is untouched.
    let v2_after = ContentVersionRepo::find_by_id(&h.pool, v2).await.unwrap().unwrap();
    assert_eq!(v2_after.workflow_status, v2_before.workflow_status);
    assert_eq!(v2_after.is_active, v2_before.is_active);
    assert_eq!(v2_after.content_snapshot, v2_before.content_snapshot);

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.draft_version_id, Some(v3.id));
}

// ---------------------------------------------------------------------------
// Make-live and unpublish
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_make_version_live_requires_published_post(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({})).await;

    let result = h.service.make_version_live(version_id, &h.editor).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::InvalidState(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_make_version_live_switches_the_truth(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;
    let v1 = h.draft(serde_json::json!({"title": "V1 headline"})).await;
    h.park(v1).await;
    h.service
        .transition(v1, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();
    let v2 = h.draft(serde_json::json!({"title": "V2 headline"})).await;
    h.park(v2).await;
    h.service
        .transition(v2, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();

    // Switch back to v1 without forking a new version.
    h.service.make_version_live(v1, &h.editor).await.unwrap();

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "V1 headline");
    assert_eq!(post.active_version_id, Some(v1));
    assert_eq!(post.draft_version_id, Some(v1));
    assert_eq!(h.active_count().await, 1);
    assert_eq!(
        ContentVersionRepo::list_by_post(&h.pool, h.post_id)
            .await
            .unwrap()
            .len(),
        2,
        "make-live creates no new version"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unpublish_clears_activation_and_keeps_versions(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;
    let version_id = h.draft(serde_json::json!({"title": "Live"})).await;
    h.park(version_id).await;
    h.service
        .transition(version_id, STATUS_PUBLISHED, &h.editor, None)
        .await
        .unwrap();

    // A writer may not unpublish.
    let result = h.service.unpublish(h.post_id, &h.author).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::Unauthorized(_)))
    );

    h.service.unpublish(h.post_id, &h.editor).await.unwrap();

    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.status, "draft");
    assert!(post.published_at.is_none());
    assert_eq!(post.active_version_id, None);
    assert_eq!(h.active_count().await, 0);
    assert_eq!(
        ContentVersionRepo::list_by_post(&h.pool, h.post_id)
            .await
            .unwrap()
            .len(),
        1,
        "unpublish deletes nothing"
    );

    // Unpublishing twice is an InvalidState, not a silent no-op.
    let result = h.service.unpublish(h.post_id, &h.editor).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::InvalidState(_)))
    );
}

// ---------------------------------------------------------------------------
// Settings-driven configuration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_override_and_malformed_fallback(pool: PgPool) {
    let h = harness(pool.clone()).await;
    let service = WorkflowService::new(
        pool.clone(),
        Arc::new(SettingsConfigSource::new(pool.clone())),
        h.bus.clone(),
    );

    // A custom config for articles lets writers publish straight from draft.
    SettingRepo::set(
        &pool,
        "workflow.config.article",
        &serde_json::json!({
            "states": [
                {"key": "draft", "label": "Draft"},
                {"key": "published", "label": "Published"}
            ],
            "transitions": [
                {"from": "draft", "to": "published", "roles": ["writer"], "label": "Ship it"}
            ],
            "publish_roles": ["writer"],
            "edit_published_roles": ["writer"]
        }),
    )
    .await
    .unwrap();

    let version_id = h.draft(serde_json::json!({})).await;
    let version = ContentVersionRepo::find_by_id(&pool, version_id)
        .await
        .unwrap()
        .unwrap();

    assert!(service
        .can_transition(&h.author, &version, "published")
        .await
        .unwrap());
    assert!(!service
        .can_transition(&h.author, &version, "copydesk")
        .await
        .unwrap());

    // Malformed stored config falls back to the built-in default.
    SettingRepo::set(
        &pool,
        "workflow.config.article",
        &serde_json::json!("not a config object"),
    )
    .await
    .unwrap();
    assert!(!service
        .can_transition(&h.author, &version, "published")
        .await
        .unwrap());
    assert!(service
        .can_transition(&h.author, &version, "copydesk")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_transitions_accepts_legacy_review_status(pool: PgPool) {
    let h = harness(pool).await;
    let version_id = h.draft(serde_json::json!({})).await;

    // Old rows may still carry the deprecated "review" status.
    let mut conn = h.pool.acquire().await.unwrap();
    ContentVersionRepo::set_status(&mut conn, version_id, "review")
        .await
        .unwrap();
    drop(conn);
    let version = ContentVersionRepo::find_by_id(&h.pool, version_id)
        .await
        .unwrap()
        .unwrap();

    let available = h
        .service
        .available_transitions(&h.editor, &version)
        .await
        .unwrap();
    let targets: Vec<&str> = available.iter().map(|t| t.to.as_str()).collect();
    assert_eq!(targets, vec!["parked", "draft"]);
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scheduler_publishes_due_versions_only(pool: PgPool) {
    let h = harness(pool).await;
    h.satisfy_gate().await;

    let due = h.draft(serde_json::json!({"title": "Due"})).await;
    h.park(due).await;
    h.service
        .transition(due, "scheduled", &h.editor, None)
        .await
        .unwrap();

    let mut conn = h.pool.acquire().await.unwrap();
    ContentVersionRepo::set_scheduled_for(
        &mut conn,
        due,
        Some(chrono::Utc::now() - chrono::Duration::minutes(1)),
    )
    .await
    .unwrap();
    drop(conn);

    let scheduler = PublishScheduler::new(h.pool.clone(), h.service.clone());
    let published = scheduler.process_due().await.unwrap();
    assert_eq!(published, 1);

    assert_eq!(h.version_status(due).await, "published");
    let post = PostRepo::find_by_id(&h.pool, h.post_id).await.unwrap().unwrap();
    assert_eq!(post.status, "published");
    assert_eq!(post.title, "Due");

    // A second pass finds nothing to do.
    assert_eq!(scheduler.process_due().await.unwrap(), 0);
}
