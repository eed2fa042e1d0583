//! Integration tests for taxonomy associations and the gating counts query.

use sqlx::PgPool;

use pressroom_db::models::post::CreatePost;
use pressroom_db::models::taxonomy::{CreateCategory, CreateTag};
use pressroom_db::models::user::CreateUser;
use pressroom_db::repositories::{PostRepo, TaxonomyRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_post(pool: &PgPool, slug: &str) -> i64 {
    let role = UserRepo::find_role_by_name(pool, "writer")
        .await
        .unwrap()
        .unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "jordan".to_string(),
            email: "jordan@example.com".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap();
    let post = PostRepo::create(
        pool,
        &CreatePost {
            post_type: "recipe".to_string(),
            title: "Sourdough".to_string(),
            slug: slug.to_string(),
            excerpt: None,
            body: None,
            hero_image_path: None,
            fields: None,
            author_id: user.id,
        },
    )
    .await
    .unwrap();
    post.id
}

async fn seed_category(pool: &PgPool, slug: &str) -> i64 {
    TaxonomyRepo::create_category(
        pool,
        &CreateCategory {
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_tag(pool: &PgPool, slug: &str) -> i64 {
    TaxonomyRepo::create_tag(
        pool,
        &CreateTag {
            name: slug.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counts_start_at_zero(pool: PgPool) {
    let post_id = seed_post(&pool, "zero-counts").await;

    let mut conn = pool.acquire().await.unwrap();
    let (cats, tags) = TaxonomyRepo::taxonomy_counts_for_post(&mut conn, post_id)
        .await
        .unwrap();
    assert_eq!((cats, tags), (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attach_is_idempotent(pool: PgPool) {
    let post_id = seed_post(&pool, "idempotent-attach").await;
    let cat = seed_category(&pool, "baking").await;
    let tag = seed_tag(&pool, "bread").await;

    TaxonomyRepo::attach_category(&pool, post_id, cat).await.unwrap();
    TaxonomyRepo::attach_category(&pool, post_id, cat).await.unwrap();
    TaxonomyRepo::attach_tag(&pool, post_id, tag).await.unwrap();
    TaxonomyRepo::attach_tag(&pool, post_id, tag).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let (cats, tags) = TaxonomyRepo::taxonomy_counts_for_post(&mut conn, post_id)
        .await
        .unwrap();
    assert_eq!((cats, tags), (1, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_is_not_a_merge(pool: PgPool) {
    let post_id = seed_post(&pool, "replace-not-merge").await;
    let old_cat = seed_category(&pool, "old-cat").await;
    let new_cat_1 = seed_category(&pool, "new-cat-1").await;
    let new_cat_2 = seed_category(&pool, "new-cat-2").await;
    let old_tag = seed_tag(&pool, "old-tag").await;
    let new_tag = seed_tag(&pool, "new-tag").await;

    TaxonomyRepo::attach_category(&pool, post_id, old_cat).await.unwrap();
    TaxonomyRepo::attach_tag(&pool, post_id, old_tag).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    TaxonomyRepo::replace_categories(&mut conn, post_id, &[new_cat_1, new_cat_2])
        .await
        .unwrap();
    TaxonomyRepo::replace_tags(&mut conn, post_id, &[new_tag])
        .await
        .unwrap();
    drop(conn);

    let cats = TaxonomyRepo::category_ids_for_post(&pool, post_id).await.unwrap();
    let tags = TaxonomyRepo::tag_ids_for_post(&pool, post_id).await.unwrap();
    assert_eq!(cats, vec![new_cat_1, new_cat_2]);
    assert_eq!(tags, vec![new_tag]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_with_empty_clears(pool: PgPool) {
    let post_id = seed_post(&pool, "replace-empty").await;
    let cat = seed_category(&pool, "clearing").await;
    TaxonomyRepo::attach_category(&pool, post_id, cat).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    TaxonomyRepo::replace_categories(&mut conn, post_id, &[])
        .await
        .unwrap();
    drop(conn);

    assert!(TaxonomyRepo::category_ids_for_post(&pool, post_id)
        .await
        .unwrap()
        .is_empty());
}
