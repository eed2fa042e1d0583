//! Integration tests for the settings key/value store.

use sqlx::PgPool;

use pressroom_db::repositories::SettingRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_key_is_none(pool: PgPool) {
    assert!(SettingRepo::get(&pool, "no.such.key").await.unwrap().is_none());
    assert!(SettingRepo::get_value(&pool, "no.such.key")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_then_get(pool: PgPool) {
    let value = serde_json::json!({"states": ["draft", "published"]});
    SettingRepo::set(&pool, "workflow.config.default", &value)
        .await
        .unwrap();

    let stored = SettingRepo::get_value(&pool, "workflow.config.default")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, value);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_upserts(pool: PgPool) {
    SettingRepo::set(&pool, "site.publish_webhook_url", &serde_json::json!("https://a.example"))
        .await
        .unwrap();
    SettingRepo::set(&pool, "site.publish_webhook_url", &serde_json::json!("https://b.example"))
        .await
        .unwrap();

    let stored = SettingRepo::get_value(&pool, "site.publish_webhook_url")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, serde_json::json!("https://b.example"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete(pool: PgPool) {
    SettingRepo::set(&pool, "temp.key", &serde_json::json!(1))
        .await
        .unwrap();
    assert!(SettingRepo::delete(&pool, "temp.key").await.unwrap());
    assert!(!SettingRepo::delete(&pool, "temp.key").await.unwrap());
    assert!(SettingRepo::get(&pool, "temp.key").await.unwrap().is_none());
}
