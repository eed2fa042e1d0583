//! Workflow configuration resolution.
//!
//! Configs are stored as JSON in the settings table under
//! `workflow.config.<post_type>` with a global `workflow.config.default`
//! fallback and a compiled built-in default behind that. Resolution never
//! fails: malformed or missing stored configs fall through to the next
//! level with a warning.

use async_trait::async_trait;

use pressroom_core::workflow_config::WorkflowConfig;
use pressroom_db::repositories::SettingRepo;
use pressroom_db::DbPool;

/// Settings key prefix for per-post-type workflow configs.
pub const WORKFLOW_CONFIG_KEY_PREFIX: &str = "workflow.config.";

/// Settings key for the global default workflow config.
pub const WORKFLOW_CONFIG_DEFAULT_KEY: &str = "workflow.config.default";

/// The settings key for a post type's workflow config.
pub fn config_key(post_type: &str) -> String {
    format!("{WORKFLOW_CONFIG_KEY_PREFIX}{post_type}")
}

/// Source of resolved workflow configurations.
///
/// Injected into the workflow service at construction; callers that need
/// caching wrap their source, the engine itself reads fresh on every
/// eligibility check.
#[async_trait]
pub trait WorkflowConfigSource: Send + Sync {
    /// Resolve the workflow config for a post type. Must never fail.
    async fn resolve(&self, post_type: &str) -> WorkflowConfig;
}

// ---------------------------------------------------------------------------
// SettingsConfigSource
// ---------------------------------------------------------------------------

/// Resolves workflow configs from the settings store.
pub struct SettingsConfigSource {
    pool: DbPool,
}

impl SettingsConfigSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load and parse the config stored under `key`, if any.
    ///
    /// A storage error or malformed JSON logs a warning and returns `None`
    /// so resolution falls through to the next level.
    async fn load(&self, key: &str) -> Option<WorkflowConfig> {
        let value = match SettingRepo::get_value(&self.pool, key).await {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read workflow config setting");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed workflow config setting, ignoring");
                None
            }
        }
    }
}

#[async_trait]
impl WorkflowConfigSource for SettingsConfigSource {
    async fn resolve(&self, post_type: &str) -> WorkflowConfig {
        if let Some(config) = self.load(&config_key(post_type)).await {
            return config;
        }
        if let Some(config) = self.load(WORKFLOW_CONFIG_DEFAULT_KEY).await {
            return config;
        }
        WorkflowConfig::built_in_default()
    }
}

// ---------------------------------------------------------------------------
// StaticConfigSource
// ---------------------------------------------------------------------------

/// A fixed config for every post type. Useful for embedders that manage
/// configuration themselves, and for tests.
pub struct StaticConfigSource {
    config: WorkflowConfig,
}

impl StaticConfigSource {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }
}

impl Default for StaticConfigSource {
    fn default() -> Self {
        Self::new(WorkflowConfig::built_in_default())
    }
}

#[async_trait]
impl WorkflowConfigSource for StaticConfigSource {
    async fn resolve(&self, _post_type: &str) -> WorkflowConfig {
        self.config.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_appends_post_type() {
        assert_eq!(config_key("recipe"), "workflow.config.recipe");
        assert_eq!(config_key("article"), "workflow.config.article");
    }

    #[tokio::test]
    async fn static_source_returns_same_config_for_any_type() {
        let source = StaticConfigSource::default();
        let a = source.resolve("article").await;
        let b = source.resolve("no-such-type").await;
        assert_eq!(a.states.len(), b.states.len());
        assert_eq!(a.transitions.len(), b.transitions.len());
    }
}
