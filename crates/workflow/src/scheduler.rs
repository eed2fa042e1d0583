//! Timed publication scheduler.
//!
//! [`PublishScheduler`] runs as a background task, periodically finding
//! `scheduled` versions whose publication time has arrived and publishing
//! each through the workflow service. Per-version failures are logged and
//! skipped; the loop continues.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use pressroom_db::repositories::ContentVersionRepo;
use pressroom_db::DbPool;

use crate::service::WorkflowService;

/// How often the scheduler polls for due versions.
const SCHEDULE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Background service that publishes scheduled versions on time.
pub struct PublishScheduler {
    pool: DbPool,
    service: Arc<WorkflowService>,
}

impl PublishScheduler {
    /// Create a new scheduler with the given database pool and service.
    pub fn new(pool: DbPool, service: Arc<WorkflowService>) -> Self {
        Self { pool, service }
    }

    /// Run the scheduler loop.
    ///
    /// Checks every minute for due versions. The loop exits gracefully
    /// when the provided [`CancellationToken`] is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SCHEDULE_CHECK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Publish scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_due().await {
                        tracing::error!(error = %e, "Failed to query due scheduled versions");
                    }
                }
            }
        }
    }

    /// Publish every version whose scheduled time has passed.
    ///
    /// Runs one pass; also callable directly for tests and one-shot tools.
    pub async fn process_due(&self) -> Result<usize, sqlx::Error> {
        let due = ContentVersionRepo::find_due_scheduled(&self.pool, chrono::Utc::now()).await?;
        let mut published = 0;

        for version in &due {
            match self.service.publish(version.id).await {
                Ok(()) => {
                    published += 1;
                    tracing::info!(
                        version_id = version.id,
                        post_id = version.post_id,
                        "Published scheduled version"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        version_id = version.id,
                        post_id = version.post_id,
                        error = %e,
                        "Failed to publish scheduled version"
                    );
                }
            }
        }

        if published > 0 {
            tracing::info!(count = published, "Processed scheduled publications");
        }
        Ok(published)
    }
}
