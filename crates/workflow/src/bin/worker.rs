//! Pressroom background worker.
//!
//! Runs the notification router and the publish scheduler against the
//! configured database. Exits cleanly on Ctrl-C.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use pressroom_events::{EmailConfig, EmailDelivery, EventBus, NotificationRouter};
use pressroom_workflow::{PublishScheduler, SettingsConfigSource, WorkflowService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = pressroom_db::create_pool(&database_url).await?;
    sqlx::migrate!("../../db/migrations").run(&pool).await?;

    let bus = Arc::new(EventBus::default());

    let email = EmailConfig::from_env().map(|config| Arc::new(EmailDelivery::new(config)));
    if email.is_none() {
        tracing::info!("SMTP not configured, email notifications disabled");
    }
    let router = NotificationRouter::new(pool.clone(), email);
    let router_handle = tokio::spawn(router.run(bus.subscribe()));

    let config = Arc::new(SettingsConfigSource::new(pool.clone()));
    let service = Arc::new(WorkflowService::new(pool.clone(), config, bus.clone()));
    let scheduler = PublishScheduler::new(pool.clone(), service);

    let cancel = CancellationToken::new();
    let scheduler_cancel = cancel.clone();
    let scheduler_handle = tokio::spawn(async move { scheduler.run(scheduler_cancel).await });

    tracing::info!("Pressroom worker started");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    cancel.cancel();
    scheduler_handle.await?;
    drop(bus);
    router_handle.await?;
    Ok(())
}
