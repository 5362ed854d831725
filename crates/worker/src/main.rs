use std::fmt::Display;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todolist_core::config::AppConfig;
use todolist_core::service::TaskService;
use todolist_db::{DatabaseConfig, PgStorage};
use todolist_worker::scheduler::{self, AutocloseScheduler};

/// Log a startup failure and exit non-zero.
fn fatal(context: &str, err: impl Display) -> ! {
    tracing::error!(error = %err, "{context}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todolist_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let app_config =
        AppConfig::from_env().unwrap_or_else(|e| fatal("Invalid application configuration", e));
    let db_config =
        DatabaseConfig::from_env().unwrap_or_else(|e| fatal("Invalid database configuration", e));
    let interval =
        scheduler::interval_from_env().unwrap_or_else(|e| fatal("Invalid scheduler interval", e));
    tracing::info!(
        max_projects = app_config.max_projects,
        max_tasks_per_project = app_config.max_tasks_per_project,
        host = %db_config.host,
        database = %db_config.name,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = todolist_db::create_pool(&db_config.database_url())
        .await
        .unwrap_or_else(|e| fatal("Failed to connect to database", e));
    tracing::info!("Database connection pool created");

    todolist_db::health_check(&pool)
        .await
        .unwrap_or_else(|e| fatal("Database health check failed", e));
    tracing::info!("Database health check passed");

    todolist_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| fatal("Failed to run database migrations", e));
    tracing::info!("Database migrations applied");

    // --- Scheduler ---
    let storage = Arc::new(PgStorage::new(pool));
    let scheduler = AutocloseScheduler::new(TaskService::new(storage, app_config), interval);

    let cancel = CancellationToken::new();
    let scheduler_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        scheduler.run(scheduler_cancel).await;
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
    cancel.cancel();

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Scheduler task ended abnormally");
    }
    tracing::info!("Auto-close worker stopped");
}
