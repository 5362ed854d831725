use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod storage;

pub use config::DatabaseConfig;
pub use storage::PgStorage;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
///
/// Safe to call on an already-migrated database.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Name of the connected database and the role used to connect.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConnectionInfo {
    pub database: String,
    pub user_name: String,
}

/// Report which database and user the pool is connected as.
pub async fn connection_info(pool: &DbPool) -> Result<ConnectionInfo, sqlx::Error> {
    sqlx::query_as::<_, ConnectionInfo>(
        "SELECT current_database()::text AS database, current_user::text AS user_name",
    )
    .fetch_one(pool)
    .await
}
