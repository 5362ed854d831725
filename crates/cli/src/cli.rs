//! Command-line arguments and the one-shot subcommands.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use todolist_core::config::AppConfig;
use todolist_core::memory::InMemoryStorage;
use todolist_core::service::{ProjectService, TaskService};
use todolist_core::storage::ProjectStorage;
use todolist_core::types::{today, Date};
use todolist_core::validation::parse_deadline;
use todolist_db::{DatabaseConfig, DbPool, PgStorage};
use todolist_worker::scheduler::DEFAULT_INTERVAL;
use todolist_worker::AutocloseScheduler;

use crate::console;

/// todolist - projects and tasks from the terminal
///
/// Without a subcommand, starts the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "todolist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend for the menu, `autoclose` and `stats`
    #[arg(long, global = true, value_enum, env = "TODOLIST_BACKEND", default_value_t = Backend::Memory)]
    pub backend: Backend,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Process-local storage, lost on exit
    Memory,
    /// PostgreSQL configured through `DB_*` / `DATABASE_URL`
    Postgres,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to PostgreSQL and print the current database and user
    DbCheck,

    /// Apply pending database migrations
    DbUpgrade,

    /// Run one overdue auto-close pass
    Autoclose {
        /// Date to close against (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<Date>,
    },

    /// Print project statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_date_arg(raw: &str) -> Result<Date, String> {
    parse_deadline(raw).map_err(|e| e.to_string())
}

/// Both services over one storage backend.
#[derive(Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(storage: Arc<dyn ProjectStorage>, config: AppConfig) -> Self {
        Self {
            projects: ProjectService::new(storage.clone(), config),
            tasks: TaskService::new(storage, config),
        }
    }

    /// Services over a fresh [`InMemoryStorage`].
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Arc::new(InMemoryStorage::new()), config)
    }
}

/// Connect using `DB_*` / `DATABASE_URL` and verify the server answers.
pub async fn connect() -> anyhow::Result<DbPool> {
    let config = DatabaseConfig::from_env().context("invalid database configuration")?;
    tracing::debug!(host = %config.host, database = %config.name, "Connecting to database");

    let pool = todolist_db::create_pool(&config.database_url())
        .await
        .context("failed to connect to database")?;
    todolist_db::health_check(&pool)
        .await
        .context("database health check failed")?;
    Ok(pool)
}

/// Build services for `backend`.
///
/// The PostgreSQL backend applies pending migrations first, so a fresh
/// database is usable right away.
pub async fn open_services(backend: Backend) -> anyhow::Result<Services> {
    let config = AppConfig::from_env().context("invalid application configuration")?;

    let storage: Arc<dyn ProjectStorage> = match backend {
        Backend::Memory => Arc::new(InMemoryStorage::new()),
        Backend::Postgres => {
            let pool = connect().await?;
            todolist_db::run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            Arc::new(PgStorage::new(pool))
        }
    };

    tracing::info!(?backend, "Storage backend ready");
    Ok(Services::new(storage, config))
}

impl Cli {
    /// Run a one-shot subcommand, writing its report to `out`.
    pub async fn run_command<W: Write>(&self, command: &Commands, out: &mut W) -> anyhow::Result<()> {
        match command {
            Commands::DbCheck => {
                let pool = connect().await?;
                let info = todolist_db::connection_info(&pool).await?;
                writeln!(out, "Connected to database successfully.")?;
                writeln!(out, "Database: {} | User: {}", info.database, info.user_name)?;
            }
            Commands::DbUpgrade => {
                let pool = connect().await?;
                todolist_db::run_migrations(&pool)
                    .await
                    .context("failed to run database migrations")?;
                writeln!(out, "Database schema is up to date.")?;
            }
            Commands::Autoclose { today: day } => {
                let services = open_services(self.backend).await?;
                let day = day.unwrap_or_else(today);
                autoclose(&services, day, out).await?;
            }
            Commands::Stats { json } => {
                let services = open_services(self.backend).await?;
                let stats = services.projects.get_project_statistics().await?;
                if *json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
                } else {
                    console::write_statistics(out, &stats)?;
                }
            }
        }
        Ok(())
    }
}

/// One auto-close pass as of `day`, with a one-line summary.
pub async fn autoclose<W: Write>(services: &Services, day: Date, out: &mut W) -> anyhow::Result<usize> {
    let scheduler = AutocloseScheduler::new(services.tasks.clone(), DEFAULT_INTERVAL);
    let closed = scheduler.run_once(day).await?;
    console::write_autoclose_summary(out, closed, day)?;
    Ok(closed)
}
