//! Overdue task auto-close scheduler.
//!
//! [`AutocloseScheduler`] periodically closes every open task whose deadline
//! is strictly before the current local date. Each pass is idempotent, so a
//! missed or repeated tick is harmless.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use todolist_core::error::CoreError;
use todolist_core::service::TaskService;
use todolist_core::types::{today, Date};

/// Default time between passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Env var overriding [`DEFAULT_INTERVAL`], in whole seconds.
pub const INTERVAL_ENV: &str = "AUTOCLOSE_INTERVAL_SECS";

/// Read the pass interval from `AUTOCLOSE_INTERVAL_SECS`.
pub fn interval_from_env() -> Result<Duration, CoreError> {
    interval_from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`interval_from_env`] but reads the value through `lookup`.
pub fn interval_from_lookup<F>(lookup: F) -> Result<Duration, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(INTERVAL_ENV) else {
        return Ok(DEFAULT_INTERVAL);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(CoreError::Validation(format!(
            "{INTERVAL_ENV} must be a positive integer, got '{raw}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// AutocloseScheduler
// ---------------------------------------------------------------------------

/// Runs [`TaskService::autoclose_overdue_tasks`] on a fixed interval.
pub struct AutocloseScheduler {
    tasks: TaskService,
    interval: Duration,
}

impl AutocloseScheduler {
    pub fn new(tasks: TaskService, interval: Duration) -> Self {
        Self { tasks, interval }
    }

    /// Run a single pass as of `today` and log a one-line summary.
    pub async fn run_once(&self, today: Date) -> Result<usize, CoreError> {
        let closed = self.tasks.autoclose_overdue_tasks(today).await?;
        if closed > 0 {
            tracing::info!(closed, %today, "Auto-close: closed overdue tasks");
        } else {
            tracing::info!(%today, "Auto-close: no overdue tasks");
        }
        Ok(closed)
    }

    /// Run passes until `cancel` is triggered.
    ///
    /// The first pass runs immediately. A failed pass is logged and the loop
    /// carries on with the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Auto-close scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Auto-close scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_once(today()).await {
                        tracing::error!(error = %e, "Auto-close pass failed");
                    }
                }
            }
        }
    }
}
