//! PostgreSQL-backed [`ProjectStorage`].
//!
//! Every call runs on its own pooled connection or transaction and commits
//! before returning. `save_project` replaces the stored task set wholesale
//! (delete, then re-insert) inside one transaction, so readers never observe
//! a half-written project.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use todolist_core::error::CoreError;
use todolist_core::project::Project;
use todolist_core::storage::ProjectStorage;
use todolist_core::task::Task;
use todolist_core::types::DbId;

use crate::error::map_sqlx_error;
use crate::models::task::TaskRow;
use crate::repositories::{ProjectRepo, TaskRepo};
use crate::DbPool;

/// Highest ids handed out by this process.
#[derive(Default)]
struct IssuedIds {
    project: DbId,
    task: DbId,
}

/// Durable storage over the `projects` and `tasks` tables.
pub struct PgStorage {
    pool: DbPool,
    issued: Mutex<IssuedIds>,
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            issued: Mutex::new(IssuedIds::default()),
        }
    }

    fn issued(&self) -> Result<MutexGuard<'_, IssuedIds>, CoreError> {
        self.issued
            .lock()
            .map_err(|_| CoreError::Internal("id watermark lock poisoned".into()))
    }

    /// Open a transaction that sees one consistent snapshot across queries.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(tx)
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>, CoreError> {
    rows.into_iter().map(Task::try_from).collect()
}

/// `max(stored) + 1`, but never at or below an id this process already issued.
fn next_id(stored_max: Option<DbId>, last_issued: &mut DbId) -> DbId {
    let id = (stored_max.unwrap_or(0) + 1).max(*last_issued + 1);
    *last_issued = id;
    id
}

#[async_trait]
impl ProjectStorage for PgStorage {
    async fn save_project(&self, project: &Project) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        ProjectRepo::upsert(&mut *tx, project)
            .await
            .map_err(map_sqlx_error)?;
        let removed = TaskRepo::delete_for_project(&mut *tx, project.id)
            .await
            .map_err(map_sqlx_error)?;
        for task in &project.tasks {
            TaskRepo::insert(&mut *tx, project.id, task)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        tracing::debug!(
            project_id = project.id,
            tasks_removed = removed,
            tasks_written = project.tasks.len(),
            "Project saved"
        );
        Ok(())
    }

    async fn get_project(&self, id: DbId) -> Result<Project, CoreError> {
        let mut tx = self.begin_snapshot().await?;

        let row = ProjectRepo::find_by_id(&mut *tx, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| CoreError::project_not_found(id))?;
        let task_rows = TaskRepo::list_for_project(&mut *tx, id)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into_project(into_tasks(task_rows)?))
    }

    async fn delete_project(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = ProjectRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(CoreError::project_not_found(id));
        }
        tracing::debug!(project_id = id, "Project row deleted with cascading tasks");
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let mut tx = self.begin_snapshot().await?;

        let rows = ProjectRepo::list(&mut *tx).await.map_err(map_sqlx_error)?;
        let task_rows = TaskRepo::list_all(&mut *tx).await.map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        let mut tasks_by_project: HashMap<DbId, Vec<Task>> = HashMap::new();
        for row in task_rows {
            let project_id = row.project_id;
            tasks_by_project
                .entry(project_id)
                .or_default()
                .push(Task::try_from(row)?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tasks = tasks_by_project.remove(&row.id).unwrap_or_default();
                row.into_project(tasks)
            })
            .collect())
    }

    async fn next_project_id(&self) -> Result<DbId, CoreError> {
        let stored = ProjectRepo::max_id(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let mut issued = self.issued()?;
        Ok(next_id(stored, &mut issued.project))
    }

    async fn next_task_id(&self) -> Result<DbId, CoreError> {
        let stored = TaskRepo::max_id(&self.pool).await.map_err(map_sqlx_error)?;
        let mut issued = self.issued()?;
        Ok(next_id(stored, &mut issued.task))
    }
}
