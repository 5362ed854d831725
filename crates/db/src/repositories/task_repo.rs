//! Repository for the `tasks` table.

use sqlx::PgExecutor;
use todolist_core::task::Task;
use todolist_core::types::DbId;

use crate::models::task::TaskRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, title, description, status, deadline, created_at, closed_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert one task owned by `project_id`.
    pub async fn insert<'e, E>(executor: E, project_id: DbId, task: &Task) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO tasks
                (id, project_id, title, description, status, deadline, created_at, closed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(task.id)
        .bind(project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.deadline)
        .bind(task.created_at)
        .bind(task.closed_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Tasks of one project ordered by ID.
    pub async fn list_for_project<'e, E>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<TaskRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Every task ordered by owning project, then ID.
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<TaskRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM tasks ORDER BY project_id, id");
        sqlx::query_as::<_, TaskRow>(&query)
            .fetch_all(executor)
            .await
    }

    /// Remove every task of a project. Returns the number of rows removed.
    pub async fn delete_for_project<'e, E>(executor: E, project_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Highest task ID currently stored, if any.
    pub async fn max_id<'e, E>(executor: E) -> Result<Option<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<DbId>>("SELECT MAX(id) FROM tasks")
            .fetch_one(executor)
            .await
    }
}
