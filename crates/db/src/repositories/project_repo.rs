//! Repository for the `projects` table.

use sqlx::PgExecutor;
use todolist_core::project::Project;
use todolist_core::types::DbId;

use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project or overwrite the scalar fields of an existing one.
    pub async fn upsert<'e, E>(executor: E, project: &Project) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO projects (id, name, description, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                created_at = EXCLUDED.created_at",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Find a project row by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all project rows ordered by ID.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<ProjectRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(executor)
            .await
    }

    /// Delete a project by ID; its tasks go with it via `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Highest project ID currently stored, if any.
    pub async fn max_id<'e, E>(executor: E) -> Result<Option<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<DbId>>("SELECT MAX(id) FROM projects")
            .fetch_one(executor)
            .await
    }
}
