//! Task row model.

use sqlx::FromRow;
use todolist_core::error::CoreError;
use todolist_core::task::Task;
use todolist_core::types::{Date, DbId};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub deadline: Option<Date>,
    pub created_at: Date,
    pub closed_at: Option<Date>,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            deadline: row.deadline,
            created_at: row.created_at,
            closed_at: row.closed_at,
        })
    }
}
