//! Project row model.

use sqlx::FromRow;
use todolist_core::project::Project;
use todolist_core::task::Task;
use todolist_core::types::{Date, DbId};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Date,
}

impl ProjectRow {
    /// Attach already-loaded tasks to build the domain entity.
    pub fn into_project(self, tasks: Vec<Task>) -> Project {
        Project {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            tasks,
        }
    }
}
