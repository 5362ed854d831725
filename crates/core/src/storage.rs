//! Persistence contract for projects and their tasks.
//!
//! Services only ever see `Arc<dyn ProjectStorage>`. Two backends implement
//! it: [`crate::memory::InMemoryStorage`] and the PostgreSQL-backed store in
//! `todolist-db`.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::project::Project;
use crate::types::DbId;

/// Storage backend for projects.
///
/// A project is always read and written as a whole, tasks included.
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    /// Insert or update a project by id.
    ///
    /// The stored task set is replaced by `project.tasks`: tasks missing from
    /// the argument are removed. Either every change lands or none does.
    async fn save_project(&self, project: &Project) -> Result<(), CoreError>;

    /// Load a project with all of its tasks.
    ///
    /// Fails with [`CoreError::NotFound`] for an unknown id.
    async fn get_project(&self, id: DbId) -> Result<Project, CoreError>;

    /// Delete a project and every task it owns as one operation.
    ///
    /// Fails with [`CoreError::NotFound`] for an unknown id.
    async fn delete_project(&self, id: DbId) -> Result<(), CoreError>;

    /// All projects, ascending by id.
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError>;

    /// Reserve a fresh project id.
    async fn next_project_id(&self) -> Result<DbId, CoreError>;

    /// Reserve a fresh task id.
    async fn next_task_id(&self) -> Result<DbId, CoreError>;
}
