//! Project lifecycle: creation limits, name uniqueness, cascade delete and
//! aggregate statistics.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::CoreError;
use crate::project::Project;
use crate::storage::ProjectStorage;
use crate::task::TaskStatus;
use crate::types::{today, DbId};
use crate::validation::{validate_project_description, validate_project_name};

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
}

impl StatusCounts {
    fn add(&mut self, status: TaskStatus, n: usize) {
        match status {
            TaskStatus::Todo => self.todo += n,
            TaskStatus::Doing => self.doing += n,
            TaskStatus::Done => self.done += n,
        }
    }
}

/// Aggregate figures over every stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatistics {
    pub total_projects: usize,
    pub max_projects: usize,
    pub max_tasks_per_project: usize,
    pub total_tasks: usize,
    pub tasks_by_status: StatusCounts,
}

/// Orchestrates project create/update/delete against a storage backend.
#[derive(Clone)]
pub struct ProjectService {
    storage: Arc<dyn ProjectStorage>,
    config: AppConfig,
}

impl ProjectService {
    pub fn new(storage: Arc<dyn ProjectStorage>, config: AppConfig) -> Self {
        Self { storage, config }
    }

    /// Create a project after validation, limit and duplicate checks.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Project, CoreError> {
        validate_project_name(name)?;
        validate_project_description(description)?;

        let existing = self.storage.list_projects().await?;
        if existing.len() >= self.config.max_projects {
            return Err(CoreError::LimitExceeded(format!(
                "Cannot create more projects. Maximum limit ({}) reached",
                self.config.max_projects
            )));
        }
        if name_taken(&existing, name, None) {
            return Err(CoreError::Duplicate(format!(
                "A project named '{name}' already exists"
            )));
        }

        let id = self.storage.next_project_id().await?;
        let project = Project::new(id, name, description, today())?;
        self.storage.save_project(&project).await?;

        tracing::info!(project_id = id, name, "Project created");
        Ok(project)
    }

    /// Replace a project's name and description.
    pub async fn update_project(
        &self,
        id: DbId,
        name: &str,
        description: &str,
    ) -> Result<Project, CoreError> {
        let mut project = self.storage.get_project(id).await?;

        validate_project_name(name)?;
        validate_project_description(description)?;

        let existing = self.storage.list_projects().await?;
        if name_taken(&existing, name, Some(id)) {
            return Err(CoreError::Duplicate(format!(
                "Another project named '{name}' already exists"
            )));
        }

        project.rename(name.to_string(), description.to_string())?;
        self.storage.save_project(&project).await?;

        tracing::info!(project_id = id, name, "Project updated");
        Ok(project)
    }

    /// Delete a project together with all of its tasks.
    pub async fn delete_project(&self, id: DbId) -> Result<(), CoreError> {
        let project = self.storage.get_project(id).await?;
        self.storage.delete_project(id).await?;

        tracing::info!(
            project_id = id,
            task_count = project.task_count(),
            "Project deleted"
        );
        Ok(())
    }

    pub async fn get_project(&self, id: DbId) -> Result<Project, CoreError> {
        self.storage.get_project(id).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        self.storage.list_projects().await
    }

    /// Totals across all projects plus the configured limits.
    pub async fn get_project_statistics(&self) -> Result<ProjectStatistics, CoreError> {
        let projects = self.storage.list_projects().await?;

        let mut tasks_by_status = StatusCounts::default();
        for project in &projects {
            for (status, tasks) in project.tasks_by_status().iter() {
                tasks_by_status.add(status, tasks.len());
            }
        }

        Ok(ProjectStatistics {
            total_projects: projects.len(),
            max_projects: self.config.max_projects,
            max_tasks_per_project: self.config.max_tasks_per_project,
            total_tasks: projects.iter().map(Project::task_count).sum(),
            tasks_by_status,
        })
    }
}

/// Case-insensitive name match, skipping the project with id `except`.
///
/// Linear scan; the project count is capped at a handful.
fn name_taken(projects: &[Project], name: &str, except: Option<DbId>) -> bool {
    let needle = name.to_lowercase();
    projects
        .iter()
        .any(|p| Some(p.id) != except && p.name.to_lowercase() == needle)
}
