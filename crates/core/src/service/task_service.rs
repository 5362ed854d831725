//! Task lifecycle inside a project, plus the overdue auto-close job.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::CoreError;
use crate::project::Project;
use crate::storage::ProjectStorage;
use crate::task::{NewTask, Task, TaskStatus, TaskUpdate};
use crate::types::{today, Date, DbId};
use crate::validation::{parse_status, validate_task_description, validate_task_title};

/// Orchestrates task operations. Every write persists the owning project.
#[derive(Clone)]
pub struct TaskService {
    storage: Arc<dyn ProjectStorage>,
    config: AppConfig,
}

impl TaskService {
    pub fn new(storage: Arc<dyn ProjectStorage>, config: AppConfig) -> Self {
        Self { storage, config }
    }

    /// Add a task to a project after validation, limit and duplicate checks.
    pub async fn create_task(&self, project_id: DbId, input: NewTask) -> Result<Task, CoreError> {
        let mut project = self.storage.get_project(project_id).await?;

        validate_task_title(&input.title)?;
        validate_task_description(&input.description)?;

        if project.task_count() >= self.config.max_tasks_per_project {
            return Err(CoreError::LimitExceeded(format!(
                "Cannot add more tasks. Maximum limit ({}) reached",
                self.config.max_tasks_per_project
            )));
        }
        if project.has_task_titled(&input.title, None) {
            return Err(CoreError::Duplicate(format!(
                "A task titled '{}' already exists in this project",
                input.title
            )));
        }

        let task_id = self.storage.next_task_id().await?;
        let task = Task::new(task_id, input, today())?;
        project.tasks.push(task.clone());
        self.storage.save_project(&project).await?;

        tracing::info!(project_id, task_id, title = %task.title, "Task created");
        Ok(task)
    }

    /// Apply the provided fields of `update` to one task.
    pub async fn update_task(
        &self,
        project_id: DbId,
        task_id: DbId,
        update: TaskUpdate,
    ) -> Result<Task, CoreError> {
        let mut project = self.storage.get_project(project_id).await?;
        if project.get_task(task_id).is_none() {
            return Err(CoreError::task_not_found(task_id));
        }

        if let Some(title) = &update.title {
            if project.has_task_titled(title, Some(task_id)) {
                return Err(CoreError::Duplicate(format!(
                    "Another task titled '{title}' already exists in this project"
                )));
            }
        }

        let task = project
            .get_task_mut(task_id)
            .ok_or_else(|| CoreError::task_not_found(task_id))?;
        task.update(update)?;
        let updated = task.clone();

        self.storage.save_project(&project).await?;

        tracing::debug!(project_id, task_id, status = %updated.status, "Task updated");
        Ok(updated)
    }

    /// Move a task to `status`. Any transition between the three values is allowed.
    pub async fn change_task_status(
        &self,
        project_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> Result<Task, CoreError> {
        self.update_task(project_id, task_id, TaskUpdate::status(status))
            .await
    }

    /// Same as [`TaskService::change_task_status`] for textual input.
    pub async fn change_task_status_str(
        &self,
        project_id: DbId,
        task_id: DbId,
        status: &str,
    ) -> Result<Task, CoreError> {
        let status = parse_status(status)?;
        self.change_task_status(project_id, task_id, status).await
    }

    pub async fn delete_task(&self, project_id: DbId, task_id: DbId) -> Result<(), CoreError> {
        let mut project = self.storage.get_project(project_id).await?;
        project
            .remove_task(task_id)
            .ok_or_else(|| CoreError::task_not_found(task_id))?;
        self.storage.save_project(&project).await?;

        tracing::info!(project_id, task_id, "Task deleted");
        Ok(())
    }

    pub async fn get_task(&self, project_id: DbId, task_id: DbId) -> Result<Task, CoreError> {
        let project = self.storage.get_project(project_id).await?;
        project
            .get_task(task_id)
            .cloned()
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    /// Tasks of a project in project order, optionally filtered by status.
    pub async fn list_tasks(
        &self,
        project_id: DbId,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, CoreError> {
        let project = self.storage.get_project(project_id).await?;
        Ok(project.list_tasks(status).into_iter().cloned().collect())
    }

    /// Like [`TaskService::list_tasks`] with a textual filter.
    ///
    /// A blank filter lists everything; an unknown status is a validation error.
    pub async fn list_tasks_by_name(
        &self,
        project_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Task>, CoreError> {
        let status = match status.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_status(raw)?),
        };
        self.list_tasks(project_id, status).await
    }

    /// Close every open task whose deadline is strictly before `today`.
    ///
    /// Closed tasks get status `done` and `closed_at = today`. Each project
    /// with at least one change is saved exactly once. Returns how many tasks
    /// were closed; a second call with the same `today` returns 0.
    ///
    /// A project that fails to save is logged and skipped; the pass carries
    /// on with the rest and counts only what was persisted. Only failing to
    /// list projects fails the pass.
    pub async fn autoclose_overdue_tasks(&self, today: Date) -> Result<usize, CoreError> {
        let projects = self.storage.list_projects().await?;
        let mut closed = 0;

        for mut project in projects {
            let changed = close_overdue(&mut project, today);
            if changed == 0 {
                continue;
            }
            if let Err(e) = self.storage.save_project(&project).await {
                tracing::warn!(
                    project_id = project.id,
                    error = %e,
                    "Failed to save project while closing overdue tasks"
                );
                continue;
            }
            tracing::debug!(project_id = project.id, closed = changed, "Closed overdue tasks");
            closed += changed;
        }

        Ok(closed)
    }
}

fn close_overdue(project: &mut Project, today: Date) -> usize {
    let mut changed = 0;
    for task in project.tasks.iter_mut().filter(|t| t.is_overdue(today)) {
        task.close(today);
        changed += 1;
    }
    changed
}
