//! Project entity: a named container that owns its tasks.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::task::{Task, TaskStatus};
use crate::types::{Date, DbId};
use crate::validation::{validate_project_description, validate_project_name};

/// A project and the tasks it owns, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Date,
    pub tasks: Vec<Task>,
}

impl Project {
    /// Build a validated project with no tasks.
    pub fn new(
        id: DbId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: Date,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let description = description.into();
        validate_project_name(&name)?;
        validate_project_description(&description)?;
        Ok(Self {
            id,
            name,
            description,
            created_at,
            tasks: Vec::new(),
        })
    }

    /// Replace name and description after validating both.
    pub fn rename(&mut self, name: String, description: String) -> Result<(), CoreError> {
        validate_project_name(&name)?;
        validate_project_description(&description)?;
        self.name = name;
        self.description = description;
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn get_task(&self, task_id: DbId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn get_task_mut(&mut self, task_id: DbId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Remove a task, returning it if it was present.
    pub fn remove_task(&mut self, task_id: DbId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    /// Tasks in insertion order, optionally restricted to one status.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect()
    }

    /// Case-insensitive title lookup, ignoring the task with id `except`.
    ///
    /// Linear scan; projects hold at most a few dozen tasks.
    pub fn has_task_titled(&self, title: &str, except: Option<DbId>) -> bool {
        let needle = title.to_lowercase();
        self.tasks
            .iter()
            .any(|t| Some(t.id) != except && t.title.to_lowercase() == needle)
    }

    /// Group tasks by status, keeping insertion order inside each group.
    pub fn tasks_by_status(&self) -> TasksByStatus<'_> {
        let mut grouped = TasksByStatus::default();
        for task in &self.tasks {
            grouped.bucket_mut(task.status).push(task);
        }
        grouped
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = self.tasks_by_status();
        write!(
            f,
            "[{}] {} - {} | todo: {}, doing: {}, done: {}",
            self.id,
            self.name,
            self.description,
            grouped.todo.len(),
            grouped.doing.len(),
            grouped.done.len()
        )
    }
}

/// Tasks of one project bucketed by status. Always has all three buckets.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct TasksByStatus<'a> {
    pub todo: Vec<&'a Task>,
    pub doing: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> TasksByStatus<'a> {
    pub fn get(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::Doing => &self.doing,
            TaskStatus::Done => &self.done,
        }
    }

    fn bucket_mut(&mut self, status: TaskStatus) -> &mut Vec<&'a Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::Doing => &mut self.doing,
            TaskStatus::Done => &mut self.done,
        }
    }

    /// Iterate `(status, tasks)` pairs in workflow order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}
