//! Task entity, status enum and update DTO.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, DbId};
use crate::validation::{validate_task_description, validate_task_title};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_TODO: &str = "todo";
pub const STATUS_DOING: &str = "doing";
pub const STATUS_DONE: &str = "done";

/// All valid task statuses, in workflow order.
pub const VALID_STATUSES: &[&str] = &[STATUS_TODO, STATUS_DOING, STATUS_DONE];

/// Workflow state of a task.
///
/// Any status may be set by hand; only the auto-close job stamps
/// `closed_at` when moving a task to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => STATUS_TODO,
            Self::Doing => STATUS_DOING,
            Self::Done => STATUS_DONE,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_TODO => Ok(Self::Todo),
            STATUS_DOING => Ok(Self::Doing),
            STATUS_DONE => Ok(Self::Done),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A unit of work owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: Option<Date>,
    pub created_at: Date,
    /// Set only by the auto-close job.
    pub closed_at: Option<Date>,
}

impl Task {
    /// Build a validated task.
    pub fn new(id: DbId, input: NewTask, created_at: Date) -> Result<Self, CoreError> {
        validate_task_title(&input.title)?;
        validate_task_description(&input.description)?;
        Ok(Self {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
            deadline: input.deadline,
            created_at,
            closed_at: None,
        })
    }

    /// Apply the provided fields of `update`.
    ///
    /// Every provided field is validated before any is written, so a failed
    /// update leaves the task untouched.
    pub fn update(&mut self, update: TaskUpdate) -> Result<(), CoreError> {
        if let Some(title) = &update.title {
            validate_task_title(title)?;
        }
        if let Some(description) = &update.description {
            validate_task_description(description)?;
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        Ok(())
    }

    /// True when the deadline lies strictly before `today` and the task is still open.
    pub fn is_overdue(&self, today: Date) -> bool {
        self.status != TaskStatus::Done && self.deadline.is_some_and(|d| d < today)
    }

    /// Mark the task done as of `today`.
    pub fn close(&mut self, today: Date) {
        self.status = TaskStatus::Done;
        self.closed_at = Some(today);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.id, self.title, self.status)?;
        if let Some(deadline) = self.deadline {
            write!(f, " | due {deadline}")?;
        }
        if let Some(closed_at) = self.closed_at {
            write!(f, " | closed {closed_at}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: Option<Date>,
}

impl NewTask {
    /// A `todo` task with no description and no deadline.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a task. `None` means "leave unchanged".
///
/// `deadline` is doubly optional: `Some(None)` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<Option<Date>>,
}

impl TaskUpdate {
    /// An update that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
