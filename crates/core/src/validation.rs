//! Field validation rules for projects and tasks.
//!
//! Pure functions, callable before any storage access. Lengths are counted in
//! characters, not bytes.

use crate::error::CoreError;
use crate::task::TaskStatus;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of a project name.
pub const MAX_PROJECT_NAME_LEN: usize = 30;

/// Maximum length of a project description.
pub const MAX_PROJECT_DESCRIPTION_LEN: usize = 150;

/// Maximum length of a task title.
pub const MAX_TASK_TITLE_LEN: usize = 30;

/// Maximum length of a task description.
pub const MAX_TASK_DESCRIPTION_LEN: usize = 150;

/// Accepted textual deadline format.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Project fields
// ---------------------------------------------------------------------------

/// Project names must be non-blank and at most [`MAX_PROJECT_NAME_LEN`] chars.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    validate_required("Project name", name, MAX_PROJECT_NAME_LEN)
}

pub fn validate_project_description(description: &str) -> Result<(), CoreError> {
    validate_max_len(
        "Project description",
        description,
        MAX_PROJECT_DESCRIPTION_LEN,
    )
}

// ---------------------------------------------------------------------------
// Task fields
// ---------------------------------------------------------------------------

/// Task titles must be non-blank and at most [`MAX_TASK_TITLE_LEN`] chars.
pub fn validate_task_title(title: &str) -> Result<(), CoreError> {
    validate_required("Task title", title, MAX_TASK_TITLE_LEN)
}

pub fn validate_task_description(description: &str) -> Result<(), CoreError> {
    validate_max_len("Task description", description, MAX_TASK_DESCRIPTION_LEN)
}

/// Parse a textual status (`todo`, `doing`, `done`).
pub fn parse_status(raw: &str) -> Result<TaskStatus, CoreError> {
    raw.trim().parse()
}

/// Parse a textual deadline in `YYYY-MM-DD` form.
pub fn parse_deadline(raw: &str) -> Result<Date, CoreError> {
    Date::parse_from_str(raw.trim(), DEADLINE_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid deadline '{raw}'. Expected a calendar date as YYYY-MM-DD"
        ))
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_required(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} cannot be empty")));
    }
    validate_max_len(field, value, max_len)
}

fn validate_max_len(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters, got {len}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
