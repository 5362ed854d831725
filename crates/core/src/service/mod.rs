//! Business-rule layer over [`crate::storage::ProjectStorage`].
//!
//! Services enforce limits, uniqueness and validation before anything is
//! written. They return [`crate::error::CoreError`] unchanged to the caller
//! and never print.

pub mod project_service;
pub mod task_service;

pub use project_service::{ProjectService, ProjectStatistics, StatusCounts};
pub use task_service::TaskService;
