//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that may run inside a transaction take any `PgExecutor`, so they
//! accept both `&PgPool` and `&mut *tx`.

pub mod project_repo;
pub mod task_repo;

pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
