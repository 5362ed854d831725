//! Row structs for the `projects` and `tasks` tables.
//!
//! Each submodule contains a `FromRow` struct matching the table columns and
//! the conversion into the corresponding `todolist_core` entity.

pub mod project;
pub mod task;
