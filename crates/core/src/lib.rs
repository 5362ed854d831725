//! Domain model and business rules for the todolist workspace.
//!
//! No database access lives here: persistence goes through the
//! [`storage::ProjectStorage`] trait, implemented in-process by
//! [`memory::InMemoryStorage`] and durably by `todolist-db`.

pub mod config;
pub mod error;
pub mod memory;
pub mod project;
pub mod service;
pub mod storage;
pub mod task;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-util"))]
pub mod contract;
