//! Volatile in-process storage backend.
//!
//! Projects live in a `BTreeMap` keyed by id, so listing is naturally
//! ordered. Ids come from counters that never go backwards, so an id is not
//! reused after a delete. Everything is lost when the process exits.
//!
//! The map sits behind a mutex only to satisfy `Send + Sync`; the backend is
//! meant for a single interactive session, not for sharing with the
//! auto-close scheduler.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::project::Project;
use crate::storage::ProjectStorage;
use crate::types::DbId;

struct Inner {
    projects: BTreeMap<DbId, Project>,
    next_project_id: DbId,
    next_task_id: DbId,
}

/// In-memory [`ProjectStorage`].
pub struct InMemoryStorage {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                projects: BTreeMap::new(),
                next_project_id: 1,
                next_task_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Internal("in-memory storage lock poisoned".into()))
    }
}

#[async_trait]
impl ProjectStorage for InMemoryStorage {
    async fn save_project(&self, project: &Project) -> Result<(), CoreError> {
        let mut inner = self.lock()?;
        inner.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, id: DbId) -> Result<Project, CoreError> {
        self.lock()?
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::project_not_found(id))
    }

    async fn delete_project(&self, id: DbId) -> Result<(), CoreError> {
        // Tasks are stored inside the project, so they go with it.
        self.lock()?
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::project_not_found(id))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        Ok(self.lock()?.projects.values().cloned().collect())
    }

    async fn next_project_id(&self) -> Result<DbId, CoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_project_id;
        inner.next_project_id += 1;
        Ok(id)
    }

    async fn next_task_id(&self) -> Result<DbId, CoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_task_id;
        inner.next_task_id += 1;
        Ok(id)
    }
}
