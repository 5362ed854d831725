//! Project service rules exercised against the in-memory backend:
//! - Creation echoes input and enforces the project limit
//! - Case-insensitive name uniqueness on create and update
//! - Cascade delete and NotFound handling
//! - Aggregate statistics

use std::sync::Arc;

use assert_matches::assert_matches;
use todolist_core::config::AppConfig;
use todolist_core::error::CoreError;
use todolist_core::memory::InMemoryStorage;
use todolist_core::service::{ProjectService, StatusCounts, TaskService};
use todolist_core::storage::ProjectStorage;
use todolist_core::task::{NewTask, TaskStatus};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn services(max_projects: usize, max_tasks: usize) -> (ProjectService, TaskService, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let config = AppConfig::new(max_projects, max_tasks).unwrap();
    let dyn_storage: Arc<dyn ProjectStorage> = storage.clone();
    (
        ProjectService::new(dyn_storage.clone(), config),
        TaskService::new(dyn_storage, config),
        storage,
    )
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_project_echoes_input() {
    let (projects, _, _) = services(5, 20);
    let name = "x".repeat(30);
    let description = "d".repeat(150);

    let project = projects.create_project(&name, &description).await.unwrap();
    assert_eq!(project.name, name);
    assert_eq!(project.description, description);
    assert!(project.tasks.is_empty());

    let stored = projects.get_project(project.id).await.unwrap();
    assert_eq!(stored, project);
}

#[tokio::test]
async fn create_project_rejects_invalid_input_without_writing() {
    let (projects, _, _) = services(5, 20);

    assert_matches!(
        projects.create_project("   ", "").await,
        Err(CoreError::Validation(_))
    );
    assert_matches!(
        projects.create_project("ok", &"d".repeat(151)).await,
        Err(CoreError::Validation(_))
    );
    assert!(projects.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_project_at_limit_fails_and_count_is_unchanged() {
    let (projects, _, _) = services(2, 20);
    projects.create_project("One", "").await.unwrap();
    projects.create_project("Two", "").await.unwrap();

    assert_matches!(
        projects.create_project("Three", "").await,
        Err(CoreError::LimitExceeded(_))
    );
    assert_eq!(projects.list_projects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_name_is_case_insensitive() {
    let (projects, _, _) = services(5, 20);
    projects.create_project("alpha", "").await.unwrap();

    assert_matches!(
        projects.create_project("Alpha", "").await,
        Err(CoreError::Duplicate(_))
    );
    assert_eq!(projects.list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn single_project_limit_frees_up_after_delete() {
    let (projects, _, _) = services(1, 20);

    let p1 = projects.create_project("P1", "").await.unwrap();
    assert_matches!(
        projects.create_project("P2", "").await,
        Err(CoreError::LimitExceeded(_))
    );

    projects.delete_project(p1.id).await.unwrap();
    let p2 = projects.create_project("P2", "").await.unwrap();
    assert_eq!(p2.name, "P2");
    assert!(p2.id > p1.id);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_project_changes_fields() {
    let (projects, _, _) = services(5, 20);
    let project = projects.create_project("Old", "before").await.unwrap();

    let updated = projects
        .update_project(project.id, "New", "after")
        .await
        .unwrap();
    assert_eq!(updated.name, "New");
    assert_eq!(updated.description, "after");
    assert_eq!(projects.get_project(project.id).await.unwrap().name, "New");
}

#[tokio::test]
async fn update_project_may_keep_its_own_name_in_other_case() {
    let (projects, _, _) = services(5, 20);
    let project = projects.create_project("Garden", "").await.unwrap();

    let updated = projects
        .update_project(project.id, "GARDEN", "shouting")
        .await
        .unwrap();
    assert_eq!(updated.name, "GARDEN");
}

#[tokio::test]
async fn update_project_rejects_name_of_another_project() {
    let (projects, _, _) = services(5, 20);
    projects.create_project("Work", "").await.unwrap();
    let home = projects.create_project("Home", "").await.unwrap();

    assert_matches!(
        projects.update_project(home.id, "work", "").await,
        Err(CoreError::Duplicate(_))
    );
    assert_eq!(projects.get_project(home.id).await.unwrap().name, "Home");
}

#[tokio::test]
async fn update_unknown_project_is_not_found() {
    let (projects, _, _) = services(5, 20);
    assert_matches!(
        projects.update_project(99, "Name", "").await,
        Err(CoreError::NotFound { entity: "Project", id: 99 })
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_project_cascades_to_tasks() {
    let (projects, tasks, storage) = services(5, 20);
    let project = projects.create_project("Doomed", "").await.unwrap();
    for i in 0..3 {
        tasks
            .create_task(project.id, NewTask::titled(format!("T{i}")))
            .await
            .unwrap();
    }

    projects.delete_project(project.id).await.unwrap();

    assert_matches!(
        projects.get_project(project.id).await,
        Err(CoreError::NotFound { .. })
    );
    let remaining_tasks: usize = storage
        .list_projects()
        .await
        .unwrap()
        .iter()
        .map(|p| p.task_count())
        .sum();
    assert_eq!(remaining_tasks, 0);
}

#[tokio::test]
async fn delete_unknown_project_is_not_found() {
    let (projects, _, _) = services(5, 20);
    assert_matches!(
        projects.delete_project(7).await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn statistics_aggregate_across_projects() {
    let (projects, tasks, _) = services(4, 10);
    let a = projects.create_project("A", "").await.unwrap();
    let b = projects.create_project("B", "").await.unwrap();
    projects.create_project("C", "").await.unwrap();

    tasks.create_task(a.id, NewTask::titled("a1")).await.unwrap();
    let a2 = tasks.create_task(a.id, NewTask::titled("a2")).await.unwrap();
    tasks
        .change_task_status(a.id, a2.id, TaskStatus::Doing)
        .await
        .unwrap();
    tasks
        .create_task(
            b.id,
            NewTask {
                status: TaskStatus::Done,
                ..NewTask::titled("b1")
            },
        )
        .await
        .unwrap();

    let stats = projects.get_project_statistics().await.unwrap();
    assert_eq!(stats.total_projects, 3);
    assert_eq!(stats.max_projects, 4);
    assert_eq!(stats.max_tasks_per_project, 10);
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(
        stats.tasks_by_status,
        StatusCounts {
            todo: 1,
            doing: 1,
            done: 1
        }
    );
}

#[tokio::test]
async fn statistics_on_empty_store() {
    let (projects, _, _) = services(5, 20);
    let stats = projects.get_project_statistics().await.unwrap();
    assert_eq!(stats.total_projects, 0);
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.tasks_by_status, StatusCounts::default());
}
