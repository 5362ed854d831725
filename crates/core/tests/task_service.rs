//! Task service rules exercised against the in-memory backend.

use std::sync::Arc;

use assert_matches::assert_matches;
use todolist_core::config::AppConfig;
use todolist_core::error::CoreError;
use todolist_core::memory::InMemoryStorage;
use todolist_core::project::Project;
use todolist_core::service::{ProjectService, TaskService};
use todolist_core::storage::ProjectStorage;
use todolist_core::task::{NewTask, TaskStatus, TaskUpdate};
use todolist_core::types::{Date, DbId};

fn services(max_tasks: usize) -> (ProjectService, TaskService) {
    let storage: Arc<dyn ProjectStorage> = Arc::new(InMemoryStorage::new());
    let config = AppConfig::new(5, max_tasks).unwrap();
    (
        ProjectService::new(storage.clone(), config),
        TaskService::new(storage, config),
    )
}

async fn project(projects: &ProjectService, name: &str) -> Project {
    projects.create_project(name, "").await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_task_defaults_and_persists() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;

    let task = tasks.create_task(p.id, NewTask::titled("T1")).await.unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.deadline, None);
    assert_eq!(task.closed_at, None);

    let stored = projects.get_project(p.id).await.unwrap();
    assert_eq!(stored.tasks, vec![task]);
}

#[tokio::test]
async fn create_task_in_unknown_project_is_not_found() {
    let (_, tasks) = services(20);
    assert_matches!(
        tasks.create_task(3, NewTask::titled("T")).await,
        Err(CoreError::NotFound { entity: "Project", id: 3 })
    );
}

#[tokio::test]
async fn create_task_validates_fields() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;

    assert_matches!(
        tasks.create_task(p.id, NewTask::titled("")).await,
        Err(CoreError::Validation(_))
    );
    assert_matches!(
        tasks.create_task(p.id, NewTask::titled("x".repeat(31))).await,
        Err(CoreError::Validation(_))
    );
    let long_description = NewTask {
        description: "d".repeat(151),
        ..NewTask::titled("ok")
    };
    assert_matches!(
        tasks.create_task(p.id, long_description).await,
        Err(CoreError::Validation(_))
    );
    assert!(tasks.list_tasks(p.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn task_limit_then_duplicate() {
    let (projects, tasks) = services(1);
    let p = project(&projects, "P").await;

    tasks.create_task(p.id, NewTask::titled("T1")).await.unwrap();
    assert_matches!(
        tasks.create_task(p.id, NewTask::titled("T2")).await,
        Err(CoreError::LimitExceeded(_))
    );
    assert_eq!(tasks.list_tasks(p.id, None).await.unwrap().len(), 1);

    // With room to spare, a differently-cased title still clashes.
    let (projects, tasks) = services(2);
    let p = project(&projects, "P").await;
    tasks.create_task(p.id, NewTask::titled("T1")).await.unwrap();
    assert_matches!(
        tasks.create_task(p.id, NewTask::titled("t1")).await,
        Err(CoreError::Duplicate(_))
    );
}

#[tokio::test]
async fn same_title_allowed_in_different_projects() {
    let (projects, tasks) = services(20);
    let a = project(&projects, "A").await;
    let b = project(&projects, "B").await;

    tasks.create_task(a.id, NewTask::titled("Shared")).await.unwrap();
    tasks.create_task(b.id, NewTask::titled("shared")).await.unwrap();
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_only_update_preserves_other_fields() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let original = tasks
        .create_task(
            p.id,
            NewTask {
                title: "Report".into(),
                description: "numbers".into(),
                status: TaskStatus::Todo,
                deadline: Some(date(2025, 5, 1)),
            },
        )
        .await
        .unwrap();

    let updated = tasks
        .update_task(p.id, original.id, TaskUpdate::status(TaskStatus::Doing))
        .await
        .unwrap();

    assert_eq!(updated.status, TaskStatus::Doing);
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.deadline, original.deadline);
    assert_eq!(tasks.get_task(p.id, original.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_rejects_title_of_sibling_task() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    tasks.create_task(p.id, NewTask::titled("First")).await.unwrap();
    let second = tasks.create_task(p.id, NewTask::titled("Second")).await.unwrap();

    let rename = TaskUpdate {
        title: Some("FIRST".into()),
        ..TaskUpdate::default()
    };
    assert_matches!(
        tasks.update_task(p.id, second.id, rename).await,
        Err(CoreError::Duplicate(_))
    );

    // Re-casing its own title is fine.
    let recase = TaskUpdate {
        title: Some("SECOND".into()),
        ..TaskUpdate::default()
    };
    let updated = tasks.update_task(p.id, second.id, recase).await.unwrap();
    assert_eq!(updated.title, "SECOND");
}

#[tokio::test]
async fn invalid_update_leaves_stored_task_untouched() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let task = tasks.create_task(p.id, NewTask::titled("Keep")).await.unwrap();

    let update = TaskUpdate {
        title: Some("Changed".into()),
        description: Some("d".repeat(151)),
        status: Some(TaskStatus::Done),
        deadline: None,
    };
    assert_matches!(
        tasks.update_task(p.id, task.id, update).await,
        Err(CoreError::Validation(_))
    );
    assert_eq!(tasks.get_task(p.id, task.id).await.unwrap(), task);
}

#[tokio::test]
async fn update_unknown_task_is_not_found() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    assert_matches!(
        tasks
            .update_task(p.id, 404, TaskUpdate::status(TaskStatus::Done))
            .await,
        Err(CoreError::NotFound { entity: "Task", id: 404 })
    );
}

#[tokio::test]
async fn change_status_allows_any_transition() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let task = tasks.create_task(p.id, NewTask::titled("T")).await.unwrap();

    for status in [TaskStatus::Done, TaskStatus::Todo, TaskStatus::Doing] {
        let updated = tasks.change_task_status(p.id, task.id, status).await.unwrap();
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
async fn change_status_from_text_validates() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let task = tasks.create_task(p.id, NewTask::titled("T")).await.unwrap();

    assert_matches!(
        tasks.change_task_status_str(p.id, task.id, "finished").await,
        Err(CoreError::Validation(_))
    );
    let updated = tasks
        .change_task_status_str(p.id, task.id, "done")
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
}

// ---------------------------------------------------------------------------
// Delete and list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_task_removes_only_that_task() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let a = tasks.create_task(p.id, NewTask::titled("A")).await.unwrap();
    let b = tasks.create_task(p.id, NewTask::titled("B")).await.unwrap();

    tasks.delete_task(p.id, a.id).await.unwrap();

    let remaining: Vec<DbId> = tasks
        .list_tasks(p.id, None)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(remaining, vec![b.id]);
    assert_matches!(
        tasks.delete_task(p.id, a.id).await,
        Err(CoreError::NotFound { entity: "Task", .. })
    );
    assert_matches!(
        tasks.get_task(p.id, a.id).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn list_tasks_filters_in_project_order() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    let mut todo_ids = Vec::new();
    for (title, status) in [
        ("one", TaskStatus::Todo),
        ("two", TaskStatus::Done),
        ("three", TaskStatus::Todo),
        ("four", TaskStatus::Doing),
    ] {
        let task = tasks
            .create_task(
                p.id,
                NewTask {
                    status,
                    ..NewTask::titled(title)
                },
            )
            .await
            .unwrap();
        if status == TaskStatus::Todo {
            todo_ids.push(task.id);
        }
    }

    let todo: Vec<DbId> = tasks
        .list_tasks(p.id, Some(TaskStatus::Todo))
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(todo, todo_ids);
    assert_eq!(tasks.list_tasks(p.id, None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn textual_filter_is_validated() {
    let (projects, tasks) = services(20);
    let p = project(&projects, "P").await;
    tasks.create_task(p.id, NewTask::titled("T")).await.unwrap();

    assert_matches!(
        tasks.list_tasks_by_name(p.id, Some("later")).await,
        Err(CoreError::Validation(_))
    );
    assert_eq!(tasks.list_tasks_by_name(p.id, Some("")).await.unwrap().len(), 1);
    assert_eq!(tasks.list_tasks_by_name(p.id, None).await.unwrap().len(), 1);
    assert!(tasks
        .list_tasks_by_name(p.id, Some("done"))
        .await
        .unwrap()
        .is_empty());
}
