//! Behaviour every [`ProjectStorage`] backend must share.
//!
//! Each check takes an empty backend and panics on violation, so backend
//! crates can call them from their own `#[tokio::test]` / `#[sqlx::test]`
//! functions. Enabled for other crates through the `test-util` feature.

use crate::error::CoreError;
use crate::project::Project;
use crate::storage::ProjectStorage;
use crate::task::{NewTask, Task, TaskStatus};
use crate::types::{Date, DbId};

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).expect("valid test date")
}

async fn new_task(storage: &dyn ProjectStorage, input: NewTask) -> Task {
    let id = storage.next_task_id().await.expect("next task id");
    Task::new(id, input, date(2025, 1, 1)).expect("valid task")
}

async fn project_with_tasks(storage: &dyn ProjectStorage, name: &str, count: usize) -> Project {
    let id = storage.next_project_id().await.expect("next project id");
    let mut project = Project::new(id, name, "contract fixture", date(2025, 1, 1))
        .expect("valid project");
    for i in 0..count {
        let task = new_task(storage, NewTask::titled(format!("{name} task {i}"))).await;
        project.tasks.push(task);
    }
    project
}

/// A project with three varied tasks reads back field-for-field.
pub async fn round_trip_preserves_tasks(storage: &dyn ProjectStorage) {
    let id = storage.next_project_id().await.expect("next project id");
    let mut project =
        Project::new(id, "Round trip", "three tasks", date(2025, 2, 1)).expect("valid project");

    project.tasks.push(
        new_task(
            storage,
            NewTask {
                title: "Plain".into(),
                ..NewTask::default()
            },
        )
        .await,
    );
    project.tasks.push(
        new_task(
            storage,
            NewTask {
                title: "With deadline".into(),
                description: "due soon".into(),
                status: TaskStatus::Doing,
                deadline: Some(date(2025, 3, 1)),
            },
        )
        .await,
    );
    let mut closed = new_task(
        storage,
        NewTask {
            title: "Closed".into(),
            deadline: Some(date(2025, 1, 15)),
            ..NewTask::default()
        },
    )
    .await;
    closed.close(date(2025, 1, 20));
    project.tasks.push(closed);

    storage.save_project(&project).await.expect("save project");
    let loaded = storage.get_project(id).await.expect("load project");

    assert_eq!(loaded, project);
}

/// Saving a project drops stored tasks that are no longer in it.
pub async fn save_replaces_task_set(storage: &dyn ProjectStorage) {
    let mut project = project_with_tasks(storage, "Replace", 3).await;
    storage.save_project(&project).await.expect("first save");

    let removed = project.tasks.remove(1);
    project.tasks[0].title = "Renamed".into();
    storage.save_project(&project).await.expect("second save");

    let loaded = storage.get_project(project.id).await.expect("load project");
    assert_eq!(loaded.task_count(), 2);
    assert!(loaded.get_task(removed.id).is_none());
    assert_eq!(loaded.tasks[0].title, "Renamed");
}

/// Deleting a project removes every owned task with it.
pub async fn delete_cascades_to_tasks(storage: &dyn ProjectStorage) {
    let doomed = project_with_tasks(storage, "Doomed", 4).await;
    let survivor = project_with_tasks(storage, "Survivor", 1).await;
    storage.save_project(&doomed).await.expect("save doomed");
    storage.save_project(&survivor).await.expect("save survivor");

    storage.delete_project(doomed.id).await.expect("delete project");

    match storage.get_project(doomed.id).await {
        Err(CoreError::NotFound { id, .. }) => assert_eq!(id, doomed.id),
        other => panic!("expected NotFound after delete, got {other:?}"),
    }

    let remaining = storage.list_projects().await.expect("list projects");
    let remaining_tasks: usize = remaining.iter().map(Project::task_count).sum();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining_tasks, 1);

    // The orphaned task ids must be free again at the storage level.
    let id = storage.next_project_id().await.expect("next project id");
    let mut reuse = Project::new(id, "Reuse", "", date(2025, 1, 1)).expect("valid project");
    reuse.tasks = doomed.tasks.clone();
    storage
        .save_project(&reuse)
        .await
        .expect("task ids of a deleted project are no longer stored");

    match storage.delete_project(doomed.id).await {
        Err(CoreError::NotFound { .. }) => {}
        other => panic!("expected NotFound on second delete, got {other:?}"),
    }
}

/// `list_projects` is ascending by id regardless of save order.
pub async fn list_is_ordered_by_id(storage: &dyn ProjectStorage) {
    let mut ids: Vec<DbId> = Vec::new();
    let mut projects = Vec::new();
    for name in ["First", "Second", "Third"] {
        let project = project_with_tasks(storage, name, 0).await;
        ids.push(project.id);
        projects.push(project);
    }
    for project in projects.iter().rev() {
        storage.save_project(project).await.expect("save project");
    }

    let listed: Vec<DbId> = storage
        .list_projects()
        .await
        .expect("list projects")
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(listed, ids);
}
