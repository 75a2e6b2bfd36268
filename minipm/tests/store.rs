use minipm::messages::{Collection, WriteKind};
use minipm::{NewTask, Store, TaskPatch, TaskStatus};

async fn memory_store() -> Store {
    Store::builder("sqlite::memory:")
        .build()
        .await
        .expect("Failed to build store")
}

#[tokio::test]
async fn test_project_lifecycle_end_to_end() {
    let store = memory_store().await;

    // Create a project and a task in its todo column
    let project = store.add_project("Launch");
    let task = store.add_task(NewTask {
        project_id: project.id.clone(),
        title: "Design".into(),
        status: TaskStatus::Todo,
    });

    let stats = store.project_stats(&project.id);
    assert_eq!(stats.total, 1);
    assert_eq!(stats.todo, 1);
    assert_eq!(stats.completion_percent, 0);

    // Move it across the board
    assert!(store.set_task_status(&task.id, TaskStatus::InProgress));
    let stats = store.project_stats(&project.id);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.completion_percent, 0);

    assert!(store.set_task_status(&task.id, TaskStatus::Done));
    let stats = store.project_stats(&project.id);
    assert_eq!(stats.done, 1);
    assert_eq!(stats.completion_percent, 100);
}

#[tokio::test]
async fn test_update_task_merges_partial_fields() {
    let store = memory_store().await;
    let project = store.add_project("p");
    let task = store.add_task(NewTask {
        project_id: project.id.clone(),
        title: "Write report".into(),
        status: TaskStatus::Todo,
    });

    let patch = TaskPatch {
        description: Some("write it up".into()),
        estimated_hours: Some(4),
        ..Default::default()
    };
    assert!(store.update_task(&task.id, &patch));

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "write it up");
    assert_eq!(tasks[0].estimated_hours, 4);
    // Untouched fields survive the merge
    assert_eq!(tasks[0].title, "Write report");
    assert_eq!(tasks[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn test_update_missing_task_is_silent_noop() {
    let store = memory_store().await;
    let revision_before = store.revision();

    let patch = TaskPatch {
        title: Some("ghost".into()),
        ..Default::default()
    };
    assert!(!store.update_task("no-such-id", &patch));
    assert_eq!(store.revision(), revision_before);
}

#[tokio::test]
async fn test_delete_one_of_two_tasks() {
    let store = memory_store().await;
    let project = store.add_project("p");
    let keep = store.add_task(NewTask {
        project_id: project.id.clone(),
        title: "keep".into(),
        status: TaskStatus::Todo,
    });
    let drop = store.add_task(NewTask {
        project_id: project.id.clone(),
        title: "drop".into(),
        status: TaskStatus::Done,
    });

    store.delete_task(&drop.id);

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, keep.id);
}

#[tokio::test]
async fn test_delete_project_leaves_tasks_orphaned() {
    let store = memory_store().await;
    let project = store.add_project("p");
    store.add_task(NewTask {
        project_id: project.id.clone(),
        title: "t".into(),
        status: TaskStatus::Todo,
    });

    store.delete_project(&project.id);

    assert!(store.projects().is_empty());
    assert_eq!(store.tasks().len(), 1);
}

#[tokio::test]
async fn test_delete_project_with_tasks_cascades() {
    let store = memory_store().await;
    let doomed = store.add_project("doomed");
    let other = store.add_project("other");
    store.add_task(NewTask {
        project_id: doomed.id.clone(),
        title: "a".into(),
        status: TaskStatus::Todo,
    });
    store.add_task(NewTask {
        project_id: other.id.clone(),
        title: "b".into(),
        status: TaskStatus::Todo,
    });

    store.delete_project_with_tasks(&doomed.id);

    assert_eq!(store.projects().len(), 1);
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].project_id, other.id);
}

#[tokio::test]
async fn test_set_projects_round_trips_in_session() {
    use chrono::Utc;
    use minipm::Project;

    let store = memory_store().await;
    let now = Utc::now();
    let projects = vec![Project::new("One", now), Project::new("Two", now)];

    store.set_projects(projects.clone());
    assert_eq!(store.projects(), projects);
}

#[tokio::test]
async fn test_flush_then_reopen_preserves_data() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("minipm.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let (project_id, task_id);
    {
        let store = Store::builder(&url)
            .build()
            .await
            .expect("Failed to build store");
        let project = store.add_project("Persisted");
        let task = store.add_task(NewTask {
            project_id: project.id.clone(),
            title: "survives".into(),
            status: TaskStatus::InProgress,
        });
        store.set_dark_mode(true);
        store.flush().await.expect("Failed to flush");
        project_id = project.id;
        task_id = task.id;
    }

    // A fresh store against the same file hydrates the flushed state
    let reopened = Store::builder(&url)
        .build()
        .await
        .expect("Failed to reopen store");
    let projects = reopened.projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project_id);
    assert_eq!(projects[0].title, "Persisted");

    let tasks = reopened.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);

    assert!(reopened.dark_mode());
}

#[tokio::test]
async fn test_change_notifications_fire_per_mutation() {
    let store = memory_store().await;
    let mut rx = store.change_rx();

    let project = store.add_project("watched");
    store.toggle_dark_mode();

    let first = rx.recv().await.expect("Failed to receive notification");
    assert_eq!(first.collection, Collection::Projects);
    assert_eq!(first.kind, WriteKind::Insert);
    assert_eq!(first.id.as_deref(), Some(project.id.as_str()));

    let second = rx.recv().await.expect("Failed to receive notification");
    assert_eq!(second.collection, Collection::Settings);
    assert_eq!(second.kind, WriteKind::Update);
    assert_eq!(second.id, None);
}

#[tokio::test]
async fn test_clear_all_resets_cache_and_storage() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("minipm.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    {
        let store = Store::builder(&url)
            .build()
            .await
            .expect("Failed to build store");
        let project = store.add_project("gone");
        store.add_task(NewTask {
            project_id: project.id,
            title: "gone too".into(),
            status: TaskStatus::Todo,
        });
        store.set_dark_mode(true);

        store.clear_all().await.expect("Failed to clear");
        assert!(store.projects().is_empty());
        assert!(store.tasks().is_empty());
        assert!(!store.dark_mode());
    }

    // Nothing hydrates on reopen either
    let reopened = Store::builder(&url)
        .build()
        .await
        .expect("Failed to reopen store");
    assert!(reopened.projects().is_empty());
    assert!(reopened.tasks().is_empty());
    assert!(!reopened.dark_mode());
}

#[tokio::test]
async fn test_corrupt_stored_json_falls_back_to_empty() {
    use sea_orm::{ConnectionTrait, Database};

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("minipm.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    // Plant garbage under the projects key before the store first opens
    let db = Database::connect(url.as_str())
        .await
        .expect("Failed to connect");
    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS _minipm_store (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
    )
    .await
    .expect("Failed to create table");
    db.execute_unprepared("INSERT INTO _minipm_store (key, value) VALUES ('projects', '{oops')")
        .await
        .expect("Failed to plant bad data");
    drop(db);

    let store = Store::builder(&url)
        .build()
        .await
        .expect("Store should build despite corrupt data");
    assert!(store.projects().is_empty());
}
