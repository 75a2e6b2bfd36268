//! Pure state transitions over the two collections.
//!
//! Each function takes the current collection by value and returns the next
//! one; none of them touch storage. The store layer decides when a result is
//! persisted, which keeps these trivially unit-testable. Functions that
//! locate a record by id report whether anything changed so the caller can
//! skip the write on a miss — updating a missing id is defined as a silent
//! no-op, not an error.
//!
//! `now` is always injected rather than read from the clock, so tests control
//! every timestamp.

use chrono::{DateTime, Utc};

use crate::model::{NewTask, Project, Task, TaskPatch, TaskStatus};

/// Append a freshly-created project.
pub fn add_project(
    mut projects: Vec<Project>,
    title: impl Into<String>,
    now: DateTime<Utc>,
) -> (Vec<Project>, Project) {
    let project = Project::new(title, now);
    projects.push(project.clone());
    (projects, project)
}

/// Retitle a project by id. Returns `false` (and the collection unchanged)
/// when the id is not present.
pub fn update_project(
    mut projects: Vec<Project>,
    id: &str,
    title: &str,
    now: DateTime<Utc>,
) -> (Vec<Project>, bool) {
    let found = match projects.iter_mut().find(|p| p.id == id) {
        Some(project) => {
            project.title = title.to_string();
            project.updated_at = now;
            true
        }
        None => false,
    };
    (projects, found)
}

/// Remove every project with the given id. Idempotent.
pub fn delete_project(projects: Vec<Project>, id: &str) -> Vec<Project> {
    projects.into_iter().filter(|p| p.id != id).collect()
}

/// Append a freshly-created task.
pub fn add_task(mut tasks: Vec<Task>, new: NewTask, now: DateTime<Utc>) -> (Vec<Task>, Task) {
    let task = Task::new(new, now);
    tasks.push(task.clone());
    (tasks, task)
}

/// Merge a partial update over the task with the given id, refreshing its
/// `updated_at`. Returns `false` when the id is not present.
pub fn update_task(
    mut tasks: Vec<Task>,
    id: &str,
    patch: &TaskPatch,
    now: DateTime<Utc>,
) -> (Vec<Task>, bool) {
    let found = match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            patch.merge_into(task);
            task.updated_at = now;
            true
        }
        None => false,
    };
    (tasks, found)
}

/// The kanban move: a status-only update. Carries no transition guard —
/// any status may follow any other.
pub fn set_task_status(
    tasks: Vec<Task>,
    id: &str,
    status: TaskStatus,
    now: DateTime<Utc>,
) -> (Vec<Task>, bool) {
    let patch = TaskPatch {
        status: Some(status),
        ..Default::default()
    };
    update_task(tasks, id, &patch, now)
}

/// Remove every task with the given id. Idempotent.
pub fn delete_task(tasks: Vec<Task>, id: &str) -> Vec<Task> {
    tasks.into_iter().filter(|t| t.id != id).collect()
}

/// Cascade: remove every task owned by the given project. Not invoked
/// automatically by [`delete_project`] — callers compose the two (the store
/// exposes both the composite and the orphaning variant).
pub fn delete_tasks_for_project(tasks: Vec<Task>, project_id: &str) -> Vec<Task> {
    tasks.into_iter().filter(|t| t.project_id != project_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixture() -> (Vec<Task>, Task, Task, DateTime<Utc>) {
        let t0 = Utc::now();
        let (tasks, a) = add_task(
            Vec::new(),
            NewTask {
                project_id: "p1".into(),
                title: "Design".into(),
                status: TaskStatus::Todo,
            },
            t0,
        );
        let (tasks, b) = add_task(
            tasks,
            NewTask {
                project_id: "p2".into(),
                title: "Ship".into(),
                status: TaskStatus::InProgress,
            },
            t0,
        );
        (tasks, a, b, t0)
    }

    #[test]
    fn test_update_missing_id_is_a_noop() {
        let (tasks, ..) = fixture();
        let before = tasks.clone();
        let patch = TaskPatch {
            title: Some("changed".into()),
            ..Default::default()
        };
        let (after, found) = update_task(tasks, "no-such-id", &patch, Utc::now());
        assert!(!found);
        assert_eq!(after, before);
    }

    #[test]
    fn test_update_merges_fields_and_bumps_updated_at() {
        let (tasks, a, _, t0) = fixture();
        let t1 = t0 + Duration::seconds(5);
        let patch = TaskPatch {
            description: Some("notes".into()),
            estimated_hours: Some(3),
            ..Default::default()
        };
        let (after, found) = update_task(tasks, &a.id, &patch, t1);
        assert!(found);
        assert_eq!(after.len(), 2);

        let updated = after.iter().find(|t| t.id == a.id).unwrap();
        assert_eq!(updated.description, "notes");
        assert_eq!(updated.estimated_hours, 3);
        // Untouched fields survive the merge.
        assert_eq!(updated.title, "Design");
        assert!(updated.updated_at > a.updated_at);
    }

    #[test]
    fn test_status_move_needs_no_prior_state() {
        let (tasks, a, _, t0) = fixture();
        // todo -> done directly, skipping inProgress: legal.
        let (after, found) = set_task_status(tasks, &a.id, TaskStatus::Done, t0);
        assert!(found);
        let moved = after.iter().find(|t| t.id == a.id).unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        // And straight back again.
        let (after, _) = set_task_status(after, &a.id, TaskStatus::Todo, t0);
        assert_eq!(
            after.iter().find(|t| t.id == a.id).unwrap().status,
            TaskStatus::Todo
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (tasks, a, b, _) = fixture();
        let once = delete_task(tasks, &a.id);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].id, b.id);
        let twice = delete_task(once.clone(), &a.id);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_cascade_removes_only_owned_tasks() {
        let (tasks, _, b, _) = fixture();
        let after = delete_tasks_for_project(tasks, "p1");
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, b.id);
    }

    #[test]
    fn test_project_update_refreshes_timestamp() {
        let t0 = Utc::now();
        let (projects, p) = add_project(Vec::new(), "Launch", t0);
        let t1 = t0 + Duration::milliseconds(1);
        let (projects, found) = update_project(projects, &p.id, "Launch v2", t1);
        assert!(found);
        assert_eq!(projects[0].title, "Launch v2");
        assert!(projects[0].updated_at > p.updated_at);
        assert_eq!(projects[0].created_at, p.created_at);
    }
}
