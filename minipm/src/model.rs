//! Domain records: projects and their kanban tasks.
//!
//! Both record types are plain serde structs with string uuid ids and UTC
//! timestamps. Field names serialize in camelCase so the stored JSON matches
//! the shape the mobile client has always written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a task — the three kanban columns, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// All statuses in left-to-right board order.
    pub const COLUMNS: [TaskStatus; 3] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    /// Zero-based column index on the board.
    pub fn column_index(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inProgress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque unique identifier, assigned on creation, never changed.
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation of this record.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Owning project. Tasks never move between projects.
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub assigned_user: String,
    pub estimated_hours: u32,
    pub status: TaskStatus,
    /// Reference to a cached attachment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from creation parameters; everything not in [`NewTask`]
    /// takes its documented default (empty text, due now, zero hours).
    pub fn new(new: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: new.project_id,
            title: new.title,
            description: String::new(),
            due_date: now,
            assigned_user: String::new(),
            estimated_hours: 0,
            status: new.status,
            image_uri: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parameters for creating a task; the rest of the record is defaulted.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub status: TaskStatus,
}

/// A partial update over a [`Task`]. `None` fields are left untouched;
/// `image_uri` is doubly optional so the attachment can be cleared.
/// There is no `project_id` field — tasks are never reassigned.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_user: Option<String>,
    pub estimated_hours: Option<u32>,
    pub status: Option<TaskStatus>,
    pub image_uri: Option<Option<String>>,
}

impl TaskPatch {
    /// Shallow-merge the supplied fields over `task`. Does not touch
    /// `updated_at`; the transition layer owns timestamp refresh.
    pub fn merge_into(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assigned_user) = &self.assigned_user {
            task.assigned_user = assigned_user.clone();
        }
        if let Some(estimated_hours) = self.estimated_hours {
            task.estimated_hours = estimated_hours;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(image_uri) = &self.image_uri {
            task.image_uri = image_uri.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_with_original_spelling() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"inProgress\"");
        let back: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(back, TaskStatus::Done);
    }

    #[test]
    fn test_task_json_uses_camel_case_fields() {
        let now = Utc::now();
        let task = Task::new(
            NewTask {
                project_id: "p1".into(),
                title: "Design".into(),
                status: TaskStatus::Todo,
            },
            now,
        );
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"projectId\""));
        assert!(json.contains("\"dueDate\""));
        assert!(json.contains("\"estimatedHours\":0"));
        // No attachment yet, so the field is absent entirely.
        assert!(!json.contains("imageUri"));
    }

    #[test]
    fn test_patch_clears_image_uri() {
        let now = Utc::now();
        let mut task = Task::new(
            NewTask {
                project_id: "p1".into(),
                title: "t".into(),
                status: TaskStatus::Todo,
            },
            now,
        );
        task.image_uri = Some("file:///a.png".into());

        let patch = TaskPatch {
            image_uri: Some(None),
            ..Default::default()
        };
        patch.merge_into(&mut task);
        assert_eq!(task.image_uri, None);
    }
}
