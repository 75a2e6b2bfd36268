//! Derived per-project view-models.
//!
//! [`ProjectStats::compute`] is pure and referentially transparent: identical
//! inputs always produce identical outputs. [`StatsHook`] layers the memoization
//! a UI binding would want on top, keyed by the store's revision counter so a
//! re-render between mutations costs one lock and no recount.

use std::sync::Mutex;

use crate::model::{Project, Task, TaskStatus};
use crate::store::Store;

/// Kanban aggregates for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    /// `round(done / total * 100)`; defined as 0 when the project has no
    /// tasks.
    pub completion_percent: u8,
}

impl ProjectStats {
    pub fn compute(tasks: &[Task], project_id: &str) -> Self {
        let mut stats = Self::default();
        for task in tasks.iter().filter(|t| t.project_id == project_id) {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
        }
        if stats.total > 0 {
            stats.completion_percent =
                ((stats.done as f64 / stats.total as f64) * 100.0).round() as u8;
        }
        stats
    }
}

/// Memoized stats over a [`Store`]: recomputes only when the store revision
/// or the requested project changes.
#[derive(Default)]
pub struct StatsHook {
    cached: Mutex<Option<(u64, String, ProjectStats)>>,
}

impl StatsHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, store: &Store, project_id: &str) -> ProjectStats {
        let revision = store.revision();
        let mut cached = self.cached.lock().unwrap();
        if let Some((rev, id, stats)) = cached.as_ref() {
            if *rev == revision && id == project_id {
                return *stats;
            }
        }
        let stats = ProjectStats::compute(&store.tasks(), project_id);
        *cached = Some((revision, project_id.to_string(), stats));
        stats
    }
}

/// Case-insensitive title search over the projects collection. An empty or
/// whitespace-only query matches everything.
pub fn filter_projects(projects: &[Project], query: &str) -> Vec<Project> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return projects.to_vec();
    }
    projects
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
