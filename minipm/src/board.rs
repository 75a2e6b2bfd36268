//! Kanban board geometry and drag-to-column resolution.
//!
//! The board is three equal-width columns in a fixed left-to-right order
//! (todo, inProgress, done) separated by a gutter, with a leading margin
//! before the first column. A drag changes a task's status only — there is
//! no ordering within a column, so the vertical axis never matters.

use crate::model::{Task, TaskStatus};

pub const DEFAULT_LEADING: f32 = 8.0;
pub const DEFAULT_COLUMN_WIDTH: f32 = 280.0;
pub const DEFAULT_GUTTER: f32 = 16.0;

/// Horizontal geometry of the three columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub leading: f32,
    pub column_width: f32,
    pub gutter: f32,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            leading: DEFAULT_LEADING,
            column_width: DEFAULT_COLUMN_WIDTH,
            gutter: DEFAULT_GUTTER,
        }
    }
}

impl ColumnLayout {
    /// X coordinate of a column's left edge.
    pub fn column_origin(&self, status: TaskStatus) -> f32 {
        self.leading + (self.column_width + self.gutter) * status.column_index() as f32
    }

    /// The column whose horizontal span contains `x`: columns are checked
    /// left to right and the first whose right edge exceeds the point wins.
    /// A point past the last right edge lands in the last column.
    pub fn column_at(&self, x: f32) -> TaskStatus {
        for status in [TaskStatus::Todo, TaskStatus::InProgress] {
            if x < self.column_origin(status) + self.column_width {
                return status;
            }
        }
        TaskStatus::Done
    }

    /// Resolve a drag gesture's end: the dragged card's new center is its
    /// home column origin plus the horizontal displacement plus half a
    /// column width, and that point picks the target column.
    pub fn resolve_drop(&self, current: TaskStatus, translation_x: f32) -> TaskStatus {
        let center = self.column_origin(current) + translation_x + self.column_width / 2.0;
        self.column_at(center)
    }
}

/// Split tasks into the three column lists, preserving input order.
pub fn group_by_status(tasks: &[Task]) -> [Vec<Task>; 3] {
    let mut columns: [Vec<Task>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for task in tasks {
        columns[task.status.column_index()].push(task.clone());
    }
    columns
}
