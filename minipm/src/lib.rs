//! # MiniPM
//!
//! Local-first project management core: projects, kanban tasks, and a
//! write-through persistent store backed by SQLite.
//!
//! A [`Store`] owns the in-memory state of both collections and a dark-mode
//! flag. Reads are synchronous against the in-memory cache; every mutation
//! updates the cache first and then hands the full collection snapshot to a
//! background writer that persists it fire-and-forget. Durable storage can
//! trail the cache by at most the write latency of the last save; callers
//! that need a durability barrier await [`Store::flush`].
//!
//! ## Quick start
//!
//! ```ignore
//! use minipm::{NewTask, StoreBuilder, TaskStatus};
//!
//! let store = StoreBuilder::new("sqlite://./minipm.db?mode=rwc")
//!     .build()
//!     .await?;
//!
//! let project = store.add_project("Launch");
//! let task = store.add_task(NewTask {
//!     project_id: project.id.clone(),
//!     title: "Design".into(),
//!     status: TaskStatus::Todo,
//! });
//!
//! store.set_task_status(&task.id, TaskStatus::Done);
//! assert_eq!(store.project_stats(&project.id).completion_percent, 100);
//! ```
//!
//! ## Key types
//!
//! - [`Store`] / [`StoreBuilder`] — write-through cache with an explicit
//!   `create → init → ready` lifecycle
//! - [`transitions`] — the pure state-transition functions the store runs
//! - [`ProjectStats`] — per-project kanban aggregates
//! - [`board::ColumnLayout`] — drag-gesture to column resolution
//! - [`Syncer`] — placeholder round-trip to a (future) remote service
//! - [`ChangeNotification`] — lightweight event emitted after every write

pub mod attachments;
pub mod board;
pub mod messages;
pub mod model;
pub mod reminders;
pub mod routes;
pub mod stats;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transitions;
mod writer;

pub use messages::{ChangeNotification, Collection, WriteKind};
pub use model::{NewTask, Project, Task, TaskPatch, TaskStatus};
pub use stats::ProjectStats;
pub use store::{Store, StoreBuilder, StoreError};
pub use sync::{SyncOutcome, SyncSnapshot, Syncer};
