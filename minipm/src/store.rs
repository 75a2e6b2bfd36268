//! The write-through persistent store.
//!
//! [`Store`] owns the in-memory copy of both collections and the dark-mode
//! flag. Reads are synchronous against that cache; every mutation runs the
//! matching pure transition, swaps the result into the cache, queues a
//! fire-and-forget durable write of the full collection snapshot, and
//! broadcasts a [`ChangeNotification`]. The cache is therefore
//! read-after-write consistent within a session even while durable storage
//! trails behind.
//!
//! A store is constructed through [`StoreBuilder`]; `build()` connects,
//! creates the internal table, hydrates the cache, and spawns the background
//! writer — the `create → init → ready` lifecycle is the builder consuming
//! itself, so there is no half-initialized state to guard against.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::messages::{ChangeNotification, Collection, WriteKind};
use crate::model::{NewTask, Project, Task, TaskPatch, TaskStatus};
use crate::stats::ProjectStats;
use crate::sync::SyncSnapshot;
use crate::writer::WriteQueue;
use crate::{storage, transitions};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("write queue is no longer running")]
    WriterClosed,
}

/// Builder for [`Store`].
pub struct StoreBuilder {
    database_url: String,
}

impl StoreBuilder {
    /// `database_url` is a SQLite URL, e.g. `sqlite://./minipm.db?mode=rwc`
    /// or `sqlite::memory:` for tests.
    pub fn new(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
        }
    }

    /// Connect, create the `_minipm_store` table, load the three keys into
    /// the cache, and spawn the background writer.
    ///
    /// Corrupt or missing stored data never fails the build: the affected
    /// key falls back to an empty collection / `false` and the problem is
    /// logged. Only connection and table creation errors surface.
    pub async fn build(self) -> Result<Store, StoreError> {
        let db = Database::connect(self.database_url.as_str()).await?;
        storage::create_store_table(&db).await?;

        let projects: Vec<Project> = load_or_default(&db, storage::PROJECTS_KEY).await;
        let tasks: Vec<Task> = load_or_default(&db, storage::TASKS_KEY).await;
        let dark_mode: bool = load_or_default(&db, storage::DARK_MODE_KEY).await;

        let writer = WriteQueue::spawn(db.clone());
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        log::debug!(
            "store ready: {} projects, {} tasks, dark_mode={dark_mode}",
            projects.len(),
            tasks.len(),
        );

        Ok(Store {
            db,
            cache: RwLock::new(CacheState {
                projects,
                tasks,
                dark_mode,
            }),
            writer,
            change_tx,
            revision: AtomicU64::new(0),
        })
    }
}

async fn load_or_default<T: DeserializeOwned + Default>(db: &DatabaseConnection, key: &str) -> T {
    match storage::load(db, key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::error!("corrupt {key} data, falling back to default: {e}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            log::error!("failed to read {key}, falling back to default: {e}");
            T::default()
        }
    }
}

struct CacheState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    dark_mode: bool,
}

/// Write-through cache over the durable key-value store.
pub struct Store {
    db: DatabaseConnection,
    cache: RwLock<CacheState>,
    writer: WriteQueue,
    change_tx: broadcast::Sender<ChangeNotification>,
    revision: AtomicU64,
}

impl Store {
    pub fn builder(database_url: &str) -> StoreBuilder {
        StoreBuilder::new(database_url)
    }

    // ---- synchronous reads -------------------------------------------------

    /// Current projects collection. Always reflects the most recent mutation
    /// in this session, regardless of durable-write progress.
    pub fn projects(&self) -> Vec<Project> {
        self.cache.read().unwrap().projects.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.cache.read().unwrap().tasks.clone()
    }

    pub fn dark_mode(&self) -> bool {
        self.cache.read().unwrap().dark_mode
    }

    /// Full snapshot of both collections, as handed to the sync layer.
    pub fn snapshot(&self) -> SyncSnapshot {
        let cache = self.cache.read().unwrap();
        SyncSnapshot {
            projects: cache.projects.clone(),
            tasks: cache.tasks.clone(),
        }
    }

    /// Monotone counter bumped on every mutation; memoization key for
    /// derived view-models (see [`StatsHook`](crate::stats::StatsHook)).
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Per-project kanban aggregates over the current task collection.
    pub fn project_stats(&self, project_id: &str) -> ProjectStats {
        ProjectStats::compute(&self.cache.read().unwrap().tasks, project_id)
    }

    /// Subscribe to change notifications. Subscribers that fall behind by
    /// more than the channel capacity see a `Lagged` error, not a crash.
    pub fn change_rx(&self) -> broadcast::Receiver<ChangeNotification> {
        self.change_tx.subscribe()
    }

    // ---- project mutations -------------------------------------------------

    /// Replace the whole projects collection (hydration path) and persist it
    /// back — an idempotent no-op in steady state.
    pub fn set_projects(&self, projects: Vec<Project>) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.projects = projects;
            self.persist_projects(&cache);
        }
        self.publish(Collection::Projects, WriteKind::Update, None);
    }

    pub fn add_project(&self, title: &str) -> Project {
        let created = {
            let mut cache = self.cache.write().unwrap();
            let (next, created) =
                transitions::add_project(std::mem::take(&mut cache.projects), title, Utc::now());
            cache.projects = next;
            self.persist_projects(&cache);
            created
        };
        self.publish(Collection::Projects, WriteKind::Insert, Some(created.id.clone()));
        created
    }

    /// Retitle a project. A missing id is a silent no-op: nothing is
    /// persisted and no notification fires. Returns whether a record changed.
    pub fn update_project(&self, id: &str, title: &str) -> bool {
        let found = {
            let mut cache = self.cache.write().unwrap();
            let (next, found) = transitions::update_project(
                std::mem::take(&mut cache.projects),
                id,
                title,
                Utc::now(),
            );
            cache.projects = next;
            if found {
                self.persist_projects(&cache);
            }
            found
        };
        if found {
            self.publish(Collection::Projects, WriteKind::Update, Some(id.to_string()));
        }
        found
    }

    /// Delete a project by id. Does **not** touch its tasks — they are left
    /// orphaned. Use [`delete_project_with_tasks`](Self::delete_project_with_tasks)
    /// when the tasks should go too.
    pub fn delete_project(&self, id: &str) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.projects = transitions::delete_project(std::mem::take(&mut cache.projects), id);
            self.persist_projects(&cache);
        }
        self.publish(Collection::Projects, WriteKind::Delete, Some(id.to_string()));
    }

    /// Delete a project and cascade to its tasks in one call. Two writes,
    /// one per key; the keyspace is partitioned so there is no cross-key
    /// atomicity to lose.
    pub fn delete_project_with_tasks(&self, id: &str) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.projects = transitions::delete_project(std::mem::take(&mut cache.projects), id);
            cache.tasks =
                transitions::delete_tasks_for_project(std::mem::take(&mut cache.tasks), id);
            self.persist_projects(&cache);
            self.persist_tasks(&cache);
        }
        self.publish(Collection::Projects, WriteKind::Delete, Some(id.to_string()));
        self.publish(Collection::Tasks, WriteKind::Delete, None);
    }

    // ---- task mutations ----------------------------------------------------

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.tasks = tasks;
            self.persist_tasks(&cache);
        }
        self.publish(Collection::Tasks, WriteKind::Update, None);
    }

    pub fn add_task(&self, new: NewTask) -> Task {
        let created = {
            let mut cache = self.cache.write().unwrap();
            let (next, created) =
                transitions::add_task(std::mem::take(&mut cache.tasks), new, Utc::now());
            cache.tasks = next;
            self.persist_tasks(&cache);
            created
        };
        self.publish(Collection::Tasks, WriteKind::Insert, Some(created.id.clone()));
        created
    }

    /// Merge a partial update into a task. Missing id: silent no-op.
    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> bool {
        let found = {
            let mut cache = self.cache.write().unwrap();
            let (next, found) =
                transitions::update_task(std::mem::take(&mut cache.tasks), id, patch, Utc::now());
            cache.tasks = next;
            if found {
                self.persist_tasks(&cache);
            }
            found
        };
        if found {
            self.publish(Collection::Tasks, WriteKind::Update, Some(id.to_string()));
        }
        found
    }

    /// The kanban move — a status-only update with no transition guard.
    pub fn set_task_status(&self, id: &str, status: TaskStatus) -> bool {
        let patch = TaskPatch {
            status: Some(status),
            ..Default::default()
        };
        self.update_task(id, &patch)
    }

    pub fn delete_task(&self, id: &str) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.tasks = transitions::delete_task(std::mem::take(&mut cache.tasks), id);
            self.persist_tasks(&cache);
        }
        self.publish(Collection::Tasks, WriteKind::Delete, Some(id.to_string()));
    }

    /// Cascade: remove every task owned by `project_id`.
    pub fn delete_tasks_for_project(&self, project_id: &str) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.tasks = transitions::delete_tasks_for_project(
                std::mem::take(&mut cache.tasks),
                project_id,
            );
            self.persist_tasks(&cache);
        }
        self.publish(Collection::Tasks, WriteKind::Delete, None);
    }

    // ---- settings ----------------------------------------------------------

    pub fn set_dark_mode(&self, dark: bool) {
        {
            let mut cache = self.cache.write().unwrap();
            cache.dark_mode = dark;
            self.persist_json(storage::DARK_MODE_KEY, &cache.dark_mode);
        }
        self.publish(Collection::Settings, WriteKind::Update, None);
    }

    /// Flip the flag, returning the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        let dark = {
            let mut cache = self.cache.write().unwrap();
            cache.dark_mode = !cache.dark_mode;
            self.persist_json(storage::DARK_MODE_KEY, &cache.dark_mode);
            cache.dark_mode
        };
        self.publish(Collection::Settings, WriteKind::Update, None);
        dark
    }

    // ---- awaited operations ------------------------------------------------

    /// Durability barrier: resolves once every previously queued write has
    /// been attempted against SQLite. Call before suspension or shutdown.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.writer.flush().await
    }

    /// Remove all three keys from durable storage and reset the cache.
    /// Unlike the write path this is awaited: pending writes are flushed
    /// first so a queued snapshot cannot land after the delete.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.writer.flush().await?;
        for key in storage::ALL_KEYS {
            storage::remove(&self.db, key).await?;
        }
        {
            let mut cache = self.cache.write().unwrap();
            cache.projects.clear();
            cache.tasks.clear();
            cache.dark_mode = false;
        }
        self.publish(Collection::Projects, WriteKind::Delete, None);
        self.publish(Collection::Tasks, WriteKind::Delete, None);
        self.publish(Collection::Settings, WriteKind::Delete, None);
        Ok(())
    }

    // ---- internals ---------------------------------------------------------

    fn persist_projects(&self, cache: &CacheState) {
        self.persist_json(storage::PROJECTS_KEY, &cache.projects);
    }

    fn persist_tasks(&self, cache: &CacheState) {
        self.persist_json(storage::TASKS_KEY, &cache.tasks);
    }

    /// Serialize and queue a full-snapshot write. Serialization failure is
    /// handled like any other write failure on this path: logged, dropped.
    fn persist_json<T: Serialize>(&self, key: &'static str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.writer.enqueue(key, json),
            Err(e) => log::error!("failed to serialize {key}: {e}"),
        }
    }

    fn publish(&self, collection: Collection, kind: WriteKind, id: Option<String>) {
        self.revision.fetch_add(1, Ordering::AcqRel);
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.change_tx.send(ChangeNotification {
            collection,
            kind,
            id,
        });
    }
}
