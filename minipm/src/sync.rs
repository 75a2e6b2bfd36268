//! Placeholder sync round-trip.
//!
//! There is no remote service yet: [`fake_sync_server`] echoes its input
//! after an artificial delay. What matters is the slot this module occupies —
//! [`Syncer`] defines the call shape (full snapshot in, snapshot out, one
//! in-flight at a time, failures logged and swallowed) that a real transport
//! would fill in later.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::model::{Project, Task};
use crate::store::Store;

/// Artificial round-trip latency of the stub server.
pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(1500);

/// The full state handed to (and returned by) a sync round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSnapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Error)]
#[error("sync failed: {0}")]
pub struct SyncError(pub String);

/// Simulated remote: waits out the delay, then returns the snapshot
/// unchanged. No transmission, no diffing, no conflict resolution.
pub async fn fake_sync_server(
    snapshot: SyncSnapshot,
    delay: Duration,
) -> Result<SyncSnapshot, SyncError> {
    tokio::time::sleep(delay).await;
    Ok(snapshot)
}

/// What a [`Syncer::perform`] call resulted in.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Completed(SyncSnapshot),
    /// Another sync was already running; this call did nothing.
    AlreadyInFlight,
    /// The round-trip failed; the error was logged, nothing is retried.
    Failed,
}

/// Serializes sync attempts with an advisory in-flight flag.
///
/// The flag is a boolean, not a lock: it short-circuits the normal call path
/// but a caller that bypasses this type could still invoke
/// [`fake_sync_server`] concurrently. No queue, no retry, no backoff.
pub struct Syncer {
    in_flight: AtomicBool,
    delay: Duration,
}

impl Default for Syncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Syncer {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_SYNC_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            delay,
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot the store and round-trip it through the stub. Returns
    /// [`SyncOutcome::AlreadyInFlight`] without doing anything when a sync
    /// is still running. Errors never propagate: they are logged and the
    /// in-flight flag is cleared.
    pub async fn perform(&self, store: &Store) -> SyncOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::debug!("sync already in flight, skipping");
            return SyncOutcome::AlreadyInFlight;
        }

        let snapshot = store.snapshot();
        let result = fake_sync_server(snapshot, self.delay).await;
        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(snapshot) => {
                log::info!(
                    "sync completed: {} projects, {} tasks",
                    snapshot.projects.len(),
                    snapshot.tasks.len()
                );
                SyncOutcome::Completed(snapshot)
            }
            Err(e) => {
                log::error!("sync failed: {e}");
                SyncOutcome::Failed
            }
        }
    }
}
