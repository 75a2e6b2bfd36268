//! Due-date reminders.
//!
//! An in-process scheduler: each reminder is a spawned task that sleeps until
//! its fire time and then broadcasts a [`Reminder`] carrying the task and
//! project ids. Scheduling a reminder for a task cancels any prior one for
//! the same task; cancellation scans the scheduled list and aborts matches.
//! Reminders fire one hour before the due date, or at the due date itself
//! when less than an hour remains — and never for a due date already past.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use crate::model::Task;

/// Lead time before the due date at which a reminder normally fires.
const LEAD_SECONDS: i64 = 60 * 60;

const REMINDER_CHANNEL_CAPACITY: usize = 64;

pub type ReminderId = u64;

/// The delivered notification payload.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
}

/// A pending reminder, as reported by [`ReminderScheduler::scheduled`].
#[derive(Debug, Clone)]
pub struct ScheduledReminder {
    pub id: ReminderId,
    pub task_id: String,
    pub fire_at: DateTime<Utc>,
}

struct Pending {
    info: ScheduledReminder,
    abort: AbortHandle,
}

struct Inner {
    pending: Mutex<Vec<Pending>>,
    tx: broadcast::Sender<Reminder>,
    next_id: AtomicU64,
}

pub struct ReminderScheduler {
    inner: Arc<Inner>,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderScheduler {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(REMINDER_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(Vec::new()),
                tx,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Receiver for delivered reminders.
    pub fn subscribe(&self) -> broadcast::Receiver<Reminder> {
        self.inner.tx.subscribe()
    }

    /// Schedule the due-date reminder for a task, replacing any existing
    /// reminder for the same task id. Returns `None` when the due date is
    /// not in the future.
    pub fn schedule_due_task(&self, task: &Task) -> Option<ReminderId> {
        let now = Utc::now();
        if task.due_date <= now {
            return None;
        }

        let lead = ChronoDuration::seconds(LEAD_SECONDS);
        let preferred = task.due_date - lead;
        let (fire_at, at_due) = if preferred > now {
            (preferred, false)
        } else {
            (task.due_date, true)
        };

        self.cancel_for_task(&task.id);

        let reminder = Reminder {
            title: "Task Due Soon!".to_string(),
            body: format!(
                "\"{}\" is due {}",
                task.title,
                if at_due { "now" } else { "in 1 hour" }
            ),
            task_id: Some(task.id.clone()),
            project_id: Some(task.project_id.clone()),
        };

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let delay = (fire_at - now).to_std().unwrap_or_default();
        let inner = Arc::clone(&self.inner);

        // Hold the lock across the spawn so the entry is registered before
        // the delivery task's de-registration can run; an imminent reminder
        // on a multi-thread runtime would otherwise race past it and leave
        // a ghost entry behind.
        let mut pending = self.inner.pending.lock().unwrap();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.pending.lock().unwrap().retain(|p| p.info.id != id);
            // Send fails only when nobody is subscribed.
            let _ = inner.tx.send(reminder);
        });
        pending.push(Pending {
            info: ScheduledReminder {
                id,
                task_id: task.id.clone(),
                fire_at,
            },
            abort: handle.abort_handle(),
        });
        drop(pending);

        log::debug!("scheduled reminder {id} for task {} at {fire_at}", task.id);
        Some(id)
    }

    /// Deliver a reminder immediately, outside any schedule.
    pub fn notify_now(&self, title: &str, body: &str) {
        let _ = self.inner.tx.send(Reminder {
            title: title.to_string(),
            body: body.to_string(),
            task_id: None,
            project_id: None,
        });
    }

    /// Cancel every pending reminder for the given task id.
    pub fn cancel_for_task(&self, task_id: &str) {
        self.inner.pending.lock().unwrap().retain(|p| {
            if p.info.task_id == task_id {
                p.abort.abort();
                false
            } else {
                true
            }
        });
    }

    pub fn cancel_all(&self) {
        let mut pending = self.inner.pending.lock().unwrap();
        for p in pending.iter() {
            p.abort.abort();
        }
        pending.clear();
    }

    /// Currently pending reminders.
    pub fn scheduled(&self) -> Vec<ScheduledReminder> {
        self.inner
            .pending
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.info.clone())
            .collect()
    }
}
