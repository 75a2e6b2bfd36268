//! The background write queue.
//!
//! Mutations hand their serialized snapshot to this queue and return
//! immediately; a single background task drains jobs in issue order and
//! performs the durable upserts. A failed write is logged and dropped —
//! never retried, never surfaced — which bounds the data-loss window to
//! whatever was still queued when the process died. [`WriteQueue::flush`]
//! inserts a marker job and waits for it, giving callers an awaitable
//! durability barrier without making the normal path blocking.

use sea_orm::DatabaseConnection;
use tokio::sync::{mpsc, oneshot};

use crate::storage;
use crate::store::StoreError;

pub(crate) enum WriteJob {
    Write { key: &'static str, json: String },
    Flush(oneshot::Sender<()>),
}

pub(crate) struct WriteQueue {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteQueue {
    /// Spawn the drain task. The unbounded sender keeps `enqueue` synchronous,
    /// so queue order always matches call order — `flush` relies on that.
    pub(crate) fn spawn(db: DatabaseConnection) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    WriteJob::Write { key, json } => {
                        if let Err(e) = storage::save(&db, key, &json).await {
                            log::error!("durable write of {key} failed: {e}");
                        }
                    }
                    WriteJob::Flush(ack) => {
                        // Every job queued before this marker has completed.
                        let _ = ack.send(());
                    }
                }
            }
            log::debug!("write queue drained and closed");
        });
        Self { tx }
    }

    /// Fire-and-forget: queue a full-snapshot write for one key.
    pub(crate) fn enqueue(&self, key: &'static str, json: String) {
        if self.tx.send(WriteJob::Write { key, json }).is_err() {
            log::error!("write queue closed; dropping write of {key}");
        }
    }

    /// Wait until every previously queued write has been attempted.
    pub(crate) async fn flush(&self) -> Result<(), StoreError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriteJob::Flush(ack_tx))
            .map_err(|_| StoreError::WriterClosed)?;
        ack_rx.await.map_err(|_| StoreError::WriterClosed)
    }
}
