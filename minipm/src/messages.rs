//! Change events emitted by the store.
//!
//! Every mutation publishes a [`ChangeNotification`] on the store's broadcast
//! channel (see [`Store::change_rx`](crate::Store::change_rx)). View-model
//! layers subscribe and recompute derived state when a notification arrives;
//! the payload is intentionally lightweight — subscribers re-read the cache
//! rather than diffing event contents.

/// Which keyed collection a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Tasks,
    /// The dark-mode flag.
    Settings,
}

/// The kind of write that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

/// Lightweight event emitted after every store mutation.
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    pub collection: Collection,
    pub kind: WriteKind,
    /// Id of the affected record, when a single record was targeted.
    /// `None` for whole-collection operations (hydration, cascade, clear).
    pub id: Option<String>,
}
