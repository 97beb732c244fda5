//! Event store interface shared by the HTTP layer and the CLI

use uuid::Uuid;

use crate::types::{EventRecord, EventStatus};

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by an event store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store was constructed with a non-positive capacity
    #[error("capacity must be greater than zero")]
    InvalidCapacity,

    /// No retained event has this id (never stored, or evicted)
    #[error("event not found: {0}")]
    NotFound(Uuid),

    /// An event with this id is still retained
    #[error("duplicate event id: {0}")]
    DuplicateId(Uuid),
}

/// Bounded, concurrency-safe storage for recent events.
///
/// Reads return owned copies; nothing handed out aliases internal storage.
pub trait EventStore: Send + Sync {
    /// Insert an event, evicting the oldest one when full
    fn save(&self, event: EventRecord) -> StoreResult<()>;

    /// Look up an event by id
    fn get(&self, id: &Uuid) -> StoreResult<EventRecord>;

    /// Up to `limit` events newest-first, skipping the first `offset`
    fn list(&self, limit: usize, offset: usize) -> Vec<EventRecord>;

    /// Same as `list`, plus the retained count taken from the same snapshot
    fn page(&self, limit: usize, offset: usize) -> (Vec<EventRecord>, usize);

    /// Change the status of a retained event and return the updated copy
    fn update_status(&self, id: &Uuid, status: EventStatus) -> StoreResult<EventRecord>;

    /// Number of events currently retained
    fn count(&self) -> usize;

    /// Maximum number of events retained
    fn capacity(&self) -> usize;
}
