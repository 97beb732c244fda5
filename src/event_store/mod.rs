//! Event retention store
//!
//! Keeps a bounded history of ingested webhook events:
//! - `EventStore`: the interface the HTTP layer talks to
//! - `MemoryStore`: fixed-capacity ring buffer with an id index
//!
//! # Architecture
//!
//! ```text
//! save():  ┌──────────┐  write lock  ┌──────────────────────────────┐
//!          │ webhook  │─────────────►│ slots[head] = event          │
//!          └──────────┘              │ index[event.id] = head       │
//!                                    │ head = (head + 1) % capacity │
//!                                    └──────────────────────────────┘
//! list():  newest-first walk from head - 1 under the read lock
//! ```

mod memory;
mod store;

pub use memory::{MemoryStore, DEFAULT_CAPACITY};
pub use store::{EventStore, StoreError, StoreResult};
