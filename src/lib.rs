//! Webhook Gateway
//!
//! Receives webhooks on named channels, keeps a bounded in-memory history of
//! the resulting events and forwards each one to an agent backend.
//!
//! # Features
//!
//! - **Channels**: per-source validation (`grafana`, `dummy`)
//! - **Bounded retention**: fixed-capacity ring buffer with O(1) id lookup
//! - **Thread-Safe**: one `parking_lot::RwLock` guards all store state
//! - **Skills**: `SKILL.md` discovery, advertised with every forwarded event
//! - **Admin API**: paginated event listing, lookup and status updates
//!
//! # Modules
//!
//! - `types`: Core data structures (EventRecord, EventEnvelope, Skill)
//! - `event_store`: Event retention store
//! - `channel`: Inbound webhook sources
//! - `agent`: Forwarding clients
//! - `skills`: Skill discovery
//! - `config`: YAML configuration
//! - `api`: HTTP router, handlers and middleware
//! - `cli`: Command-line entry points
//! - `logging`: Logger setup
//!
//! # Example
//!
//! ```
//! use webhook_gateway::{EventRecord, EventStore, MemoryStore};
//!
//! let store = MemoryStore::new(2).unwrap();
//! for body in ["a", "b", "c"] {
//!     store
//!         .save(EventRecord::new("dummy", body.as_bytes().to_vec(), Default::default()))
//!         .unwrap();
//! }
//! let newest: Vec<_> = store.list(10, 0).into_iter().map(|e| e.raw_body).collect();
//! assert_eq!(newest, vec![b"c".to_vec(), b"b".to_vec()]);
//! ```

pub mod agent;
pub mod api;
pub mod channel;
pub mod cli;
pub mod config;
pub mod event_store;
pub mod logging;
pub mod skills;
pub mod types;

// Re-export commonly used items at crate root
pub use agent::{AgentClient, AgentError, AgentResponse};
pub use api::{create_router, AppState};
pub use channel::{Channel, ChannelError, InboundRequest};
pub use config::{ConfigError, GatewayConfig};
pub use event_store::{EventStore, MemoryStore, StoreError};
pub use skills::SkillRegistry;
pub use types::{EventEnvelope, EventRecord, EventStatus, Skill};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
