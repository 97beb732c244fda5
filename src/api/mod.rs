//! HTTP front end
//!
//! Webhook ingestion plus a small JSON admin API over the event store.

pub mod http;
pub mod middleware;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
