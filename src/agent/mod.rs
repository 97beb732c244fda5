//! Forwarding of stored events to the agent backend
//!
//! An [`AgentClient`] receives an [`EventEnvelope`] and returns the
//! backend's answer. The gateway uses [`HttpAgent`] when `agent.url` is
//! configured and [`StubAgent`] otherwise.

mod http;
mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::types::EventEnvelope;

pub use self::http::HttpAgent;
pub use self::stub::StubAgent;

/// Result of forwarding one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: String,
    pub event_id: Uuid,
    /// Backend reply, when it sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl AgentResponse {
    pub fn ok(event_id: Uuid) -> Self {
        Self {
            status: "ok".to_string(),
            event_id,
            body: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("agent returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Delivers envelopes to a processing backend
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn forward(&self, envelope: &EventEnvelope) -> Result<AgentResponse, AgentError>;
}

/// Pick the client for the configured backend.
pub fn build_agent(config: &AgentConfig) -> Result<Arc<dyn AgentClient>, AgentError> {
    if config.url.trim().is_empty() {
        return Ok(Arc::new(StubAgent));
    }
    Ok(Arc::new(HttpAgent::new(&config.url, config.timeout)?))
}
