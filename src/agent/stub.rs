use async_trait::async_trait;
use log::info;

use super::{AgentClient, AgentError, AgentResponse};
use crate::types::EventEnvelope;

/// Logs envelopes and acknowledges them without contacting a backend
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAgent;

#[async_trait]
impl AgentClient for StubAgent {
    async fn forward(&self, envelope: &EventEnvelope) -> Result<AgentResponse, AgentError> {
        info!(
            "forwarding event (event_id={}, channel={}, skills={})",
            envelope.event.id,
            envelope.channel,
            envelope.skills.len()
        );
        Ok(AgentResponse::ok(envelope.event.id))
    }
}
