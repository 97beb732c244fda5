use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{AgentClient, AgentError, AgentResponse};
use crate::types::EventEnvelope;

/// Posts envelopes as JSON to the configured backend URL
#[derive(Debug, Clone)]
pub struct HttpAgent {
    client: Client,
    url: String,
}

impl HttpAgent {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgent {
    async fn forward(&self, envelope: &EventEnvelope) -> Result<AgentResponse, AgentError> {
        debug!(
            "posting event to agent (event_id={}, url={})",
            envelope.event.id, self.url
        );
        let response = self.client.post(&self.url).json(envelope).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&text)
                    .unwrap_or_else(|_| serde_json::Value::String(text.clone())),
            )
        };

        Ok(AgentResponse {
            status: "ok".to_string(),
            event_id: envelope.event.id,
            body,
        })
    }
}
