//! Grafana alerting webhook channel

use axum::http::{header, Method};

use super::{extract_headers, Channel, ChannelError, InboundRequest};
use crate::types::EventRecord;

/// Largest accepted body, in bytes (1MB)
pub const MAX_BODY_SIZE: usize = 1 << 20;

/// Accepts JSON bodies up to 1MB, optionally behind a bearer token
#[derive(Debug, Clone)]
pub struct GrafanaChannel {
    name: String,
    auth_token: String,
}

impl GrafanaChannel {
    /// An empty `auth_token` disables the Authorization check.
    pub fn new(name: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth_token: auth_token.into(),
        }
    }
}

impl Channel for GrafanaChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "grafana"
    }

    fn validate(&self, request: &InboundRequest) -> Result<(), ChannelError> {
        if request.method != Method::POST {
            return Err(ChannelError::MethodNotAllowed(request.method.clone()));
        }

        let content_type = request.header(header::CONTENT_TYPE).unwrap_or_default();
        if content_type != "application/json" {
            return Err(ChannelError::UnsupportedContentType(
                content_type.to_string(),
            ));
        }

        if !self.auth_token.is_empty() {
            let expected = format!("Bearer {}", self.auth_token);
            if request.header(header::AUTHORIZATION) != Some(expected.as_str()) {
                return Err(ChannelError::Unauthorized);
            }
        }

        Ok(())
    }

    fn parse(&self, request: InboundRequest) -> Result<EventRecord, ChannelError> {
        if request.body.len() > MAX_BODY_SIZE {
            return Err(ChannelError::BodyTooLarge);
        }
        if serde_json::from_slice::<serde::de::IgnoredAny>(&request.body).is_err() {
            return Err(ChannelError::InvalidJson);
        }

        let headers = extract_headers(&request.headers);
        Ok(EventRecord::new(&self.name, request.body.to_vec(), headers))
    }
}
