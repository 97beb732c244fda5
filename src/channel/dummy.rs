//! Catch-all channel that accepts any POST body

use axum::http::Method;

use super::{extract_headers, Channel, ChannelError, InboundRequest};
use crate::types::EventRecord;

/// Wraps any POSTed body in an event, unchanged
#[derive(Debug, Clone)]
pub struct DummyChannel {
    name: String,
}

impl DummyChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Channel for DummyChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "dummy"
    }

    fn validate(&self, request: &InboundRequest) -> Result<(), ChannelError> {
        if request.method != Method::POST {
            return Err(ChannelError::MethodNotAllowed(request.method.clone()));
        }
        Ok(())
    }

    fn parse(&self, request: InboundRequest) -> Result<EventRecord, ChannelError> {
        let headers = extract_headers(&request.headers);
        Ok(EventRecord::new(&self.name, request.body.to_vec(), headers))
    }
}
