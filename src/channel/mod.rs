//! Inbound webhook channels
//!
//! A channel validates requests from one source and turns them into
//! `EventRecord`s. Channels are selected by the `type` field of each
//! configured entry:
//! - `grafana`: JSON only, optional bearer token, 1MB body limit
//! - anything else: `dummy`, which accepts any POST body

mod dummy;
mod grafana;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method};
use log::warn;

use crate::config::ChannelConfig;
use crate::types::EventRecord;

pub use dummy::DummyChannel;
pub use grafana::{GrafanaChannel, MAX_BODY_SIZE};

/// Headers never copied into stored events.
fn is_sensitive(name: &header::HeaderName) -> bool {
    *name == header::AUTHORIZATION
        || *name == header::COOKIE
        || *name == header::PROXY_AUTHORIZATION
}

/// Transport-independent view of an inbound HTTP request
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            headers,
            body: body.into(),
        }
    }

    /// Header value as text, if present and valid
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Reasons a channel rejects a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("method {0} not allowed, expected POST")]
    MethodNotAllowed(Method),

    #[error("unsupported Content-Type {0:?}, expected application/json")]
    UnsupportedContentType(String),

    #[error("invalid or missing authorization token")]
    Unauthorized,

    #[error("request body exceeds 1MB limit")]
    BodyTooLarge,

    #[error("request body is not valid JSON")]
    InvalidJson,
}

/// An inbound webhook source
pub trait Channel: Send + Sync {
    /// Configured channel name, used in the webhook URL
    fn name(&self) -> &str;

    /// Channel type as written in config
    fn kind(&self) -> &'static str;

    /// Check method, headers and credentials
    fn validate(&self, request: &InboundRequest) -> Result<(), ChannelError>;

    /// Build a received event from the request
    fn parse(&self, request: InboundRequest) -> Result<EventRecord, ChannelError>;
}

/// Copy request headers worth keeping on the event.
///
/// Credentials are dropped; repeated headers keep their first value.
pub fn extract_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        if is_sensitive(name) {
            continue;
        }
        if let Ok(value) = value.to_str() {
            out.entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    out
}

/// Instantiate channels from config, keyed by name.
pub fn build_channels(configs: &[ChannelConfig]) -> HashMap<String, Arc<dyn Channel>> {
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::with_capacity(configs.len());
    for config in configs {
        let channel: Arc<dyn Channel> = match config.kind.as_str() {
            "grafana" => Arc::new(GrafanaChannel::new(&config.name, &config.auth)),
            "dummy" => Arc::new(DummyChannel::new(&config.name)),
            other => {
                warn!(
                    "unknown channel type, falling back to dummy (channel={}, type={})",
                    config.name, other
                );
                Arc::new(DummyChannel::new(&config.name))
            }
        };
        channels.insert(config.name.clone(), channel);
    }
    channels
}
