//! Event types for webhook ingestion
//!
//! An `EventRecord` is the normalized form of one inbound webhook request.
//! Every field except `status` is fixed when the record is created.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::Skill;

/// Version string stamped on every envelope sent to the agent
pub const ENVELOPE_VERSION: &str = "1";

/// Lifecycle state of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Accepted and stored, not yet forwarded
    #[default]
    Received,
    /// Delivered to the agent backend
    Forwarded,
    /// Delivery to the agent backend failed
    Failed,
    /// Processing finished downstream
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Received => "received",
            EventStatus::Forwarded => "forwarded",
            EventStatus::Failed => "failed",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One ingested webhook occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique lookup key, assigned at creation
    pub id: Uuid,

    /// Name of the channel that received the request
    pub channel_id: String,

    /// Original request body, byte for byte
    #[serde(with = "raw_body")]
    pub raw_body: Vec<u8>,

    /// Selected request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// When the gateway accepted the request
    pub timestamp: DateTime<Utc>,

    /// Mutable lifecycle state
    #[serde(default)]
    pub status: EventStatus,
}

impl EventRecord {
    /// Create a freshly received event with a new id and the current time
    pub fn new(
        channel_id: impl Into<String>,
        raw_body: Vec<u8>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id: channel_id.into(),
            raw_body,
            headers,
            timestamp: Utc::now(),
            status: EventStatus::Received,
        }
    }
}

/// Event plus routing metadata, as sent to the agent backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub version: String,
    pub event: EventRecord,
    pub channel: String,
    pub skills: Vec<Skill>,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    /// Wrap an event for delivery
    pub fn new(event: EventRecord, skills: Vec<Skill>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            channel: event.channel_id.clone(),
            event,
            skills,
            timestamp: Utc::now(),
        }
    }
}

/// JSON rendering of raw request bodies.
///
/// Valid JSON is embedded as-is, anything else becomes a string and an
/// empty body becomes `null`.
mod raw_body {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if bytes.is_empty() {
            return serializer.serialize_none();
        }
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(value) => value.serialize(serializer),
            Err(_) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        match value {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::String(text)) => Ok(text.into_bytes()),
            Some(other) => serde_json::to_vec(&other).map_err(serde::de::Error::custom),
        }
    }
}
