//! Configuration schema for the gateway.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event_store::DEFAULT_CAPACITY;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STORE_TYPE: &str = "memory";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "json";

/// Root gateway config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Base URL a local client can reach the server on.
    pub fn local_url(&self) -> String {
        let host = match self.host.as_str() {
            "" | "0.0.0.0" => "127.0.0.1",
            "::" => "[::1]",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

/// Agent backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Backend URL; empty means events are only logged.
    #[serde(default)]
    pub url: String,
    /// Per-request timeout.
    #[serde(default, with = "duration")]
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

/// A single inbound channel.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChannelConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub auth: String,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            auth: auth.into(),
        }
    }
}

/// Skill discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkillsConfig {
    /// Directories scanned recursively for `SKILL.md`.
    #[serde(default)]
    pub dirs: Vec<String>,
    /// Skill names to expose; empty exposes all.
    #[serde(default)]
    pub allowlist: Vec<String>,
}

/// Event store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Signed so that negative values reach validation instead of a parse error.
    #[serde(default)]
    pub capacity: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_STORE_TYPE.to_string(),
            capacity: DEFAULT_CAPACITY as i64,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

/// Durations written as integer seconds or `"<n>ms|s|m|h"`.
pub(crate) mod duration {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = value.as_millis();
        if millis % 1000 == 0 {
            serializer.serialize_str(&format!("{}s", millis / 1000))
        } else {
            serializer.serialize_str(&format!("{}ms", millis))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Duration::ZERO),
            Some(Raw::Seconds(secs)) => Ok(Duration::from_secs(secs)),
            Some(Raw::Text(text)) => parse(&text).map_err(serde::de::Error::custom),
        }
    }

    pub fn parse(text: &str) -> Result<Duration, String> {
        let text = text.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, unit) = text.split_at(split);
        let amount: u64 = digits
            .parse()
            .map_err(|_| format!("invalid duration {:?}", text))?;
        let secs_per_unit = match unit.trim() {
            "ms" => return Ok(Duration::from_millis(amount)),
            "" | "s" => 1,
            "m" => 60,
            "h" => 3600,
            other => return Err(format!("invalid duration unit {:?} in {:?}", other, text)),
        };
        amount
            .checked_mul(secs_per_unit)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("invalid duration {:?}: too large", text))
    }
}
