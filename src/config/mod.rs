//! Gateway configuration
//!
//! Loads `gateway.yaml`, fills in defaults for missing or zero values,
//! expands `${VAR}` references in secret-bearing fields and validates the
//! result.

mod error;
mod model;

use std::collections::HashSet;
use std::path::Path;

use log::debug;

pub use error::ConfigError;
pub use model::*;

/// Default config file looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "gateway.yaml";

impl GatewayConfig {
    /// Read, default, expand and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading config from path: {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_defaults();
        config.expand_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without defaults or validation.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Replace zero-valued fields with defaults.
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = DEFAULT_HOST.to_string();
        }
        if self.server.port == 0 {
            self.server.port = DEFAULT_PORT;
        }
        if self.agent.timeout.is_zero() {
            self.agent.timeout = DEFAULT_AGENT_TIMEOUT;
        }
        if self.store.kind.is_empty() {
            self.store.kind = DEFAULT_STORE_TYPE.to_string();
        }
        if self.store.capacity == 0 {
            self.store.capacity = crate::event_store::DEFAULT_CAPACITY as i64;
        }
        if self.logging.level.is_empty() {
            self.logging.level = DEFAULT_LOG_LEVEL.to_string();
        }
        if self.logging.format.is_empty() {
            self.logging.format = DEFAULT_LOG_FORMAT.to_string();
        }
    }

    /// Expand environment references in the agent URL and channel auth tokens.
    pub fn expand_env(&mut self) {
        self.agent.url = expand_env(&self.agent.url);
        for channel in &mut self.channels {
            channel.auth = expand_env(&channel.auth);
        }
    }

    /// Check required fields and value constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid(
                "server.port",
                "must be between 1 and 65535",
            ));
        }

        let mut names = HashSet::new();
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("channels[{}].name", i),
                    "is required",
                ));
            }
            if channel.kind.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("channels[{}].type", i),
                    "is required",
                ));
            }
            if !names.insert(channel.name.as_str()) {
                return Err(ConfigError::invalid(
                    format!("channels[{}].name", i),
                    format!("duplicate channel name {:?}", channel.name),
                ));
            }
        }

        if self.store.capacity < 0 {
            return Err(ConfigError::invalid("store.capacity", "must be non-negative"));
        }
        if self.store.kind != DEFAULT_STORE_TYPE {
            return Err(ConfigError::invalid(
                "store.type",
                format!("unsupported store type {:?}", self.store.kind),
            ));
        }

        match self.logging.format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(ConfigError::invalid(
                "logging.format",
                format!("expected \"json\" or \"text\", got {:?}", other),
            )),
        }
    }
}

/// Replace `${VAR}` and `$VAR` with environment values; unset variables
/// expand to an empty string.
pub fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some((start, '{')) => {
                chars.next();
                let rest = &input[start + 1..];
                match rest.find('}') {
                    Some(end) => {
                        out.push_str(&lookup(&rest[..end]));
                        for _ in 0..=rest[..end].chars().count() {
                            chars.next();
                        }
                    }
                    None => {
                        out.push_str("${");
                    }
                }
            }
            Some((start, next)) if next == '_' || next.is_ascii_alphanumeric() => {
                let rest = &input[start..];
                let end = rest
                    .find(|ch: char| !(ch == '_' || ch.is_ascii_alphanumeric()))
                    .unwrap_or(rest.len());
                out.push_str(&lookup(&rest[..end]));
                for _ in 0..end {
                    chars.next();
                }
            }
            _ => out.push('$'),
        }
    }
    out
}

fn lookup(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
