//! Shared application state

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::AgentClient;
use crate::channel::Channel;
use crate::event_store::EventStore;
use crate::types::Skill;

/// Everything a request handler needs, shared behind an `Arc`
pub struct AppState {
    /// The single event store for this process
    pub store: Arc<dyn EventStore>,

    /// Configured channels keyed by name
    pub channels: HashMap<String, Arc<dyn Channel>>,

    /// Backend that receives event envelopes
    pub agent: Arc<dyn AgentClient>,

    /// Skills advertised in every envelope
    pub skills: Vec<Skill>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EventStore>,
        channels: HashMap<String, Arc<dyn Channel>>,
        agent: Arc<dyn AgentClient>,
        skills: Vec<Skill>,
    ) -> Self {
        Self {
            store,
            channels,
            agent,
            skills,
        }
    }

    /// Configured channel names, sorted
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }
}
