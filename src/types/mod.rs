//! Data types for the webhook gateway
//!
//! This module contains the records that flow between channels, the event
//! store and the agent backend.

mod event;
mod skill;

pub use event::{EventEnvelope, EventRecord, EventStatus, ENVELOPE_VERSION};
pub use skill::Skill;
