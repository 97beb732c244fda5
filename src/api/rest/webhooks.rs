//! Webhook ingestion endpoint

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{HeaderMap, Method},
    Json,
};
use log::{error, info, warn};
use uuid::Uuid;

use super::ApiError;
use crate::agent::AgentResponse;
use crate::api::state::AppState;
use crate::channel::InboundRequest;
use crate::types::{EventEnvelope, EventStatus};

/// ANY /webhooks/:channel - Validate, store and forward one webhook
///
/// Non-POST methods reach the channel so it can reject them with 405.
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    Path(channel_name): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let channel = state
        .channels
        .get(&channel_name)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("unknown channel: {}", channel_name)))?;

    let body = body.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
    let request = InboundRequest::new(method, headers, body);

    channel.validate(&request)?;
    let event = channel.parse(request)?;
    let event_id = event.id;

    if let Err(err) = state.store.save(event.clone()) {
        error!("failed to save event (event_id={}): {}", event_id, err);
        return Err(ApiError::internal("failed to store event"));
    }
    info!(
        "event received (event_id={}, channel={}, bytes={})",
        event_id,
        channel_name,
        event.raw_body.len()
    );

    let envelope = EventEnvelope::new(event, state.skills.clone());
    match state.agent.forward(&envelope).await {
        Ok(response) => {
            mark_event(&state, &event_id, EventStatus::Forwarded);
            Ok(Json(response))
        }
        Err(err) => {
            error!("agent forward failed (event_id={}): {}", event_id, err);
            mark_event(&state, &event_id, EventStatus::Failed);
            Err(ApiError::bad_gateway("agent forwarding failed"))
        }
    }
}

/// Record the forwarding outcome. The event may already have been evicted.
fn mark_event(state: &AppState, id: &Uuid, status: EventStatus) {
    if let Err(err) = state.store.update_status(id, status) {
        warn!(
            "failed to update event status (event_id={}, status={}): {}",
            id, status, err
        );
    }
}
