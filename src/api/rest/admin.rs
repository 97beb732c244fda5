//! Administrative read endpoints

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, PaginationParams};
use crate::api::state::AppState;
use crate::event_store::StoreError;
use crate::types::{EventRecord, EventStatus, Skill};

/// Page of events, newest first
#[derive(Debug, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<EventRecord>,
    pub count: usize,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub count: usize,
    pub capacity: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillList {
    pub skills: Vec<Skill>,
    pub count: usize,
}

/// Body of `PUT /admin/events/:id/status`
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: EventStatus,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::not_found(err.to_string()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}

fn parse_event_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("invalid event id: {}", raw)))
}

/// GET /admin/events - List retained events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<EventPage>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let limit = params.normalized_limit();
    let offset = params.normalized_offset();

    let (events, total) = state.store.page(limit, offset);

    Ok(Json(EventPage {
        count: events.len(),
        events,
        total,
        limit,
        offset,
    }))
}

/// GET /admin/events/:id - Get a single event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventRecord>, ApiError> {
    let id = parse_event_id(&id)?;
    Ok(Json(state.store.get(&id)?))
}

/// PUT /admin/events/:id/status - Change an event's status
pub async fn update_event_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<EventRecord>, ApiError> {
    let id = parse_event_id(&id)?;
    let Json(update) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    Ok(Json(state.store.update_status(&id, update.status)?))
}

/// GET /admin/stats - Store occupancy
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StoreStats> {
    Json(StoreStats {
        count: state.store.count(),
        capacity: state.store.capacity(),
    })
}

/// GET /admin/channels - Configured channel names
pub async fn list_channels(State(state): State<Arc<AppState>>) -> Json<ChannelList> {
    let channels = state.channel_names();
    Json(ChannelList {
        count: channels.len(),
        channels,
    })
}

/// GET /admin/skills - Skills advertised to the agent
pub async fn list_skills(State(state): State<Arc<AppState>>) -> Json<SkillList> {
    Json(SkillList {
        count: state.skills.len(),
        skills: state.skills.clone(),
    })
}
