//! REST endpoints
//!
//! - `POST /webhooks/:channel` - Ingest a webhook and forward it
//! - `GET /admin/events` - Recent events, newest first, with pagination
//! - `GET /admin/events/:id` - Single event
//! - `PUT /admin/events/:id/status` - Set an event's status
//! - `GET /admin/stats` - Store occupancy
//! - `GET /admin/channels` - Configured channel names
//! - `GET /admin/skills` - Advertised skills

pub mod admin;
pub mod webhooks;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::channel::ChannelError;

/// Default page size for event listings
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size for event listings
pub const MAX_LIMIT: i64 = 1000;

/// Common pagination parameters
///
/// Signed so that negative query values clamp instead of failing to parse.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items to return (default: 50, max: 1000)
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PaginationParams {
    /// Limit clamped to `0..=1000`; negative values yield an empty page
    pub fn normalized_limit(&self) -> usize {
        self.limit.clamp(0, MAX_LIMIT) as usize
    }

    /// Offset with negative values treated as zero
    pub fn normalized_offset(&self) -> usize {
        usize::try_from(self.offset.max(0)).unwrap_or(usize::MAX)
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = match status {
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
            StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
            StatusCode::BAD_GATEWAY => "BAD_GATEWAY",
            _ => "INTERNAL_ERROR",
        };
        Self {
            status,
            error: message.into(),
            code: code.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<ChannelError> for ApiError {
    fn from(err: ChannelError) -> Self {
        let status = match err {
            ChannelError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
