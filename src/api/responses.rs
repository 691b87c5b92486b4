//! Response envelopes for the HTTP surface.
//!
//! `ApiError` is kept close to the teacher's RFC-7807-flavored error body
//! (`src/api/responses.rs`), trimmed to the five kinds this core actually
//! raises. The success envelopes are new: the wire shapes are dictated
//! exactly by the external interface table, so they're dedicated types
//! rather than a reuse of the teacher's generic `PaginatedResponse<T>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RankingEntry;

/// RFC 7807 Problem Details body, returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, title: &str, detail: impl Into<String>) -> Self {
        Self {
            type_: format!("https://pinnacle-board.dev/errors/{code}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
            code: code.to_string(),
            request_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation", "Validation failed", detail)
    }

    pub fn unauthenticated(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "Authentication required",
            detail,
        )
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Not found", detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error",
            detail,
        )
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// `PUT /leaderboard/score` success body.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSubmissionResponse {
    pub user_id: String,
    pub score: i64,
}

/// `GET /leaderboard` success body — field names match the external
/// interface table exactly (`entries`, `limit`, not `data`/`per_page`).
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardPage {
    pub entries: Vec<RankingEntry>,
    pub total: u64,
    pub page: u64,
    pub limit: u32,
    pub total_pages: u64,
}

impl LeaderboardPage {
    pub fn new(entries: Vec<RankingEntry>, total: u64, limit: u32, offset: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit as u64 - 1) / limit as u64
        };
        let page = offset / limit as u64 + 1;

        Self {
            entries,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
    pub bus: &'static str,
}
