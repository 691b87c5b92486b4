//! Request handlers for the three leaderboard routes plus `/health`.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::service::{IngestionError, SnapshotError};
use crate::state::AppState;

use super::responses::{ApiError, HealthResponse, LeaderboardPage, ScoreSubmissionResponse};

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub score: i64,
}

pub async fn submit_score(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<SubmitScoreRequest>,
) -> Result<Json<ScoreSubmissionResponse>, ApiError> {
    state
        .ingestion
        .submit_score(&user.user_id, body.score)
        .await
        .map_err(|e| match e {
            IngestionError::InvalidScore => ApiError::validation(e.to_string()),
            IngestionError::Store(_) => ApiError::internal(e.to_string()),
        })?;

    Ok(Json(ScoreSubmissionResponse {
        user_id: user.user_id,
        score: body.score,
    }))
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardPage>, ApiError> {
    let page = state
        .snapshot
        .get_page(query.limit, query.offset)
        .await
        .map_err(|e| match e {
            SnapshotError::InvalidLimit => ApiError::validation(e.to_string()),
            SnapshotError::Cache(_) => ApiError::internal(e.to_string()),
        })?;

    Ok(Json(LeaderboardPage::new(
        page.entries,
        page.total,
        query.limit,
        query.offset,
    )))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.store.health_check().await.is_ok() {
        "ok"
    } else {
        "unavailable"
    };
    let cache = if state.cache.health_check().await.is_ok() {
        "ok"
    } else {
        "unavailable"
    };
    let bus = if state.bus.health_check().await.is_ok() {
        "ok"
    } else {
        "unavailable"
    };

    let status = if database == "ok" && cache == "ok" && bus == "ok" {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        database,
        cache,
        bus,
    })
}
