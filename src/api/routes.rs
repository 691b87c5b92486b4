//! Router assembly. Mirrors the teacher's layering pattern in
//! `create_v1_router`/`create_app_router`: per-route auth via
//! `route_layer`, then app-wide logging/request-id/CORS/panic-recovery
//! layers applied outermost-last, same order the teacher uses.

use axum::middleware::{self, from_fn_with_state};
use axum::routing::{get, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{get_leaderboard, health_check, submit_score};
use super::middleware::{auth_middleware, cors_layer, request_id_middleware, request_logging_middleware, AuthState};
use super::stream::stream_leaderboard;

pub fn create_router(state: AppState) -> Router {
    let auth_state = AuthState {
        validator: state.token_validator.clone(),
        bearer_header: state.config.bearer_header.clone().into(),
    };

    let v1 = Router::new()
        .route(
            "/leaderboard/score",
            put(submit_score).route_layer(from_fn_with_state(auth_state, auth_middleware)),
        )
        .route("/leaderboard", get(get_leaderboard))
        .route("/leaderboard/stream", get(stream_leaderboard))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api/v1", v1)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
