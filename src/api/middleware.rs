//! Request-scoped Axum middleware: request IDs, structured logging, CORS,
//! and bearer-token authentication. Grounded in the teacher's
//! `request_id_middleware`/`request_logging_middleware`/`cors_layer`/
//! `extract_bearer_token`, narrowed to the one protected route this
//! service has.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::TokenValidator;

use super::responses::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_default();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = elapsed.as_millis() as u64,
        "request completed"
    );

    response
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn extract_bearer_token(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Everything `auth_middleware` needs, bundled so it can be threaded
/// through `from_fn_with_state` as a single state type.
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn TokenValidator>,
    pub bearer_header: Arc<str>,
}

/// Authenticates the request, inserting an [`AuthenticatedUser`] extension
/// on success. Applied only to `PUT /leaderboard/score` via `route_layer`,
/// not globally — every other route is public.
///
/// [`AuthenticatedUser`]: crate::auth::AuthenticatedUser
pub async fn auth_middleware(State(auth): State<AuthState>, mut request: Request, next: Next) -> Response {
    let token = match extract_bearer_token(request.headers(), &auth.bearer_header) {
        Some(token) => token,
        None => {
            return ApiError::unauthenticated("missing bearer token").into_response();
        }
    };

    match auth.validator.validate(&token) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "bearer token rejected");
            ApiError::unauthenticated("invalid bearer token").into_response()
        }
    }
}

