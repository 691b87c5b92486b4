//! Delta Stream Endpoint: `GET /leaderboard/stream`.
//!
//! A forwarding task bridges the bus's payload stream into a bounded
//! per-subscriber channel. If the subscriber falls behind and the channel
//! fills, the forwarding task drops that subscriber rather than blocking
//! the bus or any other subscriber — the backpressure policy mandated by
//! §4.6 and §9. Client disconnect is handled by Axum/hyper dropping the
//! response body stream, which drops the receiver, which ends the
//! forwarding task's next `try_send`.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::stream;
use futures::StreamExt;
use std::convert::Infallible;
use std::time::Duration;
use tracing::warn;

use crate::bus::VIEWER_UPDATES_TOPIC;
use crate::service::DeltaBroadcaster;
use crate::state::AppState;

use super::responses::ApiError;

/// Disables intermediary buffering, per §6's stream header requirements:
/// left unset, a proxy sitting between client and service may buffer
/// `text/event-stream` frames and deliver them in bursts instead of as
/// they're published.
const X_ACCEL_BUFFERING: (&str, &str) = ("x-accel-buffering", "no");

pub async fn stream_leaderboard(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let payloads = state
        .bus
        .subscribe(VIEWER_UPDATES_TOPIC)
        .await
        .map_err(|e| ApiError::internal(format!("broadcast bus unavailable: {e}")))?;

    let (tx, rx) = tokio::sync::mpsc::channel::<Vec<u8>>(state.config.subscriber_queue_capacity);

    tokio::spawn(async move {
        tokio::pin!(payloads);
        while let Some(payload) = payloads.next().await {
            if tx.try_send(payload).is_err() {
                warn!("subscriber queue full or closed; disconnecting slow subscriber");
                break;
            }
        }
    });

    let events = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|payload| (payload, rx)) })
        .filter_map(|payload| async move {
            let frame: Option<Result<Event, Infallible>> = match DeltaBroadcaster::decode(&payload) {
                Some(delta) => match serde_json::to_string(&delta) {
                    Ok(json) => Some(Ok(Event::default().data(json))),
                    Err(e) => {
                        warn!(error = %e, "failed to re-serialize delta for SSE frame");
                        None
                    }
                },
                None => None,
            };
            frame
        });

    let sse = Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    );

    Ok(([X_ACCEL_BUFFERING], sse))
}
