//! Thin JSON adapter between [`RankingEntry`] deltas and the raw byte
//! payloads the [`BroadcastBus`] trait deals in.

use tracing::warn;

use crate::bus::{BroadcastBus, BusError, VIEWER_UPDATES_TOPIC};
use crate::domain::ScoreUpdateDelta;

#[derive(Default)]
pub struct DeltaBroadcaster;

impl DeltaBroadcaster {
    pub async fn publish(&self, bus: &dyn BroadcastBus, delta: &ScoreUpdateDelta) -> Result<(), BusError> {
        let payload = serde_json::to_vec(delta)
            .map_err(|e| BusError::Operation(format!("delta serialization failed: {e}")))?;

        bus.publish(VIEWER_UPDATES_TOPIC, payload).await
    }

    /// Decodes one payload off the wire. Malformed payloads are logged and
    /// discarded rather than propagated: a single corrupt delta must not
    /// take down a subscriber's stream.
    pub fn decode(payload: &[u8]) -> Option<ScoreUpdateDelta> {
        match serde_json::from_slice(payload) {
            Ok(delta) => Some(delta),
            Err(e) => {
                warn!(error = %e, "discarding malformed delta payload");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RankingEntry;
    use crate::testutil::InMemoryBus;

    #[tokio::test]
    async fn publish_then_decode_round_trips() {
        let bus = InMemoryBus::new();
        let mut stream = bus.subscribe(VIEWER_UPDATES_TOPIC).await.unwrap();

        let delta = RankingEntry {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
            score: 900,
            rank: 4,
        };

        let broadcaster = DeltaBroadcaster;
        broadcaster.publish(&bus, &delta).await.unwrap();

        use futures::StreamExt;
        let payload = stream.next().await.unwrap();
        let decoded = DeltaBroadcaster::decode(&payload).unwrap();
        assert_eq!(decoded, delta);
    }

    #[test]
    fn decode_discards_malformed_payload() {
        assert!(DeltaBroadcaster::decode(b"not json").is_none());
    }
}
