//! Redis Pub/Sub backed [`BroadcastBus`](super::BroadcastBus).
//!
//! Publishing reuses a shared `ConnectionManager` (same pattern as the
//! ranking cache). Subscribing opens a dedicated connection per
//! subscriber, matching the concurrency model in the component design:
//! subscriber connections are never shared with command connections used
//! for `ZADD`/`ZRANGE`.

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{BroadcastBus, BusError, PayloadStream, Result};

pub struct RedisBroadcastBus {
    client: redis::Client,
    publish_conn: ConnectionManager,
}

impl RedisBroadcastBus {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        let publish_conn = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            publish_conn,
        })
    }
}

#[async_trait]
impl BroadcastBus for RedisBroadcastBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        let mut conn = self.publish_conn.clone();
        conn.publish::<_, _, ()>(topic, payload)
            .await
            .map_err(|e| BusError::Operation(format!("PUBLISH failed: {}", e)))?;

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<PayloadStream> {
        let conn = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        let mut pubsub = conn.into_pubsub();
        pubsub
            .subscribe(topic)
            .await
            .map_err(|e| BusError::Operation(format!("SUBSCRIBE failed: {}", e)))?;

        let stream = pubsub
            .into_on_message()
            .map(|msg| msg.get_payload::<Vec<u8>>().unwrap_or_default());

        Ok(Box::pin(stream))
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.publish_conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| BusError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
