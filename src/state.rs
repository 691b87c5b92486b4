//! Shared application state, the collection of trait objects and config
//! that every handler closes over. Mirrors the teacher's `AppState`
//! aggregate in shape (one struct, `Clone` via `Arc` fields, threaded
//! through Axum's `State` extractor).

use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::bus::BroadcastBus;
use crate::cache::RankingCache;
use crate::config::Config;
use crate::service::{ScoreIngestion, SnapshotReader};
use crate::store::DurableStore;

#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<ScoreIngestion>,
    pub snapshot: Arc<SnapshotReader>,
    pub store: Arc<dyn DurableStore>,
    pub cache: Arc<dyn RankingCache>,
    pub bus: Arc<dyn BroadcastBus>,
    pub token_validator: Arc<dyn TokenValidator>,
    pub config: Arc<Config>,
}
