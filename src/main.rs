//! Pinnacle Board entry point.
//!
//! Wires concrete Postgres/Redis adapters into the trait objects the
//! service layer depends on, runs pending migrations, and serves the
//! HTTP API.

use std::sync::Arc;

use pinnacle_board::api::create_router;
use pinnacle_board::auth::SharedSecretValidator;
use pinnacle_board::bus::redis::RedisBroadcastBus;
use pinnacle_board::cache::redis::RedisRankingCache;
use pinnacle_board::config::Config;
use pinnacle_board::database::{register_leaderboard_migrations, ConnectionPool, DatabaseConfig, MigrationManager};
use pinnacle_board::directory::postgres::PostgresUserDirectory;
use pinnacle_board::service::{ScoreIngestion, SnapshotReader};
use pinnacle_board::state::AppState;
use pinnacle_board::store::postgres::PostgresStore;
use pinnacle_board::{NAME, VERSION};

use redis::aio::ConnectionManager;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .json()
        .init();

    info!(name = NAME, version = VERSION, "starting up");

    let db_config = DatabaseConfig {
        url: config.database_url.clone(),
        max_connections: config.db_pool_max_connections,
        ..DatabaseConfig::default()
    };
    let db_pool = ConnectionPool::new(db_config).await?;
    let pg_pool = db_pool.inner().clone();

    let manager = MigrationManager::new(pg_pool.clone());
    manager.init().await?;
    register_leaderboard_migrations(&manager);
    manager.run_pending().await?;

    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_conn = ConnectionManager::new(redis_client).await?;

    let store = Arc::new(PostgresStore::new(pg_pool.clone()));
    let cache = Arc::new(RedisRankingCache::new(redis_conn));
    let bus = Arc::new(RedisBroadcastBus::connect(&config.redis_url).await?);
    let directory = Arc::new(PostgresUserDirectory::new(pg_pool.clone()));
    let token_validator = Arc::new(SharedSecretValidator::new(&config.auth_shared_secret));

    let ingestion = Arc::new(ScoreIngestion::new(
        store.clone(),
        cache.clone(),
        bus.clone(),
        directory.clone(),
        config.max_broadcast_rank,
    ));
    let snapshot = Arc::new(SnapshotReader::new(store.clone(), cache.clone(), directory.clone()));

    let state = AppState {
        ingestion,
        snapshot,
        store,
        cache,
        bus,
        token_validator,
        config: Arc::new(config.clone()),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "listening");

    axum::serve(listener, router).await?;

    Ok(())
}
