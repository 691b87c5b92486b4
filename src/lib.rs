//! # Pinnacle Board
//!
//! A real-time global leaderboard service: score ingestion against a
//! durable Postgres store, a Redis sorted-set ranking cache kept
//! eventually consistent with it, and an SSE fan-out of score-delta
//! events to connected viewers.
//!
//! ## Architecture
//!
//! - `domain`: shared value types (`RankingEntry`, `ScoreUpdateDelta`, ...)
//! - `store`: the durable store abstraction and its Postgres backing
//! - `cache`: the ranking cache abstraction and its Redis sorted-set backing
//! - `bus`: the broadcast bus abstraction and its Redis Pub/Sub backing
//! - `directory`: username lookups, backed by the externally-populated `users` table
//! - `service`: the write path (`ScoreIngestion`) and read path (`SnapshotReader`)
//! - `auth`: bearer-token validation
//! - `database`: connection pooling and schema migrations
//! - `api`: the HTTP surface
//! - `config`: environment-driven configuration
//! - `state`: the shared `AppState` handed to every handler

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod auth;
pub mod bus;
pub mod cache;
pub mod config;
pub mod database;
pub mod directory;
pub mod domain;
pub mod service;
pub mod state;
pub mod store;

#[cfg(feature = "test-support")]
pub mod testutil;

/// Crate version, for the `/health` response and startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, for the startup banner.
pub const NAME: &str = env!("CARGO_PKG_NAME");
