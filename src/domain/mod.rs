//! Core value types shared by the store, cache, bus, and API layers.

use serde::{Deserialize, Serialize};

/// A participant's rank-ordered standing at read time.
///
/// Returned by snapshot reads and carried, unchanged in shape, as the
/// payload of a [`ScoreUpdateDelta`] broadcast onto the viewer-updates
/// topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    pub score: i64,
    pub rank: u64,
}

/// A page of the global ranking plus the total participant count observed
/// alongside it. `total` and the entries are read from the cache in two
/// separate operations and may disagree by a small number of concurrent
/// writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPage {
    pub entries: Vec<RankingEntry>,
    pub total: u64,
}

/// Single-entry delta published when a write lands within the broadcast
/// horizon. Identical in shape to [`RankingEntry`]; kept as a distinct
/// type alias so call sites document intent.
pub type ScoreUpdateDelta = RankingEntry;

/// A durable row: one participant's current score as of `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub user_id: String,
    pub username: String,
    pub score: i64,
}
