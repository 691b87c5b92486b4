//! The core service layer: the two operations the API surface exposes,
//! built on top of the storage and bus traits rather than any concrete
//! backend.

pub mod broadcaster;
pub mod ingestion;
pub mod snapshot;

pub use broadcaster::DeltaBroadcaster;
pub use ingestion::{IngestionError, ScoreIngestion};
pub use snapshot::{SnapshotError, SnapshotReader};
