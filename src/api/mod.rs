//! The HTTP surface: three leaderboard routes plus `/health`, built on
//! top of the `service` layer.

pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod stream;

pub use routes::create_router;
