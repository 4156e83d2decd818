//! Persistence layer for the scoring engine: Postgres row models, read
//! repos, and the transactional match-mutation workflow that keeps
//! `tournament_player_stats` consistent with the recorded results.

pub mod db;
pub mod error;
pub mod models;
pub mod repos;
pub mod service;

pub use error::ServiceError;
pub use service::ScoringService;
