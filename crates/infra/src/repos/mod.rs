pub mod match_results;
pub mod player_stats;
pub mod point_systems;
pub mod tournaments;

pub use match_results::MatchResultRepo;
pub use player_stats::PlayerStatsRepo;
pub use point_systems::PointSystemRepo;
pub use tournaments::TournamentRepo;
