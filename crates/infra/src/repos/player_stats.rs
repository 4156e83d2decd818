use crate::{db::Db, models::TournamentPlayerStatsRow};
use sqlx::Result as SqlxResult;
use uuid::Uuid;

#[derive(Clone)]
pub struct PlayerStatsRepo {
    pool: Db,
}

impl PlayerStatsRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> SqlxResult<Option<TournamentPlayerStatsRow>> {
        sqlx::query_as::<_, TournamentPlayerStatsRow>(
            r#"
            SELECT id, tournament_id, player_id, matches_played, wins, draws, losses,
                   goals_scored, goals_conceded, conditional_points, total_points,
                   created_at, updated_at
            FROM tournament_player_stats
            WHERE tournament_id = $1 AND player_id = $2
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Standings for the public tournament page: points first, then goal
    /// difference and goals scored as tie-breakers.
    pub async fn standings(&self, tournament_id: Uuid) -> SqlxResult<Vec<TournamentPlayerStatsRow>> {
        sqlx::query_as::<_, TournamentPlayerStatsRow>(
            r#"
            SELECT id, tournament_id, player_id, matches_played, wins, draws, losses,
                   goals_scored, goals_conceded, conditional_points, total_points,
                   created_at, updated_at
            FROM tournament_player_stats
            WHERE tournament_id = $1
            ORDER BY total_points DESC,
                     goals_scored - goals_conceded DESC,
                     goals_scored DESC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }
}
