use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::models::{MatchResultRow, MatchRow};

pub struct MatchResultRepo {
    db: PgPool,
}

impl MatchResultRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_match(&self, id: Uuid) -> Result<Option<MatchRow>> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, tournament_id, stage_id, played_at, created_at, updated_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn get_by_match(&self, match_id: Uuid) -> Result<Vec<MatchResultRow>> {
        let rows = sqlx::query_as::<_, MatchResultRow>(
            r#"
            SELECT id, match_id, player_id, outcome, goals_scored, goals_conceded,
                   base_points, conditional_points, points_earned, applied_rules,
                   created_at, updated_at
            FROM match_results
            WHERE match_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn get_player_results(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<Vec<MatchResultRow>> {
        let rows = sqlx::query_as::<_, MatchResultRow>(
            r#"
            SELECT r.id, r.match_id, r.player_id, r.outcome, r.goals_scored, r.goals_conceded,
                   r.base_points, r.conditional_points, r.points_earned, r.applied_rules,
                   r.created_at, r.updated_at
            FROM match_results r
            JOIN matches m ON m.id = r.match_id
            WHERE m.tournament_id = $1 AND r.player_id = $2
            ORDER BY m.played_at ASC
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
