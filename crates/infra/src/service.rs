//! Match-mutation workflow. Every path that changes which results exist for
//! a player in a tournament recomputes that player's stats before its
//! transaction commits; there is no background reconciliation.

use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use scoring::{aggregate, calculate, MatchOutcome, MatchResultInput, ResultLine};

use crate::db::Db;
use crate::error::ServiceError;
use crate::repos::PointSystemRepo;

/// A match to record: one result per participant.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub tournament_id: Uuid,
    pub stage_id: Option<Uuid>,
    pub results: Vec<MatchResultInput>,
}

/// Replacement data for an existing match. The stage may differ from the
/// original, which can change the effective point system.
#[derive(Debug, Clone)]
pub struct UpdatedMatch {
    pub stage_id: Option<Uuid>,
    pub results: Vec<MatchResultInput>,
}

#[derive(Clone)]
pub struct ScoringService {
    db: Db,
}

impl ScoringService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Records a match: resolves the point system, scores every participant,
    /// persists the match with its per-result breakdowns and recomputes the
    /// participants' stats, all of which commits atomically.
    pub async fn record_match(&self, data: NewMatch) -> Result<Uuid, ServiceError> {
        check_goal_counts(&data.results)?;

        let config = PointSystemRepo::new(self.db.clone())
            .effective_config(data.tournament_id, data.stage_id)
            .await?
            .ok_or(ServiceError::TournamentNotFound(data.tournament_id))?;

        let mut tx = self.db.begin().await?;

        let match_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO matches (tournament_id, stage_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(data.tournament_id)
        .bind(data.stage_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_results(&mut tx, match_id, &data.results, &config).await?;

        let players: Vec<Uuid> = data.results.iter().map(|r| r.player_id).collect();
        recompute_players(&mut tx, data.tournament_id, &players).await?;

        tx.commit().await?;
        info!(%match_id, tournament_id = %data.tournament_id, "recorded match");
        Ok(match_id)
    }

    /// Replaces a match's results (and stage). Stats are recomputed for the
    /// union of the old and new participant sets: a player dropped by the
    /// edit must be zeroed or corrected just like one that was added.
    pub async fn update_match(
        &self,
        match_id: Uuid,
        data: UpdatedMatch,
    ) -> Result<(), ServiceError> {
        check_goal_counts(&data.results)?;

        let tournament_id = self
            .match_tournament(match_id)
            .await?
            .ok_or(ServiceError::MatchNotFound(match_id))?;

        // Re-resolved on every edit: the stage assignment may have changed
        // and the template may have been edited since recording.
        let config = PointSystemRepo::new(self.db.clone())
            .effective_config(tournament_id, data.stage_id)
            .await?
            .ok_or(ServiceError::TournamentNotFound(tournament_id))?;

        let mut tx = self.db.begin().await?;

        let old_players = match_player_ids(&mut tx, match_id).await?;

        sqlx::query("UPDATE matches SET stage_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(match_id)
            .bind(data.stage_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM match_results WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        insert_results(&mut tx, match_id, &data.results, &config).await?;

        let new_players: Vec<Uuid> = data.results.iter().map(|r| r.player_id).collect();
        let affected = affected_players(&old_players, &new_players);
        recompute_players(&mut tx, tournament_id, &affected).await?;

        tx.commit().await?;
        info!(%match_id, affected = affected.len(), "updated match");
        Ok(())
    }

    /// Deletes a match and its results, then recomputes the stats of its
    /// former participants.
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), ServiceError> {
        let tournament_id = self
            .match_tournament(match_id)
            .await?
            .ok_or(ServiceError::MatchNotFound(match_id))?;

        let mut tx = self.db.begin().await?;

        let players = match_player_ids(&mut tx, match_id).await?;

        sqlx::query("DELETE FROM match_results WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        recompute_players(&mut tx, tournament_id, &players).await?;

        tx.commit().await?;
        info!(%match_id, "deleted match");
        Ok(())
    }

    /// Removes a player from a tournament: their results and stats row go
    /// with them. Other participants' results are untouched, so nothing
    /// else needs recomputation.
    pub async fn remove_participant(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM match_results r
            USING matches m
            WHERE r.match_id = m.id AND m.tournament_id = $1 AND r.player_id = $2
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM tournament_player_stats WHERE tournament_id = $1 AND player_id = $2",
        )
        .bind(tournament_id)
        .bind(player_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tournament_players WHERE tournament_id = $1 AND player_id = $2")
            .bind(tournament_id)
            .bind(player_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(%tournament_id, %player_id, "removed participant");
        Ok(())
    }

    /// Full rebuild: recomputes every current participant. Same algorithm
    /// as the incremental path, just a wider player set. For when trust in
    /// the incremental history is lost, e.g. after a bulk correction.
    pub async fn rebuild_tournament(&self, tournament_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.db.begin().await?;

        let players = sqlx::query_scalar::<_, Uuid>(
            "SELECT player_id FROM tournament_players WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_all(&mut *tx)
        .await?;

        recompute_players(&mut tx, tournament_id, &players).await?;

        tx.commit().await?;
        info!(%tournament_id, players = players.len(), "rebuilt tournament stats");
        Ok(())
    }

    async fn match_tournament(&self, match_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT tournament_id FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&self.db)
            .await
    }
}

fn check_goal_counts(results: &[MatchResultInput]) -> Result<(), ServiceError> {
    if results
        .iter()
        .any(|r| r.goals_scored < 0 || r.goals_conceded < 0)
    {
        return Err(ServiceError::NegativeGoals);
    }
    Ok(())
}

/// Union of the old and new participant sets, first occurrence order.
fn affected_players(old: &[Uuid], new: &[Uuid]) -> Vec<Uuid> {
    let mut union = old.to_vec();
    for id in new {
        if !union.contains(id) {
            union.push(*id);
        }
    }
    union
}

async fn match_player_ids(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT player_id FROM match_results WHERE match_id = $1")
        .bind(match_id)
        .fetch_all(&mut **tx)
        .await
}

async fn insert_results(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    results: &[MatchResultInput],
    config: &scoring::PointSystemConfig,
) -> Result<(), sqlx::Error> {
    for input in results {
        let breakdown = calculate(input, config);
        debug!(
            player_id = %input.player_id,
            total = breakdown.total_points,
            fired = breakdown.applied_rules.len(),
            "scored result"
        );

        sqlx::query(
            r#"
            INSERT INTO match_results
                (match_id, player_id, outcome, goals_scored, goals_conceded,
                 base_points, conditional_points, points_earned, applied_rules)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(match_id)
        .bind(input.player_id)
        .bind(input.outcome.as_str())
        .bind(input.goals_scored)
        .bind(input.goals_conceded)
        .bind(breakdown.base_points)
        .bind(breakdown.conditional_points)
        .bind(breakdown.total_points)
        .bind(serde_json::json!(breakdown.applied_rules))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ResultLineRow {
    player_id: Uuid,
    outcome: String,
    goals_scored: i32,
    goals_conceded: i32,
    conditional_points: i32,
    points_earned: i32,
}

/// Recomputes `tournament_player_stats` for the given players from their
/// persisted results. Full replace per row, never an increment, so it stays
/// correct under edits and deletions. Runs inside the caller's transaction.
async fn recompute_players(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: Uuid,
    players: &[Uuid],
) -> Result<(), sqlx::Error> {
    if players.is_empty() {
        return Ok(());
    }

    // Serializes concurrent recomputes per (tournament, player): a parallel
    // mutation touching the same rows waits here instead of losing its
    // update to a later full replace.
    sqlx::query(
        r#"
        SELECT id FROM tournament_player_stats
        WHERE tournament_id = $1 AND player_id = ANY($2)
        FOR UPDATE
        "#,
    )
    .bind(tournament_id)
    .bind(players)
    .execute(&mut **tx)
    .await?;

    let rows = sqlx::query_as::<_, ResultLineRow>(
        r#"
        SELECT r.player_id, r.outcome, r.goals_scored, r.goals_conceded,
               r.conditional_points, r.points_earned
        FROM match_results r
        JOIN matches m ON m.id = r.match_id
        WHERE m.tournament_id = $1 AND r.player_id = ANY($2)
        "#,
    )
    .bind(tournament_id)
    .bind(players)
    .fetch_all(&mut **tx)
    .await?;

    let lines: Vec<ResultLine> = rows
        .into_iter()
        .filter_map(|row| match MatchOutcome::parse(&row.outcome) {
            Some(outcome) => Some(ResultLine {
                player_id: row.player_id,
                outcome,
                goals_scored: row.goals_scored,
                goals_conceded: row.goals_conceded,
                conditional_points: row.conditional_points,
                points_earned: row.points_earned,
            }),
            None => {
                warn!(player_id = %row.player_id, outcome = %row.outcome,
                      "skipping result with unknown outcome");
                None
            }
        })
        .collect();

    for (player_id, totals) in aggregate(players, &lines) {
        sqlx::query(
            r#"
            INSERT INTO tournament_player_stats
                (tournament_id, player_id, matches_played, wins, draws, losses,
                 goals_scored, goals_conceded, conditional_points, total_points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (tournament_id, player_id) DO UPDATE SET
                matches_played = EXCLUDED.matches_played,
                wins = EXCLUDED.wins,
                draws = EXCLUDED.draws,
                losses = EXCLUDED.losses,
                goals_scored = EXCLUDED.goals_scored,
                goals_conceded = EXCLUDED.goals_conceded,
                conditional_points = EXCLUDED.conditional_points,
                total_points = EXCLUDED.total_points,
                updated_at = NOW()
            "#,
        )
        .bind(tournament_id)
        .bind(player_id)
        .bind(totals.matches_played)
        .bind(totals.wins)
        .bind(totals.draws)
        .bind(totals.losses)
        .bind(totals.goals_scored)
        .bind(totals.goals_conceded)
        .bind(totals.conditional_points)
        .bind(totals.total_points)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affected_union_covers_both_sides_once() {
        let kept = Uuid::new_v4();
        let dropped = Uuid::new_v4();
        let added = Uuid::new_v4();

        let union = affected_players(&[kept, dropped], &[kept, added]);
        assert_eq!(union, vec![kept, dropped, added]);
    }

    #[test]
    fn affected_union_of_empty_sets_is_empty() {
        assert!(affected_players(&[], &[]).is_empty());
    }

    #[test]
    fn negative_goals_are_rejected_before_any_write() {
        let input = MatchResultInput {
            player_id: Uuid::new_v4(),
            outcome: MatchOutcome::Win,
            goals_scored: -1,
            goals_conceded: 0,
        };
        assert!(matches!(
            check_goal_counts(&[input]),
            Err(ServiceError::NegativeGoals)
        ));
    }
}
