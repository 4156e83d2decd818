use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentRow {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    // Inline base rates, the pre-template scoring path.
    pub points_per_win: i32,
    pub points_per_draw: i32,
    pub points_per_loss: i32,
    pub points_per_goal_scored: i32,
    pub points_per_goal_conceded: i32,
    pub point_system_template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PointSystemTemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_per_win: i32,
    pub points_per_draw: i32,
    pub points_per_loss: i32,
    pub points_per_goal_scored: i32,
    pub points_per_goal_conceded: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One conditional rule of a template. `condition_type` and `operator` are
/// stored as text and mapped into the engine's closed condition type on
/// read; rows that do not map are skipped, never fatal.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PointSystemRuleRow {
    pub id: Uuid,
    pub template_id: Uuid,
    pub position: i32,
    pub condition_type: String,
    pub operator: String,
    pub threshold: i32,
    pub point_adjustment: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-stage base-rate override of a template. Overrides carry no rules.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StageOverrideRow {
    pub id: Uuid,
    pub template_id: Uuid,
    pub stage_id: Uuid,
    pub points_per_win: i32,
    pub points_per_draw: i32,
    pub points_per_loss: i32,
    pub points_per_goal_scored: i32,
    pub points_per_goal_conceded: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub stage_id: Option<Uuid>,
    pub played_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One participant's persisted result, including the point breakdown the
/// calculator produced when the result was recorded. `applied_rules` is a
/// JSONB array of the rule ids that fired, in evaluation order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchResultRow {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub outcome: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub base_points: i32,
    pub conditional_points: i32,
    pub points_earned: i32,
    pub applied_rules: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentPlayerRow {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub player_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived aggregate record for one player in one tournament. Never edited
/// by hand: every column is overwritten in full on recomputation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentPlayerStatsRow {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub player_id: Uuid,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub conditional_points: i32,
    pub total_points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
