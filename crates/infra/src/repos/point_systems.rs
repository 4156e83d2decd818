use sqlx::{PgPool, Result};
use tracing::warn;
use uuid::Uuid;

use scoring::{
    resolve_config, rules::validate_rule, BaseRates, ConditionalRule, PointSystemConfig,
    PointSystemTemplate, StageOverride,
};

use crate::models::{PointSystemRuleRow, PointSystemTemplateRow, StageOverrideRow};

pub struct PointSystemRepo {
    db: PgPool,
}

impl PointSystemRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolves the point system in effect for one match of `tournament_id`,
    /// optionally assigned to a stage. Returns `None` when the tournament
    /// does not exist.
    ///
    /// Call this on every match create or edit. Stage assignment varies per
    /// match and templates can change under a tournament, so the outcome
    /// must never be cached.
    pub async fn effective_config(
        &self,
        tournament_id: Uuid,
        stage_id: Option<Uuid>,
    ) -> Result<Option<PointSystemConfig>> {
        let tournament = sqlx::query_as::<_, TournamentScoringRow>(
            r#"
            SELECT points_per_win, points_per_draw, points_per_loss,
                   points_per_goal_scored, points_per_goal_conceded,
                   point_system_template_id
            FROM tournaments
            WHERE id = $1
            "#,
        )
        .bind(tournament_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(tournament) = tournament else {
            return Ok(None);
        };

        let template = match tournament.point_system_template_id {
            Some(template_id) => self.get_template(template_id).await?,
            None => None,
        };

        Ok(Some(resolve_config(
            tournament.rates(),
            template.as_ref(),
            stage_id,
        )))
    }

    /// Loads a template with its rules (in configured order) and stage
    /// overrides, mapped into engine types.
    pub async fn get_template(&self, id: Uuid) -> Result<Option<PointSystemTemplate>> {
        let row = sqlx::query_as::<_, PointSystemTemplateRow>(
            r#"
            SELECT id, name, description,
                   points_per_win, points_per_draw, points_per_loss,
                   points_per_goal_scored, points_per_goal_conceded,
                   created_at, updated_at
            FROM point_system_templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let rule_rows = sqlx::query_as::<_, PointSystemRuleRow>(
            r#"
            SELECT id, template_id, position, condition_type, operator,
                   threshold, point_adjustment, created_at, updated_at
            FROM point_system_rules
            WHERE template_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        let override_rows = sqlx::query_as::<_, StageOverrideRow>(
            r#"
            SELECT id, template_id, stage_id,
                   points_per_win, points_per_draw, points_per_loss,
                   points_per_goal_scored, points_per_goal_conceded,
                   created_at, updated_at
            FROM point_system_stage_overrides
            WHERE template_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        let rules = rule_rows.iter().filter_map(map_rule).collect();
        let stage_overrides = override_rows
            .into_iter()
            .map(|o| StageOverride {
                stage_id: o.stage_id,
                rates: BaseRates {
                    points_per_win: o.points_per_win,
                    points_per_draw: o.points_per_draw,
                    points_per_loss: o.points_per_loss,
                    points_per_goal_scored: o.points_per_goal_scored,
                    points_per_goal_conceded: o.points_per_goal_conceded,
                },
            })
            .collect();

        Ok(Some(PointSystemTemplate {
            id: row.id,
            rates: BaseRates {
                points_per_win: row.points_per_win,
                points_per_draw: row.points_per_draw,
                points_per_loss: row.points_per_loss,
                points_per_goal_scored: row.points_per_goal_scored,
                points_per_goal_conceded: row.points_per_goal_conceded,
            },
            rules,
            stage_overrides,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct TournamentScoringRow {
    points_per_win: i32,
    points_per_draw: i32,
    points_per_loss: i32,
    points_per_goal_scored: i32,
    points_per_goal_conceded: i32,
    point_system_template_id: Option<Uuid>,
}

impl TournamentScoringRow {
    fn rates(&self) -> BaseRates {
        BaseRates {
            points_per_win: self.points_per_win,
            points_per_draw: self.points_per_draw,
            points_per_loss: self.points_per_loss,
            points_per_goal_scored: self.points_per_goal_scored,
            points_per_goal_conceded: self.points_per_goal_conceded,
        }
    }
}

/// Maps a stored rule row into the engine's rule type. A row the engine
/// cannot express (unknown condition or operator text, or a clean-sheet
/// check that is not "equals zero") is logged and dropped so that it simply
/// never fires; bad configuration data must not block match recording.
fn map_rule(row: &PointSystemRuleRow) -> Option<ConditionalRule> {
    match validate_rule(&row.condition_type, &row.operator, row.threshold) {
        Some(condition) => Some(ConditionalRule {
            id: row.id,
            condition,
            point_adjustment: row.point_adjustment,
        }),
        None => {
            warn!(
                rule_id = %row.id,
                condition_type = %row.condition_type,
                operator = %row.operator,
                "skipping unmappable point-system rule"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scoring::{RuleCondition, RuleOperator};

    fn rule_row(condition_type: &str, operator: &str, threshold: i32) -> PointSystemRuleRow {
        PointSystemRuleRow {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            position: 0,
            condition_type: condition_type.to_string(),
            operator: operator.to_string(),
            threshold,
            point_adjustment: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn maps_threshold_rules() {
        let row = rule_row("GOAL_DIFFERENCE_THRESHOLD", "GREATER_THAN_OR_EQUAL", 3);
        let rule = map_rule(&row).unwrap();
        assert_eq!(rule.id, row.id);
        assert_eq!(
            rule.condition,
            RuleCondition::GoalDifference {
                op: RuleOperator::Ge,
                threshold: 3
            }
        );
    }

    #[test]
    fn maps_clean_sheet_only_as_equals_zero() {
        assert!(map_rule(&rule_row("CLEAN_SHEET", "EQUALS", 0)).is_some());
        assert!(map_rule(&rule_row("CLEAN_SHEET", "LESS_THAN", 1)).is_none());
        assert!(map_rule(&rule_row("CLEAN_SHEET", "EQUALS", 2)).is_none());
    }

    #[test]
    fn unknown_rows_are_dropped_not_fatal() {
        assert!(map_rule(&rule_row("YELLOW_CARDS_THRESHOLD", "EQUALS", 1)).is_none());
        assert!(map_rule(&rule_row("GOALS_SCORED_THRESHOLD", "WITHIN", 1)).is_none());
    }
}
