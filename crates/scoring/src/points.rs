use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PointSystemConfig;

/// One participant's result in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// Text form used for the `outcome` column.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Win => "win",
            MatchOutcome::Draw => "draw",
            MatchOutcome::Loss => "loss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "win" => Some(MatchOutcome::Win),
            "draw" => Some(MatchOutcome::Draw),
            "loss" => Some(MatchOutcome::Loss),
            _ => None,
        }
    }
}

/// One participant's outcome in one match, as handed in by the caller.
///
/// Goal counts are validated non-negative upstream; the calculator itself is
/// plain arithmetic and imposes no sign constraint.
#[derive(Debug, Clone, Copy)]
pub struct MatchResultInput {
    pub player_id: Uuid,
    pub outcome: MatchOutcome,
    pub goals_scored: i32,
    pub goals_conceded: i32,
}

/// The point breakdown for a single match result. This is what gets
/// persisted on the result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointBreakdown {
    pub base_points: i32,
    pub conditional_points: i32,
    pub total_points: i32,
    /// Rules that fired, in evaluation order. Auditing only; the order never
    /// affects the totals.
    pub applied_rules: Vec<Uuid>,
}

/// Computes the point breakdown for one match result under one config.
///
/// Pure and total: no I/O, no failure modes. Exactly one outcome rate
/// applies; every conditional rule whose condition holds adds its
/// adjustment, and rules never suppress each other.
pub fn calculate(result: &MatchResultInput, config: &PointSystemConfig) -> PointBreakdown {
    let outcome_points = match result.outcome {
        MatchOutcome::Win => config.rates.points_per_win,
        MatchOutcome::Draw => config.rates.points_per_draw,
        MatchOutcome::Loss => config.rates.points_per_loss,
    };

    let base_points = outcome_points
        + result.goals_scored * config.rates.points_per_goal_scored
        + result.goals_conceded * config.rates.points_per_goal_conceded;

    let mut conditional_points = 0;
    let mut applied_rules = Vec::new();
    for rule in &config.rules {
        if rule
            .condition
            .holds(result.goals_scored, result.goals_conceded)
        {
            conditional_points += rule.point_adjustment;
            applied_rules.push(rule.id);
        }
    }

    PointBreakdown {
        base_points,
        conditional_points,
        total_points: base_points + conditional_points,
        applied_rules,
    }
}
