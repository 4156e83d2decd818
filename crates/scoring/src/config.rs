use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::ConditionalRule;

/// The five required scoring rates. Any of them may be negative; conceding
/// is typically rated zero or below but nothing here enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRates {
    pub points_per_win: i32,
    pub points_per_draw: i32,
    pub points_per_loss: i32,
    pub points_per_goal_scored: i32,
    pub points_per_goal_conceded: i32,
}

/// The scoring rules in effect for one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSystemConfig {
    pub rates: BaseRates,
    /// Evaluated in order; order only matters for the applied-rules audit
    /// list, never for the totals.
    pub rules: Vec<ConditionalRule>,
}

impl From<BaseRates> for PointSystemConfig {
    fn from(rates: BaseRates) -> Self {
        Self { rates, rules: Vec::new() }
    }
}

/// Per-stage replacement of the base rates. Overrides never carry
/// conditional rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOverride {
    pub stage_id: Uuid,
    pub rates: BaseRates,
}

/// A named, reusable point system shared across tournaments, optionally
/// with stage-specific base-rate overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSystemTemplate {
    pub id: Uuid,
    pub rates: BaseRates,
    pub rules: Vec<ConditionalRule>,
    pub stage_overrides: Vec<StageOverride>,
}

impl PointSystemTemplate {
    fn override_for(&self, stage_id: Uuid) -> Option<&StageOverride> {
        self.stage_overrides.iter().find(|o| o.stage_id == stage_id)
    }
}

/// Picks the effective config for one match, by strict precedence:
///
/// 1. Template referenced and the match's stage has an override in it:
///    the override's rates alone, no conditional rules.
/// 2. Template referenced: the template's rates plus all its rules.
/// 3. Otherwise the tournament's own inline rates, no rules. This is the
///    path for tournaments predating templates.
///
/// Callers must re-run this on every match create or edit rather than
/// caching it per tournament: stage assignment varies per match and
/// templates are edited independently of tournaments.
pub fn resolve_config(
    tournament_rates: BaseRates,
    template: Option<&PointSystemTemplate>,
    stage_id: Option<Uuid>,
) -> PointSystemConfig {
    match template {
        Some(template) => {
            if let Some(ov) = stage_id.and_then(|s| template.override_for(s)) {
                PointSystemConfig::from(ov.rates)
            } else {
                PointSystemConfig {
                    rates: template.rates,
                    rules: template.rules.clone(),
                }
            }
        }
        None => PointSystemConfig::from(tournament_rates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleCondition, RuleOperator};

    fn rates(win: i32) -> BaseRates {
        BaseRates {
            points_per_win: win,
            points_per_draw: 1,
            points_per_loss: 0,
            points_per_goal_scored: 0,
            points_per_goal_conceded: 0,
        }
    }

    fn template_with_override(stage_id: Uuid) -> PointSystemTemplate {
        PointSystemTemplate {
            id: Uuid::new_v4(),
            rates: rates(3),
            rules: vec![ConditionalRule {
                id: Uuid::new_v4(),
                condition: RuleCondition::GoalsScored {
                    op: RuleOperator::Ge,
                    threshold: 5,
                },
                point_adjustment: 1,
            }],
            stage_overrides: vec![StageOverride {
                stage_id,
                rates: rates(10),
            }],
        }
    }

    #[test]
    fn stage_override_wins_and_drops_rules() {
        let stage_id = Uuid::new_v4();
        let template = template_with_override(stage_id);

        let cfg = resolve_config(rates(2), Some(&template), Some(stage_id));
        assert_eq!(cfg.rates.points_per_win, 10);
        assert!(cfg.rules.is_empty());
    }

    #[test]
    fn template_applies_when_stage_has_no_override() {
        let template = template_with_override(Uuid::new_v4());

        let cfg = resolve_config(rates(2), Some(&template), Some(Uuid::new_v4()));
        assert_eq!(cfg.rates.points_per_win, 3);
        assert_eq!(cfg.rules.len(), 1);
    }

    #[test]
    fn template_applies_when_match_is_stageless() {
        let template = template_with_override(Uuid::new_v4());

        let cfg = resolve_config(rates(2), Some(&template), None);
        assert_eq!(cfg.rates.points_per_win, 3);
        assert_eq!(cfg.rules.len(), 1);
    }

    #[test]
    fn inline_rates_are_the_fallback() {
        let cfg = resolve_config(rates(2), None, Some(Uuid::new_v4()));
        assert_eq!(cfg.rates.points_per_win, 2);
        assert!(cfg.rules.is_empty());
    }
}
