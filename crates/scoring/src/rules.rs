use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comparison operator used by threshold conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl RuleOperator {
    pub fn compare(self, value: i32, threshold: i32) -> bool {
        match self {
            RuleOperator::Eq => value == threshold,
            RuleOperator::Gt => value > threshold,
            RuleOperator::Lt => value < threshold,
            RuleOperator::Ge => value >= threshold,
            RuleOperator::Le => value <= threshold,
        }
    }
}

/// The condition half of a conditional rule.
///
/// A closed set: the three threshold kinds compare a value derived from the
/// match result against `threshold`; `CleanSheet` carries nothing and holds
/// exactly when no goal was conceded. Combinations that cannot be expressed
/// here (e.g. a clean-sheet check with a `>` operator) are rejected at the
/// persistence boundary and never reach the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleCondition {
    GoalsScored { op: RuleOperator, threshold: i32 },
    GoalsConceded { op: RuleOperator, threshold: i32 },
    GoalDifference { op: RuleOperator, threshold: i32 },
    CleanSheet,
}

impl RuleCondition {
    /// Whether the condition holds for the given goal counts.
    ///
    /// The goal difference is signed, so a player who concedes more than
    /// they score can trigger a `GoalDifference { Lt, 0 }` rule.
    pub fn holds(&self, goals_scored: i32, goals_conceded: i32) -> bool {
        match *self {
            RuleCondition::GoalsScored { op, threshold } => op.compare(goals_scored, threshold),
            RuleCondition::GoalsConceded { op, threshold } => op.compare(goals_conceded, threshold),
            RuleCondition::GoalDifference { op, threshold } => {
                op.compare(goals_scored - goals_conceded, threshold)
            }
            RuleCondition::CleanSheet => goals_conceded == 0,
        }
    }
}

/// An extra point adjustment applied when its condition holds.
///
/// Rules are independent and purely additive: any number may fire for one
/// result and none suppresses another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub id: Uuid,
    pub condition: RuleCondition,
    pub point_adjustment: i32,
}

/// Validates a raw (condition kind, operator, threshold) triple as it would
/// arrive from a configuration write, returning the typed condition.
///
/// `CLEAN_SHEET` is only meaningful as "conceded equals zero", so any other
/// operator/threshold pairing for it is rejected. Intended for the
/// template-write path; the read path skips unmappable rows instead.
pub fn validate_rule(
    condition_type: &str,
    operator: &str,
    threshold: i32,
) -> Option<RuleCondition> {
    let op = match operator {
        "EQUALS" => RuleOperator::Eq,
        "GREATER_THAN" => RuleOperator::Gt,
        "LESS_THAN" => RuleOperator::Lt,
        "GREATER_THAN_OR_EQUAL" => RuleOperator::Ge,
        "LESS_THAN_OR_EQUAL" => RuleOperator::Le,
        _ => return None,
    };

    match condition_type {
        "GOALS_SCORED_THRESHOLD" => Some(RuleCondition::GoalsScored { op, threshold }),
        "GOALS_CONCEDED_THRESHOLD" => Some(RuleCondition::GoalsConceded { op, threshold }),
        "GOAL_DIFFERENCE_THRESHOLD" => Some(RuleCondition::GoalDifference { op, threshold }),
        "CLEAN_SHEET" if op == RuleOperator::Eq && threshold == 0 => {
            Some(RuleCondition::CleanSheet)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_use_standard_integer_comparison() {
        assert!(RuleOperator::Eq.compare(3, 3));
        assert!(!RuleOperator::Eq.compare(3, 4));
        assert!(RuleOperator::Gt.compare(4, 3));
        assert!(!RuleOperator::Gt.compare(3, 3));
        assert!(RuleOperator::Lt.compare(-2, 0));
        assert!(RuleOperator::Ge.compare(3, 3));
        assert!(RuleOperator::Le.compare(3, 3));
        assert!(!RuleOperator::Le.compare(4, 3));
    }

    #[test]
    fn clean_sheet_holds_iff_nothing_conceded() {
        assert!(RuleCondition::CleanSheet.holds(0, 0));
        assert!(RuleCondition::CleanSheet.holds(7, 0));
        assert!(!RuleCondition::CleanSheet.holds(7, 1));
    }

    #[test]
    fn goal_difference_is_signed() {
        let losing_badly = RuleCondition::GoalDifference {
            op: RuleOperator::Lt,
            threshold: 0,
        };
        assert!(losing_badly.holds(1, 4));
        assert!(!losing_badly.holds(2, 2));
        assert!(!losing_badly.holds(4, 1));
    }

    #[test]
    fn validate_rule_maps_known_triples() {
        assert_eq!(
            validate_rule("GOALS_SCORED_THRESHOLD", "GREATER_THAN_OR_EQUAL", 3),
            Some(RuleCondition::GoalsScored {
                op: RuleOperator::Ge,
                threshold: 3
            })
        );
        assert_eq!(
            validate_rule("CLEAN_SHEET", "EQUALS", 0),
            Some(RuleCondition::CleanSheet)
        );
    }

    #[test]
    fn validate_rule_rejects_bad_triples() {
        assert_eq!(validate_rule("GOALS_SCORED_THRESHOLD", "BETWEEN", 3), None);
        assert_eq!(validate_rule("RED_CARDS_THRESHOLD", "EQUALS", 1), None);
        // Clean sheet only makes sense as "conceded equals zero".
        assert_eq!(validate_rule("CLEAN_SHEET", "GREATER_THAN", 0), None);
        assert_eq!(validate_rule("CLEAN_SHEET", "EQUALS", 1), None);
    }
}
