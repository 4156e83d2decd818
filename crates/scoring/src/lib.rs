//! Pure match-scoring engine: point calculation, point-system configuration
//! resolution, and tournament statistics aggregation.
//!
//! Nothing in this crate touches a database. The `infra` crate loads rows,
//! feeds them through these functions and writes the outputs back.

pub mod config;
pub mod points;
pub mod rules;
pub mod stats;

pub use config::{resolve_config, BaseRates, PointSystemConfig, PointSystemTemplate, StageOverride};
pub use points::{calculate, MatchOutcome, MatchResultInput, PointBreakdown};
pub use rules::{ConditionalRule, RuleCondition, RuleOperator};
pub use stats::{aggregate, PlayerTotals, ResultLine};
