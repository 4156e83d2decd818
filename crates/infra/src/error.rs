use thiserror::Error;
use uuid::Uuid;

/// Failure modes of the match-mutation workflow.
///
/// A database error during statistics recomputation aborts the whole
/// transaction: the matching match write never commits, so derived stats
/// can only be observed consistent with the recorded results.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("tournament {0} not found")]
    TournamentNotFound(Uuid),

    #[error("match {0} not found")]
    MatchNotFound(Uuid),

    #[error("goal counts must be non-negative")]
    NegativeGoals,
}
