use std::collections::HashMap;

use uuid::Uuid;

use crate::points::MatchOutcome;

/// One persisted match result as the aggregator reads it back.
///
/// `points_earned` is the total the calculator produced when the result was
/// recorded; aggregation sums it as-is and never re-derives scoring rules.
#[derive(Debug, Clone, Copy)]
pub struct ResultLine {
    pub player_id: Uuid,
    pub outcome: MatchOutcome,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub conditional_points: i32,
    pub points_earned: i32,
}

/// A player's aggregate record within one tournament. Derived state,
/// recomputed in full and never incremented in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub conditional_points: i32,
    pub total_points: i32,
}

impl PlayerTotals {
    fn add(&mut self, line: &ResultLine) {
        self.matches_played += 1;
        match line.outcome {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::Loss => self.losses += 1,
        }
        self.goals_scored += line.goals_scored;
        self.goals_conceded += line.goals_conceded;
        self.conditional_points += line.conditional_points;
        self.total_points += line.points_earned;
    }
}

/// Folds result lines into per-player totals.
///
/// Every requested player gets an entry, in the order requested. A player
/// with no lines gets all-zero totals, which is what zeroes a stats row out
/// after their last result in the tournament is deleted. Lines for players
/// outside the requested set are ignored.
pub fn aggregate(player_ids: &[Uuid], lines: &[ResultLine]) -> Vec<(Uuid, PlayerTotals)> {
    let mut by_player: HashMap<Uuid, PlayerTotals> = player_ids
        .iter()
        .map(|id| (*id, PlayerTotals::default()))
        .collect();

    for line in lines {
        if let Some(totals) = by_player.get_mut(&line.player_id) {
            totals.add(line);
        }
    }

    player_ids
        .iter()
        .filter_map(|id| by_player.remove(id).map(|t| (*id, t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(player_id: Uuid, outcome: MatchOutcome, points: i32) -> ResultLine {
        ResultLine {
            player_id,
            outcome,
            goals_scored: 2,
            goals_conceded: 1,
            conditional_points: 0,
            points_earned: points,
        }
    }

    #[test]
    fn sums_one_players_results() {
        let p = Uuid::new_v4();
        let lines = vec![line(p, MatchOutcome::Win, 6), line(p, MatchOutcome::Loss, 1)];

        let out = aggregate(&[p], &lines);
        assert_eq!(out.len(), 1);
        let (_, totals) = out[0];
        assert_eq!(totals.matches_played, 2);
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.draws, 0);
        assert_eq!(totals.losses, 1);
        assert_eq!(totals.goals_scored, 4);
        assert_eq!(totals.goals_conceded, 2);
        assert_eq!(totals.total_points, 7);
    }

    #[test]
    fn requested_player_with_no_lines_zeroes_out() {
        let p = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let lines = vec![line(p, MatchOutcome::Draw, 1)];

        let out = aggregate(&[p, gone], &lines);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], (gone, PlayerTotals::default()));
    }

    #[test]
    fn lines_for_unrequested_players_are_ignored() {
        let p = Uuid::new_v4();
        let other = Uuid::new_v4();
        let lines = vec![
            line(p, MatchOutcome::Win, 6),
            line(other, MatchOutcome::Win, 6),
        ];

        let out = aggregate(&[p], &lines);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.matches_played, 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let p = Uuid::new_v4();
        let q = Uuid::new_v4();
        let lines = vec![
            line(p, MatchOutcome::Win, 6),
            line(q, MatchOutcome::Loss, 0),
            line(p, MatchOutcome::Draw, 2),
        ];

        let first = aggregate(&[p, q], &lines);
        let second = aggregate(&[p, q], &lines);
        assert_eq!(first, second);
    }

    #[test]
    fn deleting_a_result_and_reaggregating_drops_it() {
        let p = Uuid::new_v4();
        let mut lines = vec![line(p, MatchOutcome::Win, 6), line(p, MatchOutcome::Loss, 1)];

        lines.remove(0);
        let (_, totals) = aggregate(&[p], &lines)[0];
        assert_eq!(totals.matches_played, 1);
        assert_eq!(totals.wins, 0);
        assert_eq!(totals.losses, 1);
        assert_eq!(totals.total_points, 1);
    }

    #[test]
    fn conditional_subtotal_is_carried() {
        let p = Uuid::new_v4();
        let mut a = line(p, MatchOutcome::Win, 8);
        a.conditional_points = 2;
        let mut b = line(p, MatchOutcome::Win, 7);
        b.conditional_points = 1;

        let (_, totals) = aggregate(&[p], &[a, b])[0];
        assert_eq!(totals.conditional_points, 3);
        assert_eq!(totals.total_points, 15);
    }
}
