//! Tennis scoring rules: points roll into games, games into sets.
//!
//! Everything here is pure. [`ScoreState::award_point`] is the single forward
//! transition; undo lives with the history stack in [`super::history`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the two competitors in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// First competitor (player 1 / challenger).
    SideA,
    /// Second competitor (player 2 / challenged).
    SideB,
}

impl Side {
    /// The other side of the net.
    pub fn opponent(self) -> Self {
        match self {
            Side::SideA => Side::SideB,
            Side::SideB => Side::SideA,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::SideA => f.write_str("side_a"),
            Side::SideB => f.write_str("side_b"),
        }
    }
}

/// A pair of counters, one per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tally {
    /// Counter for [`Side::SideA`].
    pub a: u32,
    /// Counter for [`Side::SideB`].
    pub b: u32,
}

impl Tally {
    /// Build a tally from explicit counts.
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Read the counter of `side`.
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::SideA => self.a,
            Side::SideB => self.b,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::SideA => &mut self.a,
            Side::SideB => &mut self.b,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Running score of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Points within the current game.
    pub points: Tally,
    /// Games within the current set.
    pub games: Tally,
    /// Finished sets, oldest first. Only ever appended to.
    pub completed_sets: Vec<Tally>,
    /// 1-based index of the set in progress.
    pub current_set: u32,
    /// Both sides on at least three points and within one of each other.
    pub is_deuce: bool,
    /// Side holding advantage; always `None` outside deuce.
    pub advantage: Option<Side>,
    /// Side currently serving.
    pub serving: Side,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            points: Tally::default(),
            games: Tally::default(),
            completed_sets: Vec::new(),
            current_set: 1,
            is_deuce: false,
            advantage: None,
            serving: Side::SideA,
        }
    }
}

impl ScoreState {
    /// Fresh score for a match that has not started: all zeros, side A serving.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the state after `side` wins a point.
    pub fn award_point(&self, side: Side) -> ScoreState {
        let mut next = self.clone();
        let opponent = side.opponent();

        *next.points.get_mut(side) += 1;
        let won = next.points.get(side);
        let lost = next.points.get(opponent);

        if won >= 4 && won >= lost + 2 {
            *next.games.get_mut(side) += 1;
            next.points.reset();
            next.is_deuce = false;
            next.advantage = None;
            next.serving = next.serving.opponent();

            let games = next.games.get(side);
            let opponent_games = next.games.get(opponent);
            // 7 games closes the set whatever the opponent holds.
            if (games >= 6 && games >= opponent_games + 2) || games == 7 {
                next.completed_sets.push(next.games);
                next.games.reset();
                next.current_set += 1;
            }
        } else if won >= 3 && lost >= 3 {
            if won == lost {
                next.is_deuce = true;
                next.advantage = None;
            } else if won == lost + 1 {
                next.is_deuce = true;
                next.advantage = Some(side);
            }
        }

        next
    }

    /// Display label of `side`'s points in the current game.
    pub fn label(&self, side: Side) -> &'static str {
        point_label(self.points.get(side), self.is_deuce, self.advantage, side)
    }

    /// Summarise the completed sets. See [`MatchOutcome`].
    pub fn finalize(&self) -> MatchOutcome {
        let mut sets_won = Tally::default();
        for set in &self.completed_sets {
            if set.a > set.b {
                sets_won.a += 1;
            } else if set.b > set.a {
                sets_won.b += 1;
            }
        }

        let winner = if sets_won.a > sets_won.b {
            Some(Side::SideA)
        } else if sets_won.b > sets_won.a {
            Some(Side::SideB)
        } else {
            None
        };

        MatchOutcome {
            winner,
            sets_won_a: sets_won.a,
            sets_won_b: sets_won.b,
            score_summary: score_summary(&self.completed_sets),
        }
    }
}

/// Result of a match as far as the completed sets tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Side with strictly more sets won, `None` when sets are level.
    pub winner: Option<Side>,
    /// Sets won by side A.
    pub sets_won_a: u32,
    /// Sets won by side B.
    pub sets_won_b: u32,
    /// Per-set game counts, side A first, e.g. `6-4,7-5`.
    pub score_summary: String,
}

/// Tennis label for a point count.
///
/// Inside deuce only the side holding advantage shows `AD`; everyone else,
/// including both sides at deuce proper, shows `40`.
pub fn point_label(points: u32, is_deuce: bool, advantage: Option<Side>, side: Side) -> &'static str {
    if is_deuce {
        return if advantage == Some(side) { "AD" } else { "40" };
    }

    match points {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

fn score_summary(sets: &[Tally]) -> String {
    sets.iter()
        .map(|set| format!("{}-{}", set.a, set.b))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &ScoreState, points: &[Side]) -> ScoreState {
        points
            .iter()
            .fold(state.clone(), |acc, side| acc.award_point(*side))
    }

    fn win_game(state: &ScoreState, side: Side) -> ScoreState {
        play(state, &[side; 4])
    }

    fn with_games(a: u32, b: u32) -> ScoreState {
        ScoreState {
            games: Tally::new(a, b),
            ..ScoreState::new()
        }
    }

    #[test]
    fn initial_state_is_zeroed() {
        let state = ScoreState::new();
        assert_eq!(state.points, Tally::new(0, 0));
        assert_eq!(state.games, Tally::new(0, 0));
        assert!(state.completed_sets.is_empty());
        assert_eq!(state.current_set, 1);
        assert!(!state.is_deuce);
        assert_eq!(state.advantage, None);
        assert_eq!(state.serving, Side::SideA);
    }

    #[test]
    fn points_increase_by_one_before_game() {
        let mut state = ScoreState::new();
        for expected in 1..=3 {
            state = state.award_point(Side::SideB);
            assert_eq!(state.points.get(Side::SideB), expected);
            assert_eq!(state.points.get(Side::SideA), 0);
        }
    }

    #[test]
    fn four_straight_points_win_a_game() {
        let state = win_game(&ScoreState::new(), Side::SideA);
        assert_eq!(state.points, Tally::new(0, 0));
        assert_eq!(state.games, Tally::new(1, 0));
        assert!(state.completed_sets.is_empty());
        assert_eq!(state.current_set, 1);
        assert_eq!(state.serving, Side::SideB);
    }

    #[test]
    fn serve_does_not_change_mid_game() {
        let state = play(&ScoreState::new(), &[Side::SideA, Side::SideB, Side::SideA]);
        assert_eq!(state.serving, Side::SideA);
    }

    #[test]
    fn deuce_then_advantage_then_deuce_again() {
        use Side::*;
        let state = play(&ScoreState::new(), &[SideA, SideA, SideA, SideB, SideB, SideB]);
        assert_eq!(state.points, Tally::new(3, 3));
        assert!(state.is_deuce);
        assert_eq!(state.advantage, None);

        let state = state.award_point(SideA);
        assert_eq!(state.points, Tally::new(4, 3));
        assert!(state.is_deuce);
        assert_eq!(state.advantage, Some(SideA));

        let state = state.award_point(SideB);
        assert_eq!(state.points, Tally::new(4, 4));
        assert!(state.is_deuce);
        assert_eq!(state.advantage, None);
        assert_eq!(state.games, Tally::new(0, 0));
    }

    #[test]
    fn advantage_converted_wins_game() {
        use Side::*;
        let state = play(
            &ScoreState::new(),
            &[SideA, SideA, SideA, SideB, SideB, SideB, SideB, SideB],
        );
        assert_eq!(state.games, Tally::new(0, 1));
        assert_eq!(state.points, Tally::new(0, 0));
        assert!(!state.is_deuce);
        assert_eq!(state.advantage, None);
        assert_eq!(state.serving, Side::SideB);
    }

    #[test]
    fn six_four_closes_set() {
        let state = win_game(&with_games(5, 4), Side::SideA);
        assert_eq!(state.completed_sets, vec![Tally::new(6, 4)]);
        assert_eq!(state.games, Tally::new(0, 0));
        assert_eq!(state.current_set, 2);
    }

    #[test]
    fn six_five_does_not_close_set() {
        let state = win_game(&with_games(5, 5), Side::SideA);
        assert!(state.completed_sets.is_empty());
        assert_eq!(state.games, Tally::new(6, 5));
    }

    #[test]
    fn seven_six_closes_set() {
        let state = win_game(&with_games(6, 6), Side::SideA);
        assert_eq!(state.completed_sets, vec![Tally::new(7, 6)]);
        assert_eq!(state.games, Tally::new(0, 0));
        assert_eq!(state.current_set, 2);
    }

    #[test]
    fn seventh_game_closes_set_regardless_of_opponent() {
        let state = win_game(&with_games(6, 0), Side::SideA);
        assert_eq!(state.completed_sets, vec![Tally::new(7, 0)]);
    }

    #[test]
    fn side_b_set_is_recorded_with_side_a_first() {
        let state = win_game(&with_games(3, 5), Side::SideB);
        assert_eq!(state.completed_sets, vec![Tally::new(3, 6)]);
    }

    #[test]
    fn point_labels() {
        assert_eq!(point_label(0, false, None, Side::SideA), "0");
        assert_eq!(point_label(1, false, None, Side::SideA), "15");
        assert_eq!(point_label(2, false, None, Side::SideA), "30");
        assert_eq!(point_label(3, false, None, Side::SideA), "40");
        assert_eq!(point_label(5, false, None, Side::SideA), "40");
        assert_eq!(point_label(3, true, Some(Side::SideA), Side::SideA), "AD");
        assert_eq!(point_label(3, true, Some(Side::SideA), Side::SideB), "40");
        assert_eq!(point_label(4, true, None, Side::SideB), "40");
    }

    #[test]
    fn finalize_counts_sets_and_picks_winner() {
        let state = ScoreState {
            completed_sets: vec![Tally::new(6, 4), Tally::new(3, 6), Tally::new(7, 5)],
            ..ScoreState::new()
        };
        let outcome = state.finalize();
        assert_eq!(outcome.sets_won_a, 2);
        assert_eq!(outcome.sets_won_b, 1);
        assert_eq!(outcome.winner, Some(Side::SideA));
        assert_eq!(outcome.score_summary, "6-4,3-6,7-5");
    }

    #[test]
    fn finalize_on_level_sets_has_no_winner() {
        let state = ScoreState {
            completed_sets: vec![Tally::new(6, 4), Tally::new(3, 6)],
            ..ScoreState::new()
        };
        let outcome = state.finalize();
        assert_eq!(outcome.winner, None);

        let outcome = ScoreState::new().finalize();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.score_summary, "");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn side() -> impl Strategy<Value = Side> {
            prop_oneof![Just(Side::SideA), Just(Side::SideB)]
        }

        proptest! {
            #[test]
            fn points_increment_or_game_resolves(seq in prop::collection::vec(side(), 0..200), next in side()) {
                let before = seq.iter().fold(ScoreState::new(), |s, p| s.award_point(*p));
                let after = before.award_point(next);
                let game_won = after.points == Tally::default();
                if game_won {
                    prop_assert_ne!(after.serving, before.serving);
                    prop_assert!(before.points.get(next) + 1 >= 4);
                    prop_assert!(before.points.get(next) + 1 >= before.points.get(next.opponent()) + 2);
                } else {
                    prop_assert_eq!(after.points.get(next), before.points.get(next) + 1);
                    prop_assert_eq!(after.serving, before.serving);
                }
            }

            #[test]
            fn advantage_only_during_deuce(seq in prop::collection::vec(side(), 0..300)) {
                let mut state = ScoreState::new();
                for point in seq {
                    let sets_before = state.completed_sets.clone();
                    state = state.award_point(point);
                    prop_assert!(state.is_deuce || state.advantage.is_none());
                    prop_assert!(state.completed_sets.starts_with(&sets_before));
                }
            }

            #[test]
            fn finalize_accounts_for_every_set(seq in prop::collection::vec(side(), 0..400)) {
                let state = seq.iter().fold(ScoreState::new(), |s, p| s.award_point(*p));
                let outcome = state.finalize();
                prop_assert_eq!(
                    (outcome.sets_won_a + outcome.sets_won_b) as usize,
                    state.completed_sets.len()
                );
                match outcome.winner {
                    Some(Side::SideA) => prop_assert!(outcome.sets_won_a > outcome.sets_won_b),
                    Some(Side::SideB) => prop_assert!(outcome.sets_won_b > outcome.sets_won_a),
                    None => prop_assert_eq!(outcome.sets_won_a, outcome.sets_won_b),
                }
            }
        }
    }
}
