//! High score leaderboard ranking
//!
//! One leaderboard per level, top 10, fewest bounces first. The ranking
//! functions are pure: they never touch storage, see
//! `persistence::scores` for that.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Player's name
    pub name: String,
    /// Total bounces of the finished run (lower is better)
    pub score: u32,
}

impl Score {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Rank a candidate into a leaderboard.
///
/// Returns the new list and whether the candidate is still in it. A full
/// board only accepts scores strictly better than its worst entry; ties
/// keep insertion order, so an equal newcomer ranks below existing entries.
pub fn add_score(scores: &[Score], candidate: Score) -> (Vec<Score>, bool) {
    let should_add = scores.len() < MAX_HIGH_SCORES
        || scores
            .iter()
            .map(|s| s.score)
            .max()
            .is_some_and(|worst| candidate.score < worst);

    let mut ranked = scores.to_vec();
    if !should_add {
        return (ranked, false);
    }

    ranked.push(candidate.clone());
    // Stable: ties keep insertion order
    ranked.sort_by_key(|s| s.score);
    ranked.truncate(MAX_HIGH_SCORES);

    let retained = ranked.contains(&candidate);
    (ranked, retained)
}

/// Check whether a score would make the leaderboard, without changing it
pub fn qualifies(scores: &[Score], score: u32) -> bool {
    add_score(scores, Score::new(String::new(), score)).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_board() -> Vec<Score> {
        (0..MAX_HIGH_SCORES as u32)
            .map(|i| Score::new(format!("p{i}"), 10 + i))
            .collect()
    }

    #[test]
    fn test_empty_board_accepts_anything() {
        let (scores, retained) = add_score(&[], Score::new("ann", 500));
        assert!(retained);
        assert_eq!(scores, vec![Score::new("ann", 500)]);
    }

    #[test]
    fn test_sorted_insert() {
        let board = vec![Score::new("a", 3), Score::new("b", 9)];
        let (scores, retained) = add_score(&board, Score::new("c", 5));
        assert!(retained);
        let order: Vec<u32> = scores.iter().map(|s| s.score).collect();
        assert_eq!(order, vec![3, 5, 9]);
    }

    #[test]
    fn test_full_board_rejects_tie_and_worse() {
        let board = full_board();
        let worst = board.last().unwrap().score;

        let (scores, retained) = add_score(&board, Score::new("tie", worst));
        assert!(!retained);
        assert_eq!(scores, board);

        let (scores, retained) = add_score(&board, Score::new("worse", worst + 1));
        assert!(!retained);
        assert_eq!(scores, board);
    }

    #[test]
    fn test_full_board_accepts_better_and_drops_worst() {
        let board = full_board();
        let (scores, retained) = add_score(&board, Score::new("best", 1));
        assert!(retained);
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert_eq!(scores[0], Score::new("best", 1));
        assert!(!scores.contains(&Score::new("p9", 19)));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let board = vec![Score::new("old", 4)];
        let (scores, _) = add_score(&board, Score::new("new", 4));
        assert_eq!(scores[0].name, "old");
        assert_eq!(scores[1].name, "new");
    }

    #[test]
    fn test_unsorted_full_board_uses_maximum_as_worst() {
        let mut board = full_board();
        board.reverse();
        assert!(qualifies(&board, 18));
        assert!(!qualifies(&board, 19));
    }

    #[test]
    fn test_deterministic() {
        let board = full_board();
        let first = add_score(&board, Score::new("x", 12));
        let second = add_score(&board, Score::new("x", 12));
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_board_sorted_and_capped(raw in prop::collection::vec(0u32..50, 0..40)) {
            let mut board = Vec::new();
            for (i, score) in raw.into_iter().enumerate() {
                let before = board.clone();
                let full_and_not_better = before.len() == MAX_HIGH_SCORES
                    && before.iter().map(|s: &Score| s.score).max().is_some_and(|w| score >= w);
                let (next, retained) = add_score(&board, Score::new(format!("n{i}"), score));
                prop_assert!(next.len() <= MAX_HIGH_SCORES);
                prop_assert!(next.windows(2).all(|w| w[0].score <= w[1].score));
                if full_and_not_better {
                    prop_assert!(!retained);
                    prop_assert_eq!(&next, &before);
                }
                board = next;
            }
        }
    }
}
