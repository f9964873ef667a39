//! Guess scoring.
//!
//! Each position is scored independently:
//!
//! ```text
//! clue[i] = 2 * [guess[i] == solution[i]] + sum_{j != i} [guess[i] == solution[j]]
//! ```
//!
//! A guess digit earns one blow credit for every non-aligned solution position
//! holding the same digit. With validated (pairwise distinct) combinations a
//! position scores at most 2.

use crate::combination::Combination;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// Score of a position that matches digit and position.
pub const HIT: u8 = 2;
/// Score of a position whose digit appears elsewhere in the solution.
pub const BLOW: u8 = 1;
/// Score of a position whose digit does not appear in the solution.
pub const MISS: u8 = 0;

/// Errors raised when reading a clue from raw scores or its compressed form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClueError {
    #[error("clue score {score} at position {index} is not 0, 1 or 2")]
    InvalidScore { index: usize, score: u8 },
}

impl GameError for ClueError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidScore { .. } => "CLUE_INVALID_SCORE",
        }
    }
}

/// Scores raw digits per the positional rule above. No validation.
pub fn score(
    guess: &[u8; GameConfig::SLOTS],
    solution: &[u8; GameConfig::SLOTS],
) -> [u8; GameConfig::SLOTS] {
    let mut clue = [MISS; GameConfig::SLOTS];
    for (i, slot) in clue.iter_mut().enumerate() {
        let hit = HIT * u8::from(guess[i] == solution[i]);
        let blows: u8 = (0..GameConfig::SLOTS)
            .filter(|&j| j != i)
            .map(|j| u8::from(guess[i] == solution[j]))
            .sum();
        *slot = hit + blows;
    }
    clue
}

/// True iff every position is a hit.
pub fn is_solved(clue: &[u8; GameConfig::SLOTS]) -> bool {
    clue.iter().all(|&score| score == HIT)
}

/// Scores of one guess, each in `{0, 1, 2}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clue([u8; GameConfig::SLOTS]);

impl Clue {
    /// Scores a guess against the solution.
    pub fn evaluate(guess: &Combination, solution: &Combination) -> Self {
        Self(score(&guess.digits(), &solution.digits()))
    }

    pub fn from_scores(scores: [u8; GameConfig::SLOTS]) -> Result<Self, ClueError> {
        if let Some((index, &score)) = scores.iter().enumerate().find(|(_, s)| **s > HIT) {
            return Err(ClueError::InvalidScore { index, score });
        }
        Ok(Self(scores))
    }

    pub fn scores(&self) -> [u8; GameConfig::SLOTS] {
        self.0
    }

    pub fn hits(&self) -> usize {
        self.0.iter().filter(|&&s| s == HIT).count()
    }

    pub fn blows(&self) -> usize {
        self.0.iter().filter(|&&s| s == BLOW).count()
    }

    pub fn is_solved(&self) -> bool {
        is_solved(&self.0)
    }

    /// Four 2-bit fields, position 0 most significant.
    pub fn compress(&self) -> u8 {
        self.0
            .iter()
            .fold(0u8, |packed, &score| (packed << GameConfig::CLUE_BITS) | score)
    }

    pub fn decompress(packed: u8) -> Result<Self, ClueError> {
        let mut scores = [MISS; GameConfig::SLOTS];
        for (index, score) in scores.iter_mut().enumerate() {
            let shift = (GameConfig::SLOTS - 1 - index) as u32 * GameConfig::CLUE_BITS;
            *score = (packed >> shift) & 0b11;
        }
        Self::from_scores(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(value: u32) -> Combination {
        Combination::from_encoded(value).unwrap()
    }

    #[test]
    fn exact_guess_is_all_hits() {
        let clue = score(&[5, 6, 3, 4], &[5, 6, 3, 4]);
        assert_eq!(clue, [2, 2, 2, 2]);
        assert!(is_solved(&clue));
    }

    #[test]
    fn mixed_guess_scores_each_position() {
        // 5 aligned, 7 and 2 absent, 6 present at solution position 1
        let clue = score(&[5, 7, 2, 6], &[5, 6, 3, 4]);
        assert_eq!(clue, [2, 0, 0, 1]);
        assert!(!is_solved(&clue));
    }

    #[test]
    fn repeated_solution_digits_accumulate_blows() {
        // unvalidated inputs: guess digit 1 matches three non-aligned positions
        assert_eq!(score(&[1, 2, 3, 4], &[5, 1, 1, 1]), [3, 0, 0, 0]);
        assert_eq!(score(&[1, 2, 3, 4], &[1, 1, 6, 7]), [3, 0, 0, 0]);
    }

    #[test]
    fn validated_clue_counts() {
        let clue = Clue::evaluate(&combo(2134), &combo(1234));
        assert_eq!(clue.scores(), [1, 1, 2, 2]);
        assert_eq!(clue.hits(), 2);
        assert_eq!(clue.blows(), 2);
    }

    #[test]
    fn compressed_layout() {
        let clue = Clue::from_scores([2, 0, 0, 1]).unwrap();
        assert_eq!(clue.compress(), 0b10_00_00_01);
        assert_eq!(Clue::decompress(0b10_00_00_01), Ok(clue));
        assert_eq!(Clue::from_scores([2; 4]).unwrap().compress(), 0b1010_1010);
    }

    #[test]
    fn invalid_scores_are_rejected() {
        assert_eq!(
            Clue::from_scores([2, 3, 0, 0]),
            Err(ClueError::InvalidScore { index: 1, score: 3 })
        );
        assert!(Clue::decompress(0b11_00_00_00).is_err());
    }
}
